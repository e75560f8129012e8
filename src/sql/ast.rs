//! Minimal SQL AST for single-table selects.

use crate::error::QueryError;
use chrono::{NaiveDateTime, Timelike};
use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use std::str::FromStr;

/// A `SELECT * FROM table` with conjunctive predicates, ordering and bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub predicates: Vec<Predicate>,
    pub order_by: Vec<OrderBy>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Select {
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
            order_by: Vec::new(),
            offset: None,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: String,
        op: CompareOp,
        value: SqlValue,
    },
    IsNull(String),
    IsNotNull(String),
    In {
        column: String,
        values: Vec<SqlValue>,
        negated: bool,
    },
    Or(Box<Predicate>, Box<Predicate>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ASC") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("DESC") {
            Ok(Direction::Desc)
        } else {
            Err(QueryError::UnsupportedOrdering(s.to_string()))
        }
    }
}

/// A value bound as a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

/// Formats a datetime the way SQLite's `datetime()` does.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    if value.nanosecond() == 0 {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Bool(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
            SqlValue::Integer(n) => ToSqlOutput::Owned(Value::Integer(*n)),
            SqlValue::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlValue::DateTime(dt) => ToSqlOutput::Owned(Value::Text(format_datetime(dt))),
        })
    }
}
