use crate::error::QueryError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::Nin,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::In => "$in",
            Operator::Nin => "$nin",
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.token() == s)
            .ok_or_else(|| QueryError::UnsupportedOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// A filter operand as written in the document.
///
/// Dates travel as strings (JSON has no date type) and are only turned into
/// native values by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Date(String),
    Dates(Vec<String>),
}

impl FilterValue {
    pub fn null() -> Self {
        FilterValue::Scalar(Scalar::Null)
    }

    pub fn date(value: impl Into<String>) -> Self {
        FilterValue::Date(value.into())
    }

    pub fn dates<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::Dates(values.into_iter().map(Into::into).collect())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value.into())
                }
            }

            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    f64 => Float,
    &str => Text,
    String => Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub op: Operator,
    pub value: FilterValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub conditions: Vec<Condition>,
}

/// One `{field: {$op: value, ...}, ...}` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterClause {
    pub fields: Vec<FieldFilter>,
}

impl FilterClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition, grouping it under an existing entry for `field`.
    pub fn with(mut self, field: &str, op: Operator, value: impl Into<FilterValue>) -> Self {
        let condition = Condition {
            op,
            value: value.into(),
        };
        match self.fields.iter_mut().find(|f| f.field == field) {
            Some(existing) => existing.conditions.push(condition),
            None => self.fields.push(FieldFilter {
                field: field.to_string(),
                conditions: vec![condition],
            }),
        }
        self
    }
}

/// Offset, limit and sort for one query.
///
/// `sort` is a list of groups of `(field, direction)` pairs; directions stay
/// raw tokens until the sort is applied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub offset: i64,
    pub limit: i64,
    pub sort: Vec<Vec<(String, String)>>,
}

impl Pagination {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, field: &str, direction: &str) -> Self {
        self.sort.push(vec![(field.to_string(), direction.to_string())]);
        self
    }
}
