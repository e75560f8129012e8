use super::ast::{FilterValue, Scalar};
use crate::error::{QueryError, QueryResult};
use crate::sql::SqlValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// A filter value ready to be bound into a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Single(SqlValue),
    Many(Vec<SqlValue>),
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Resolves `$date` tags into native datetimes; other values pass through.
pub fn normalize(value: &FilterValue) -> QueryResult<Operand> {
    Ok(match value {
        FilterValue::Scalar(scalar) => Operand::Single(scalar_to_sql(scalar)),
        FilterValue::List(items) => Operand::Many(items.iter().map(scalar_to_sql).collect()),
        FilterValue::Date(text) => Operand::Single(SqlValue::DateTime(parse_date(text)?)),
        FilterValue::Dates(texts) => Operand::Many(
            texts
                .iter()
                .map(|text| parse_date(text).map(SqlValue::DateTime))
                .collect::<QueryResult<_>>()?,
        ),
    })
}

fn scalar_to_sql(scalar: &Scalar) -> SqlValue {
    match scalar {
        Scalar::Null => SqlValue::Null,
        Scalar::Bool(b) => SqlValue::Bool(*b),
        Scalar::Int(n) => SqlValue::Integer(*n),
        Scalar::Float(f) => SqlValue::Real(*f),
        Scalar::Text(s) => SqlValue::Text(s.clone()),
    }
}

/// Parses a calendar date or date/time. Offsets are converted to UTC.
pub fn parse_date(text: &str) -> QueryResult<NaiveDateTime> {
    let trimmed = text.trim();

    let mut last_err = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => return Ok(dt.naive_utc()),
        Err(e) => e,
    };

    for format in DATETIME_FORMATS {
        match NaiveDateTime::parse_from_str(trimmed, format) {
            Ok(dt) => return Ok(dt),
            Err(e) => last_err = e,
        }
    }

    for format in DATE_FORMATS {
        match NaiveDate::parse_from_str(trimmed, format) {
            Ok(date) => return Ok(date.and_time(NaiveTime::MIN)),
            Err(e) => last_err = e,
        }
    }

    Err(QueryError::InvalidDate {
        value: text.to_string(),
        source: last_err,
    })
}
