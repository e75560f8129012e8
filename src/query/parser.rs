//! Parses filter documents and pagination directives from JSON or YAML text.
//!
//! A filter document is a list of clauses, each mapping a field to a mapping
//! of operator tokens to values:
//!
//! ```text
//! [{"age": {"$gte": 30}, "joined": {"$lt": {"$date": "2023-01-01"}}}]
//! ```
//!
//! A single clause mapping is accepted as a one-element list.

use super::ast::{Condition, FieldFilter, FilterClause, FilterValue, Operator, Pagination, Scalar};
use crate::error::{QueryError, QueryResult};
use serde_yaml::{Mapping, Value as YamlValue};

const DATE_TAG: &str = "$date";

pub fn parse_filters(input: &str) -> QueryResult<Vec<FilterClause>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: YamlValue = serde_yaml::from_str(input)?;
    filters_from_value(&doc)
}

pub fn parse_pagination(input: &str) -> QueryResult<Pagination> {
    if input.trim().is_empty() {
        return Ok(Pagination::default());
    }
    Ok(serde_yaml::from_str(input)?)
}

fn filters_from_value(doc: &YamlValue) -> QueryResult<Vec<FilterClause>> {
    match doc {
        YamlValue::Null => Ok(Vec::new()),
        YamlValue::Sequence(items) => items.iter().map(parse_clause).collect(),
        YamlValue::Mapping(_) => Ok(vec![parse_clause(doc)?]),
        _ => Err(invalid("expected a list of filter clauses")),
    }
}

fn parse_clause(value: &YamlValue) -> QueryResult<FilterClause> {
    let Some(mapping) = value.as_mapping() else {
        return Err(invalid("each filter clause must be a mapping"));
    };

    let fields = mapping
        .iter()
        .map(|(key, ops)| {
            let field = key_str(key)?;
            let Some(ops) = ops.as_mapping() else {
                return Err(invalid(format!("expected operator mapping for field {field:?}")));
            };
            Ok(FieldFilter {
                field: field.to_string(),
                conditions: parse_conditions(ops)?,
            })
        })
        .collect::<QueryResult<_>>()?;

    Ok(FilterClause { fields })
}

fn parse_conditions(ops: &Mapping) -> QueryResult<Vec<Condition>> {
    ops.iter()
        .map(|(key, value)| {
            Ok(Condition {
                op: key_str(key)?.parse::<Operator>()?,
                value: parse_value(value)?,
            })
        })
        .collect()
}

fn parse_value(value: &YamlValue) -> QueryResult<FilterValue> {
    match value {
        YamlValue::Sequence(items) => Ok(FilterValue::List(
            items.iter().map(parse_scalar).collect::<QueryResult<_>>()?,
        )),
        YamlValue::Mapping(mapping) => parse_date_tag(mapping),
        _ => Ok(FilterValue::Scalar(parse_scalar(value)?)),
    }
}

fn parse_date_tag(mapping: &Mapping) -> QueryResult<FilterValue> {
    let tagged = match (mapping.len(), mapping.get(DATE_TAG)) {
        (1, Some(tagged)) => tagged,
        _ => return Err(invalid("mapping values must be {\"$date\": ...}")),
    };

    match tagged {
        YamlValue::String(s) => Ok(FilterValue::Date(s.clone())),
        YamlValue::Sequence(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid("$date list entries must be strings"))
            })
            .collect::<QueryResult<_>>()
            .map(FilterValue::Dates),
        _ => Err(invalid("$date expects a string or a list of strings")),
    }
}

fn parse_scalar(value: &YamlValue) -> QueryResult<Scalar> {
    match value {
        YamlValue::Null => Ok(Scalar::Null),
        YamlValue::Bool(b) => Ok(Scalar::Bool(*b)),
        YamlValue::Number(n) => n
            .as_i64()
            .map(Scalar::Int)
            .or_else(|| n.as_f64().map(Scalar::Float))
            .ok_or_else(|| invalid(format!("unsupported number {n}"))),
        YamlValue::String(s) => Ok(Scalar::Text(s.clone())),
        _ => Err(invalid("expected a scalar value")),
    }
}

fn key_str(key: &YamlValue) -> QueryResult<&str> {
    key.as_str()
        .ok_or_else(|| invalid("mapping keys must be strings"))
}

fn invalid(message: impl Into<String>) -> QueryError {
    QueryError::InvalidDocument(message.into())
}
