use super::ast::{FilterClause, Operator};
use super::normalize::{normalize, Operand};
use crate::error::{QueryError, QueryResult};
use crate::sql::{CompareOp, Predicate, Query, SqlValue};

/// Folds every clause into the query, one predicate per (field, operator).
pub fn apply_filters<'c, R>(
    query: Query<'c, R>,
    clauses: &[FilterClause],
) -> QueryResult<Query<'c, R>> {
    clauses.iter().try_fold(query, apply_clause)
}

fn apply_clause<'c, R>(query: Query<'c, R>, clause: &FilterClause) -> QueryResult<Query<'c, R>> {
    clause
        .fields
        .iter()
        .flat_map(|f| f.conditions.iter().map(move |c| (f.field.as_str(), c)))
        .try_fold(query, |query, (field, condition)| {
            let operand = normalize(&condition.value)?;
            Ok(query.filter(predicate(field, condition.op, operand)?))
        })
}

/// Builds the relational predicate for one operator.
pub fn predicate(field: &str, op: Operator, operand: Operand) -> QueryResult<Predicate> {
    let column = field.to_string();
    Ok(match (op, operand) {
        (Operator::In, Operand::Many(values)) => Predicate::In {
            column,
            values,
            negated: false,
        },
        (Operator::Nin, Operand::Many(values)) => Predicate::In {
            column,
            values,
            negated: true,
        },
        (Operator::In | Operator::Nin, Operand::Single(_)) => {
            return Err(mismatch(field, op, "a list of values"));
        }
        (_, Operand::Many(_)) => return Err(mismatch(field, op, "a single value")),
        (Operator::Eq, Operand::Single(SqlValue::Null)) => Predicate::IsNull(column),
        (Operator::Ne, Operand::Single(SqlValue::Null)) => Predicate::IsNotNull(column),
        (Operator::Eq, Operand::Single(value)) => compare(field, CompareOp::Eq, value),
        (Operator::Ne, Operand::Single(value)) => compare(field, CompareOp::Ne, value),
        (Operator::Gt, Operand::Single(value)) => compare(field, CompareOp::Gt, value),
        (Operator::Lt, Operand::Single(value)) => compare(field, CompareOp::Lt, value),
        (Operator::Gte, Operand::Single(value)) => inclusive(field, CompareOp::Gt, value),
        (Operator::Lte, Operand::Single(value)) => inclusive(field, CompareOp::Lt, value),
    })
}

fn compare(field: &str, op: CompareOp, value: SqlValue) -> Predicate {
    Predicate::Compare {
        column: field.to_string(),
        op,
        value,
    }
}

/// `field <op> value OR field = value`
fn inclusive(field: &str, strict: CompareOp, value: SqlValue) -> Predicate {
    Predicate::Or(
        Box::new(compare(field, strict, value.clone())),
        Box::new(compare(field, CompareOp::Eq, value)),
    )
}

fn mismatch(field: &str, op: Operator, expected: &'static str) -> QueryError {
    QueryError::OperandMismatch {
        field: field.to_string(),
        op,
        expected,
    }
}
