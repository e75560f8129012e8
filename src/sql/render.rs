//! Renders the select AST to SQLite SQL with positional parameters.

use super::ast::{Predicate, Select, SqlValue};

/// SQL text plus the values bound to its `?` placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Backtick quoting: unlike double quotes, SQLite never falls back to
/// reading an unknown backtick identifier as a string literal.
fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

pub fn render_select(select: &Select) -> Rendered {
    let mut params = Vec::new();
    let mut sql = format!("SELECT * FROM {}", quote_ident(&select.table));

    if !select.predicates.is_empty() {
        let conditions: Vec<String> = select
            .predicates
            .iter()
            .map(|p| render_predicate(p, &mut params))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    if !select.order_by.is_empty() {
        let terms: Vec<String> = select
            .order_by
            .iter()
            .map(|o| format!("{} {}", quote_ident(&o.column), o.direction.as_sql()))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&terms.join(", "));
    }

    // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
    match (select.limit, select.offset) {
        (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
        (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
        (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
        (None, None) => {}
    }

    Rendered { sql, params }
}

/// Counts the rows the full select would return, bounds included.
pub fn render_count(select: &Select) -> Rendered {
    let inner = render_select(select);
    Rendered {
        sql: format!("SELECT COUNT(*) FROM ({})", inner.sql),
        params: inner.params,
    }
}

/// Dates are compared as instants: stored text like `2023-01-01` or
/// `2023-01-01T00:00:00` must match a bound `2023-01-01 00:00:00`.
fn is_date(value: &SqlValue) -> bool {
    matches!(value, SqlValue::DateTime(_))
}

fn column_expr(column: &str, as_date: bool) -> String {
    if as_date {
        format!("julianday({})", quote_ident(column))
    } else {
        quote_ident(column)
    }
}

fn placeholder(value: &SqlValue) -> &'static str {
    if is_date(value) {
        "julianday(?)"
    } else {
        "?"
    }
}

fn render_predicate(predicate: &Predicate, params: &mut Vec<SqlValue>) -> String {
    match predicate {
        Predicate::Compare { column, op, value } => {
            params.push(value.clone());
            format!(
                "{} {} {}",
                column_expr(column, is_date(value)),
                op.as_sql(),
                placeholder(value)
            )
        }
        Predicate::IsNull(column) => format!("{} IS NULL", quote_ident(column)),
        Predicate::IsNotNull(column) => format!("{} IS NOT NULL", quote_ident(column)),
        Predicate::In {
            column,
            values,
            negated,
        } => {
            params.extend(values.iter().cloned());
            let placeholders: Vec<&str> = values.iter().map(placeholder).collect();
            let keyword = if *negated { "NOT IN" } else { "IN" };
            format!(
                "{} {} ({})",
                column_expr(column, values.iter().any(is_date)),
                keyword,
                placeholders.join(", ")
            )
        }
        Predicate::Or(left, right) => {
            let left = render_predicate(left, params);
            let right = render_predicate(right, params);
            format!("({left} OR {right})")
        }
    }
}
