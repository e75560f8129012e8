use crate::error::QueryResult;
use crate::sql::{Direction, Query};

/// Appends an order term per `(field, direction)`; the first pair is the
/// primary key.
pub fn apply_sort<'c, R>(
    query: Query<'c, R>,
    groups: &[Vec<(String, String)>],
) -> QueryResult<Query<'c, R>> {
    groups
        .iter()
        .flatten()
        .try_fold(query, |query, (field, direction)| {
            let direction: Direction = direction.parse()?;
            Ok(query.order_by(field.as_str(), direction))
        })
}
