use super::ast::Pagination;
use crate::sql::Query;

/// Applies offset then limit, each only when strictly positive.
pub fn query_limit<'c, R>(query: Query<'c, R>, pagination: Option<&Pagination>) -> Query<'c, R> {
    let Some(pagination) = pagination else {
        return query;
    };

    let mut query = query;
    if let Ok(offset @ 1..) = u64::try_from(pagination.offset) {
        query = query.offset(offset);
    }
    if let Ok(limit @ 1..) = u64::try_from(pagination.limit) {
        query = query.limit(limit);
    }
    query
}
