pub mod ast;
pub mod filter;
pub mod normalize;
pub mod paginate;
pub mod parser;
pub mod sort;

pub use ast::{FilterClause, FilterValue, Operator, Pagination, Scalar};
pub use filter::apply_filters;
pub use paginate::query_limit;
pub use parser::{parse_filters, parse_pagination};
pub use sort::apply_sort;

use crate::error::QueryResult;
use crate::record::{FromRow, Model, Record};
use crate::sql::Query;
use rusqlite::Connection;
use serde::Serialize;

/// Builds an unexecuted query over `M`'s table: filters, then sort, then
/// offset/limit.
pub fn query<'c, M: Model>(
    conn: &'c Connection,
    filters: Option<&[FilterClause]>,
    pagination: Option<&Pagination>,
) -> QueryResult<Query<'c, M>> {
    query_table(conn, M::TABLE, filters, pagination)
}

/// Like [`query`], for a table named at runtime.
pub fn query_table<'c, R: FromRow>(
    conn: &'c Connection,
    table: &str,
    filters: Option<&[FilterClause]>,
    pagination: Option<&Pagination>,
) -> QueryResult<Query<'c, R>> {
    let query = apply_filters(Query::new(conn, table), filters.unwrap_or_default())?;
    let sort = pagination.map_or(&[][..], |p| p.sort.as_slice());
    let query = apply_sort(query, sort)?;
    Ok(query_limit(query, pagination))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountResult {
    pub count: u64,
}

/// Number of `M` rows matching `filters`, ignoring sort and pagination.
pub fn count<M: Model>(conn: &Connection, filters: Option<&[FilterClause]>) -> QueryResult<CountResult> {
    count_table(conn, M::TABLE, filters)
}

pub fn count_table(
    conn: &Connection,
    table: &str,
    filters: Option<&[FilterClause]>,
) -> QueryResult<CountResult> {
    let count = query_table::<Record>(conn, table, filters, None)?.count()?;
    Ok(CountResult { count })
}
