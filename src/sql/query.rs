use super::ast::{Direction, OrderBy, Predicate, Select};
use super::render::{render_count, render_select, Rendered};
use crate::error::QueryResult;
use crate::record::FromRow;
use rusqlite::{params_from_iter, Connection};
use std::marker::PhantomData;
use tracing::debug;

/// An unexecuted query against one table.
///
/// Every builder method consumes the query and returns the extended one;
/// nothing touches the database until [`Query::fetch`] or [`Query::count`].
pub struct Query<'c, R> {
    conn: &'c Connection,
    select: Select,
    _row: PhantomData<fn() -> R>,
}

impl<'c, R> Query<'c, R> {
    pub fn new(conn: &'c Connection, table: impl Into<String>) -> Self {
        Self {
            conn,
            select: Select::from_table(table),
            _row: PhantomData,
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        debug!(?predicate, "attaching predicate");
        self.select.predicates.push(predicate);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        let column = column.into();
        debug!(%column, direction = direction.as_sql(), "attaching order");
        self.select.order_by.push(OrderBy { column, direction });
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.select.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.select.limit = Some(limit);
        self
    }

    pub fn select(&self) -> &Select {
        &self.select
    }

    pub fn to_sql(&self) -> String {
        render_select(&self.select).sql
    }

    /// Runs `SELECT COUNT(*)` over this query.
    pub fn count(&self) -> QueryResult<u64> {
        let Rendered { sql, params } = render_count(&self.select);
        debug!(%sql, params = params.len(), "executing count");
        let count: u64 = self
            .conn
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
        Ok(count)
    }
}

impl<'c, R: FromRow> Query<'c, R> {
    /// Executes the query and materializes every row.
    pub fn fetch(&self) -> QueryResult<Vec<R>> {
        let Rendered { sql, params } = render_select(&self.select);
        debug!(%sql, params = params.len(), "executing query");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| R::from_row(row))?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
