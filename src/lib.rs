//! Translate Mongo-style filter documents into SQLite queries.
//!
//! ```no_run
//! use docq::{parse_filters, parse_pagination, query_table, Record};
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("people.db")?;
//! let filters = parse_filters(r#"[{"age": {"$gte": 30}}]"#)?;
//! let pagination = parse_pagination(r#"{"limit": 10, "sort": [[["age", "DESC"]]]}"#)?;
//! let rows: Vec<Record> = query_table(&conn, "people", Some(filters.as_slice()), Some(&pagination))?.fetch()?;
//! # Ok::<(), docq::QueryError>(())
//! ```

pub mod error;
pub mod query;
pub mod record;
pub mod sql;

pub use error::{QueryError, QueryResult};
pub use query::{
    count, count_table, parse_filters, parse_pagination, query, query_limit, query_table,
    CountResult, FilterClause, FilterValue, Operator, Pagination, Scalar,
};
pub use record::{FromRow, Model, Record};
pub use sql::Query;
