pub mod ast;
pub mod query;
pub mod render;

pub use ast::{CompareOp, Direction, Predicate, Select, SqlValue};
pub use query::Query;
