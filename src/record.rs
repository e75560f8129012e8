use rusqlite::types::ValueRef;
use rusqlite::Row;
use serde::Serialize;
use serde_json::{Map, Number, Value as JsonValue};

/// Builds a value from one result row.
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// A row type bound to a table.
pub trait Model: FromRow {
    const TABLE: &'static str;
}

/// An untyped row: column name to JSON value, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, JsonValue>);

impl Record {
    pub fn get(&self, column: &str) -> Option<&JsonValue> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromRow for Record {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let stmt = row.as_ref();
        let mut columns = Map::new();
        for idx in 0..stmt.column_count() {
            let name = stmt.column_name(idx)?.to_string();
            columns.insert(name, sqlite_to_json(row.get_ref(idx)?));
        }
        Ok(Record(columns))
    }
}

fn sqlite_to_json(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(n) => JsonValue::from(n),
        ValueRef::Real(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
        ValueRef::Text(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect()),
    }
}
