//! JSON parameter binding and row decoding for raw queries

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row as _, Sqlite, TypeInfo, ValueRef};

use crate::error::Result;

/// A selected row as a JSON object keyed by column name
pub type Row = Map<String, Value>;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Result of an `INSERT`/`UPDATE`/`DELETE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QueryResult {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// Bind positional parameters
pub(crate) fn bind_params<'q>(mut query: SqliteQuery<'q>, params: &'q [Value]) -> SqliteQuery<'q> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => query.bind(i),
                None => query.bind(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => query.bind(s.as_str()),
            // arrays and objects are stored as JSON text
            other => query.bind(other.to_string()),
        };
    }
    query
}

/// Convert a row into a JSON object using each value's storage class
pub(crate) fn row_to_json(row: &SqliteRow) -> Result<Row> {
    let mut out = Map::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let (is_null, type_name) = {
            let raw = row.try_get_raw(idx)?;
            (raw.is_null(), raw.type_info().name().to_ascii_uppercase())
        };

        let value = if is_null {
            Value::Null
        } else {
            match type_name.as_str() {
                "INTEGER" | "INT" | "BIGINT" | "INT8" => Value::from(row.try_get_unchecked::<i64, _>(idx)?),
                "BOOLEAN" | "BOOL" => Value::from(row.try_get_unchecked::<bool, _>(idx)?),
                "REAL" | "FLOAT" | "DOUBLE" => Value::from(row.try_get_unchecked::<f64, _>(idx)?),
                "BLOB" => {
                    let bytes: Vec<u8> = row.try_get_unchecked(idx)?;
                    Value::Array(bytes.into_iter().map(Value::from).collect())
                }
                _ => Value::from(row.try_get_unchecked::<String, _>(idx)?),
            }
        };
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

/// Decode a stored text value: JSON when it parses, the raw string otherwise
pub fn decode_lenient(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
