//! Translation between the store's filter vocabulary and SQL.
//!
//! Every query binds the collection name as `?1`; a filter contributes an
//! extra `AND ...` clause whose parameters start at `?2`.

use people_core::store::{Document, Filter};
use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use crate::Result;

/// The `AND ...` suffix and its parameters for `filter`.
pub fn encode_filter(filter: &Filter) -> (&'static str, Vec<SqlValue>) {
  match filter {
    Filter::All => ("", Vec::new()),
    Filter::Id(id) => (" AND doc_id = ?2", vec![SqlValue::Text(id.clone())]),
    Filter::Eq { field, value } => (
      " AND json_extract(body, ?2) = ?3",
      vec![SqlValue::Text(json_path(field)), sql_value(value)],
    ),
  }
}

/// A JSON path selecting the top-level key `field`.
fn json_path(field: &str) -> String {
  format!("$.\"{}\"", field.replace('"', "\\\""))
}

/// The SQL value `json_extract` yields for a JSON scalar equal to `value`.
pub fn sql_value(value: &Value) -> SqlValue {
  match value {
    Value::Null => SqlValue::Null,
    Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
    Value::Number(n) => match n.as_i64() {
      Some(i) => SqlValue::Integer(i),
      None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
    },
    Value::String(s) => SqlValue::Text(s.clone()),
    Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
  }
}

/// The full argument list: collection first, then the filter's parameters.
pub fn bind(collection: &str, params: Vec<SqlValue>) -> Vec<SqlValue> {
  let mut args = Vec::with_capacity(params.len() + 1);
  args.push(SqlValue::Text(collection.to_owned()));
  args.extend(params);
  args
}

pub fn decode_body(body: &str) -> Result<Document> { Ok(serde_json::from_str(body)?) }
