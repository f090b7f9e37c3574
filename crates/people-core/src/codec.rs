//! Conversions between typed records and store [`Document`]s.
//!
//! Records expose their identifier under a public name (`contact_id`,
//! `symptom_id`); documents keep it under [`ID_FIELD`]. These helpers do the
//! rename in both directions.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
  Error, Result,
  store::{Document, ID_FIELD},
};

/// Serialise `value` into a JSON object.
pub fn to_object<T: Serialize>(value: &T) -> Result<Document> {
  match serde_json::to_value(value)? {
    Value::Object(map) => Ok(map),
    _ => Err(Error::Serialization(serde::ser::Error::custom(
      "expected a value that serialises to a JSON object",
    ))),
  }
}

/// Serialise a record into a document, moving `id_field` to [`ID_FIELD`].
pub fn to_document<T: Serialize>(value: &T, id_field: &str) -> Result<Document> {
  let mut doc = to_object(value)?;
  if let Some(id) = doc.remove(id_field) {
    doc.insert(ID_FIELD.to_owned(), id);
  }
  Ok(doc)
}

/// Deserialise a document into a record, moving [`ID_FIELD`] to `id_field`.
pub fn from_document<T: DeserializeOwned>(mut doc: Document, id_field: &str) -> Result<T> {
  if let Some(id) = doc.remove(ID_FIELD) {
    doc.insert(id_field.to_owned(), id);
  }
  Ok(serde_json::from_value(Value::Object(doc))?)
}
