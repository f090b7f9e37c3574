//! The `DocumentStore` trait and the filter/update vocabulary it speaks.
//!
//! The trait is implemented by storage backends (e.g. `people-store-sqlite`).
//! Repositories depend on this abstraction, never on a concrete backend.
//! Every operation touches at most one document atomically; nothing spans
//! documents.

use std::future::Future;

use serde_json::Value;

/// A stored document: a JSON object whose identifier lives under [`ID_FIELD`].
pub type Document = serde_json::Map<String, Value>;

/// Key under which every document stores its unique identifier.
pub const ID_FIELD: &str = "_id";

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Which documents of a collection an operation targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
  /// Every document in the collection.
  All,
  /// The document whose [`ID_FIELD`] equals the given identifier.
  Id(String),
  /// Documents whose top-level `field` equals `value`.
  Eq { field: String, value: Value },
}

impl Filter {
  pub fn id(id: impl Into<String>) -> Self { Self::Id(id.into()) }

  pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Self::Eq {
      field: field.into(),
      value: value.into(),
    }
  }
}

// ─── Updates ─────────────────────────────────────────────────────────────────

/// Picks one element out of an embedded array.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSelector {
  /// The most recently appended element.
  Last,
  /// The first element whose `field` equals `value`.
  Match { field: String, value: Value },
}

impl ElementSelector {
  pub fn matching(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Self::Match {
      field: field.into(),
      value: value.into(),
    }
  }

  fn select<'a>(&self, items: &'a mut [Value]) -> Option<&'a mut Value> {
    match self {
      Self::Last => items.last_mut(),
      Self::Match { field, value } => items
        .iter_mut()
        .find(|item| item.get(field.as_str()) == Some(value)),
    }
  }
}

/// An operation on an embedded array, applied alongside the `set` map.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayOp {
  /// Append `value` to `array`, creating the array if it is missing.
  Push { array: String, value: Value },
  /// Merge `set` into the object element of `array` picked by `selector`.
  SetInElement {
    array:    String,
    selector: ElementSelector,
    set:      Document,
  },
}

/// A single-document update: a merge-patch of top-level fields plus at most
/// one array operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
  /// Fields to overwrite. Fields absent here are left untouched.
  pub set:   Document,
  pub array: Option<ArrayOp>,
}

impl Update {
  pub fn set(set: Document) -> Self { Self { set, array: None } }

  pub fn with_push(mut self, array: impl Into<String>, value: Value) -> Self {
    self.array = Some(ArrayOp::Push {
      array: array.into(),
      value,
    });
    self
  }

  pub fn with_set_in_element(
    mut self,
    array: impl Into<String>,
    selector: ElementSelector,
    set: Document,
  ) -> Self {
    self.array = Some(ArrayOp::SetInElement {
      array: array.into(),
      selector,
      set,
    });
    self
  }

  /// Apply this update to `doc` in place.
  ///
  /// Returns `None` when the array operation cannot find its target (the
  /// array is missing, is not an array, or no element is selected); the
  /// document then counts as not matched and is left unchanged. Otherwise
  /// returns whether anything changed. [`ID_FIELD`] is never overwritten.
  pub fn apply(&self, doc: &mut Document) -> Option<bool> {
    let mut changed = false;

    match &self.array {
      None => {}
      Some(ArrayOp::Push { array, value }) => {
        let slot = doc
          .entry(array.clone())
          .or_insert_with(|| Value::Array(Vec::new()));
        slot.as_array_mut()?.push(value.clone());
        changed = true;
      }
      Some(ArrayOp::SetInElement { array, selector, set }) => {
        let items = doc.get_mut(array.as_str())?.as_array_mut()?;
        let element = selector.select(items)?.as_object_mut()?;
        for (key, value) in set {
          changed |= set_field(element, key, value);
        }
      }
    }

    for (key, value) in &self.set {
      if key == ID_FIELD {
        continue;
      }
      changed |= set_field(doc, key, value);
    }

    Some(changed)
  }
}

fn set_field(doc: &mut Document, key: &str, value: &Value) -> bool {
  if doc.get(key) == Some(value) {
    return false;
  }
  doc.insert(key.to_owned(), value.clone());
  true
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of [`DocumentStore::insert_one`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted(String),
  /// A document with this identifier already exists; nothing was written.
  Duplicate(String),
}

/// Counts reported by [`DocumentStore::update_one`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
  /// Documents selected by the filter (and, for element updates, by the
  /// element selector). Zero or one.
  pub matched:  u64,
  /// Documents whose stored body actually changed. Zero or one.
  pub modified: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a collection-scoped document database.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The first document matching `filter`, if any.
  fn find_one<'a>(
    &'a self,
    collection: &'a str,
    filter: Filter,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + 'a;

  /// All documents matching `filter`, in store-native order.
  fn find<'a>(
    &'a self,
    collection: &'a str,
    filter: Filter,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// Insert `document`, which must carry a string [`ID_FIELD`].
  fn insert_one<'a>(
    &'a self,
    collection: &'a str,
    document: Document,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + 'a;

  /// Apply `update` to the first document matching `filter`.
  fn update_one<'a>(
    &'a self,
    collection: &'a str,
    filter: Filter,
    update: Update,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + 'a;

  /// Delete the first document matching `filter`; returns the deleted count.
  fn delete_one<'a>(
    &'a self,
    collection: &'a str,
    filter: Filter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
