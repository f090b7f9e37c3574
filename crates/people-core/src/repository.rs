//! Repositories: the only place that talks to a [`DocumentStore`].
//!
//! One repository per top-level entity kind. Each owns its collection name,
//! assigns identifiers and timestamps, and turns the store's matched/deleted
//! counts into [`Error::NotFound`].

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::{
  EntityKind, Error, Result, codec,
  contact::{Contact, ContactPatch, NewContact},
  ids,
  store::{Document, DocumentStore, ElementSelector, Filter, InsertOutcome, Update, UpdateOutcome},
  symptom::{AlarmSignalInput, NewSymptom, NewSymptomEntry, SymptomEntry, Symptom, SymptomPatch},
};

const CONTACT_ID: &str = "contact_id";
const SYMPTOM_ID: &str = "symptom_id";
const SYMPTOMS: &str = "symptoms";
const ENTRY_ID: &str = "entry_id";
const UPDATED: &str = "updated";

fn stamped(now: i64) -> Document {
  let mut set = Document::new();
  set.insert(UPDATED.to_owned(), Value::from(now));
  set
}

fn ensure_matched(outcome: UpdateOutcome, kind: EntityKind, id: &str) -> Result<()> {
  if outcome.matched == 0 {
    return Err(Error::not_found(kind, id));
  }
  Ok(())
}

fn ensure_deleted(deleted: u64, kind: EntityKind, id: &str) -> Result<()> {
  if deleted == 0 {
    return Err(Error::not_found(kind, id));
  }
  Ok(())
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// Reads and writes [`Contact`] documents.
///
/// Cloning is cheap; the store handle is reference-counted.
pub struct ContactRepository<S> {
  store:      Arc<S>,
  collection: String,
}

impl<S> Clone for ContactRepository<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      collection: self.collection.clone(),
    }
  }
}

impl<S: DocumentStore> ContactRepository<S> {
  pub fn new(store: Arc<S>, collection: impl Into<String>) -> Self {
    Self {
      store,
      collection: collection.into(),
    }
  }

  async fn find_one(&self, filter: Filter, key: &str) -> Result<Contact> {
    let doc = self
      .store
      .find_one(&self.collection, filter)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::Contact, key))?;
    codec::from_document(doc, CONTACT_ID)
  }

  /// Retrieve a single contact by its unique id.
  pub async fn get_by_id(&self, contact_id: &str) -> Result<Contact> {
    self.find_one(Filter::id(contact_id), contact_id).await
  }

  /// Retrieve a single contact by the IMEI of its device.
  pub async fn get_by_imei(&self, imei: &str) -> Result<Contact> {
    self.find_one(Filter::eq("imei", imei), imei).await
  }

  /// Every stored contact, in store-native order.
  pub async fn list(&self) -> Result<Vec<Contact>> {
    self
      .store
      .find(&self.collection, Filter::All)
      .await
      .map_err(Error::store)?
      .into_iter()
      .map(|doc| codec::from_document(doc, CONTACT_ID))
      .collect()
  }

  /// Persist a new contact and return it as re-read from the store.
  pub async fn create(&self, input: NewContact) -> Result<Contact> {
    let contact = input.into_contact(ids::new_id(), ids::now(), ids::new_id);
    let doc = codec::to_document(&contact, CONTACT_ID)?;

    match self
      .store
      .insert_one(&self.collection, doc)
      .await
      .map_err(Error::store)?
    {
      InsertOutcome::Inserted(id) => {
        debug!(contact_id = %id, "contact created");
        self.get_by_id(&id).await
      }
      InsertOutcome::Duplicate(id) => Err(Error::AlreadyExists {
        kind: EntityKind::Contact,
        id,
      }),
    }
  }

  /// Merge the fields present in `patch` into the stored contact.
  ///
  /// An update that leaves the document unchanged still succeeds; only a
  /// missing contact is an error.
  pub async fn update(&self, contact_id: &str, patch: ContactPatch) -> Result<()> {
    let now = ids::now();
    let mut set = codec::to_object(&patch)?;
    if let Some(entries) = patch.symptoms {
      let entries: Vec<SymptomEntry> = entries
        .into_iter()
        .map(|entry| entry.into_entry(ids::new_id(), now))
        .collect();
      set.insert(SYMPTOMS.to_owned(), serde_json::to_value(entries)?);
    }
    set.insert(UPDATED.to_owned(), Value::from(now));

    let outcome = self
      .store
      .update_one(&self.collection, Filter::id(contact_id), Update::set(set))
      .await
      .map_err(Error::store)?;
    debug!(contact_id, modified = outcome.modified, "contact updated");
    ensure_matched(outcome, EntityKind::Contact, contact_id)
  }

  /// Append a symptom report to the contact; returns the new entry's id.
  pub async fn add_symptom(&self, contact_id: &str, input: NewSymptomEntry) -> Result<String> {
    let now = ids::now();
    let entry = input.into_entry(ids::new_id(), now);
    let update = Update::set(stamped(now)).with_push(SYMPTOMS, serde_json::to_value(&entry)?);

    let outcome = self
      .store
      .update_one(&self.collection, Filter::id(contact_id), update)
      .await
      .map_err(Error::store)?;
    ensure_matched(outcome, EntityKind::Contact, contact_id)?;
    debug!(contact_id, entry_id = %entry.entry_id, "symptom entry appended");
    Ok(entry.entry_id)
  }

  /// Attach an alarm signal to one symptom entry of the contact: the entry
  /// named by `input.entry_id`, or the most recent one.
  ///
  /// Fails with `NotFound` when the contact or the addressed entry is missing.
  pub async fn add_alarm_signal(&self, contact_id: &str, input: AlarmSignalInput) -> Result<()> {
    let now = ids::now();
    let selector = match input.entry_id {
      Some(entry_id) => ElementSelector::matching(ENTRY_ID, entry_id),
      None => ElementSelector::Last,
    };
    let mut element = stamped(now);
    element.insert("alarm_signal".to_owned(), serde_json::to_value(input.signal)?);
    let update = Update::set(stamped(now)).with_set_in_element(SYMPTOMS, selector, element);

    let outcome = self
      .store
      .update_one(&self.collection, Filter::id(contact_id), update)
      .await
      .map_err(Error::store)?;
    debug!(contact_id, matched = outcome.matched, "alarm signal set");
    ensure_matched(outcome, EntityKind::Contact, contact_id)
  }

  /// Hard-delete a contact.
  pub async fn delete(&self, contact_id: &str) -> Result<()> {
    let deleted = self
      .store
      .delete_one(&self.collection, Filter::id(contact_id))
      .await
      .map_err(Error::store)?;
    ensure_deleted(deleted, EntityKind::Contact, contact_id)
  }
}

// ─── Symptoms ────────────────────────────────────────────────────────────────

/// Reads and writes top-level [`Symptom`] documents.
pub struct SymptomRepository<S> {
  store:      Arc<S>,
  collection: String,
}

impl<S> Clone for SymptomRepository<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      collection: self.collection.clone(),
    }
  }
}

impl<S: DocumentStore> SymptomRepository<S> {
  pub fn new(store: Arc<S>, collection: impl Into<String>) -> Self {
    Self {
      store,
      collection: collection.into(),
    }
  }

  pub async fn get_by_id(&self, symptom_id: &str) -> Result<Symptom> {
    let doc = self
      .store
      .find_one(&self.collection, Filter::id(symptom_id))
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::Symptom, symptom_id))?;
    codec::from_document(doc, SYMPTOM_ID)
  }

  /// All symptoms, or only those owned by `contact_id` when given.
  pub async fn list(&self, contact_id: Option<&str>) -> Result<Vec<Symptom>> {
    let filter = match contact_id {
      Some(id) => Filter::eq(CONTACT_ID, id),
      None => Filter::All,
    };
    self
      .store
      .find(&self.collection, filter)
      .await
      .map_err(Error::store)?
      .into_iter()
      .map(|doc| codec::from_document(doc, SYMPTOM_ID))
      .collect()
  }

  pub async fn create(&self, input: NewSymptom) -> Result<Symptom> {
    let symptom = input.into_symptom(ids::new_id(), ids::now());
    let doc = codec::to_document(&symptom, SYMPTOM_ID)?;

    match self
      .store
      .insert_one(&self.collection, doc)
      .await
      .map_err(Error::store)?
    {
      InsertOutcome::Inserted(id) => {
        debug!(symptom_id = %id, "symptom created");
        self.get_by_id(&id).await
      }
      InsertOutcome::Duplicate(id) => Err(Error::AlreadyExists {
        kind: EntityKind::Symptom,
        id,
      }),
    }
  }

  pub async fn update(&self, symptom_id: &str, patch: SymptomPatch) -> Result<()> {
    let mut set = codec::to_object(&patch)?;
    set.insert(UPDATED.to_owned(), Value::from(ids::now()));

    let outcome = self
      .store
      .update_one(&self.collection, Filter::id(symptom_id), Update::set(set))
      .await
      .map_err(Error::store)?;
    debug!(symptom_id, modified = outcome.modified, "symptom updated");
    ensure_matched(outcome, EntityKind::Symptom, symptom_id)
  }

  pub async fn delete(&self, symptom_id: &str) -> Result<()> {
    let deleted = self
      .store
      .delete_one(&self.collection, Filter::id(symptom_id))
      .await
      .map_err(Error::store)?;
    ensure_deleted(deleted, EntityKind::Symptom, symptom_id)
  }
}
