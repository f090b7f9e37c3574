//! Response shapes.
//!
//! Stored records are returned as-is plus fields derived on read: a contact's
//! `age`, and `is_suspicious` on every symptom report. Derived fields are
//! never written back to the store.

use chrono::NaiveDate;
use people_core::{
  contact::Contact,
  symptom::{Symptom, SymptomEntry},
};
use serde::Serialize;

/// A symptom report embedded in a contact, with its derived suspicion flag.
#[derive(Debug, Serialize)]
pub struct EntryView {
  #[serde(flatten)]
  pub entry:         SymptomEntry,
  pub is_suspicious: bool,
}

impl From<SymptomEntry> for EntryView {
  fn from(entry: SymptomEntry) -> Self {
    Self {
      is_suspicious: entry.is_suspicious(),
      entry,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ContactView {
  /// Serialised without `symptoms`; those are emitted below as views.
  #[serde(flatten)]
  pub contact:  Contact,
  pub symptoms: Vec<EntryView>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub age:      Option<u32>,
}

impl ContactView {
  pub fn new(mut contact: Contact, today: NaiveDate) -> Self {
    let age = contact.age_on(today);
    let symptoms = std::mem::take(&mut contact.symptoms)
      .into_iter()
      .map(EntryView::from)
      .collect();
    Self {
      contact,
      symptoms,
      age,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct SymptomView {
  #[serde(flatten)]
  pub symptom:       Symptom,
  pub is_suspicious: bool,
}

impl From<Symptom> for SymptomView {
  fn from(symptom: Symptom) -> Self {
    Self {
      is_suspicious: symptom.is_suspicious(),
      symptom,
    }
  }
}
