//! Contact records, the primary entity of the people API.
//!
//! A [`Contact`] is the stored shape. [`NewContact`] and [`ContactPatch`] are
//! the validated inputs for creation and partial update; the repository turns
//! them into stored form, assigning identifiers and timestamps.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::symptom::{NewSymptomEntry, SymptomEntry};

// ─── Embedded records ────────────────────────────────────────────────────────

/// A coded administrative region (department, province or district).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
  pub code: String,
  pub name: String,
}

/// Where a contact lives. Replaced as a whole on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub department: Option<Region>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub province:   Option<Region>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub district:   Option<Region>,
  /// Main address line.
  pub street:     String,
}

/// The health facility (EESS) a contact is registered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthFacility {
  pub code: String,
  pub name: String,
}

/// Pre-existing conditions. Replaced as a whole on update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comorbidity {
  /// Cardiovascular disease.
  pub q1:  bool,
  /// Chronic kidney disease.
  pub q2:  bool,
  /// Chronic respiratory disease.
  pub q3:  bool,
  /// Chronic liver disease.
  pub q4:  bool,
  /// Diabetes.
  pub q5:  bool,
  /// Cancer.
  pub q6:  bool,
  /// HIV.
  pub q7:  bool,
  /// Active tuberculosis.
  pub q8:  bool,
  /// Chronic neurological disorder.
  pub q9:  bool,
  /// Sickle cell disorder.
  pub q10: bool,
  /// Tobacco use.
  pub q11: bool,
  /// Severe obesity (BMI over 40).
  pub q12: bool,
  /// Hypertension.
  pub q13: bool,
  /// Pregnant.
  pub q14: bool,
  /// Older than 60.
  pub q15: bool,
  /// Health worker.
  pub q16: bool,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A contact as stored. `contact_id` lives under `_id` in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
  pub contact_id:                   String,
  /// Non-owning link to the contact this one was traced from.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parent_contact_id:            Option<String>,
  /// Device identifier, usable as a secondary lookup key.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub imei:                         Option<String>,
  pub name:                         String,
  pub first_name:                   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_name:                    Option<String>,
  pub doc_type:                     String,
  pub doc_number:                   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birth:                        Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone_number:                 Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cellphone_number:             Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub alternative_cellphone_number: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:                      Option<Address>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub comorbidity:                  Option<Comorbidity>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub eess:                         Option<HealthFacility>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub symptoms:                     Vec<SymptomEntry>,
  /// Unix seconds; set once at creation.
  pub created:                      i64,
  /// Unix seconds; refreshed on every mutation.
  pub updated:                      i64,
}

impl Contact {
  /// Whole years between `birth` and `today`, if a birth date is known and
  /// not in the future.
  pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
    self.birth.and_then(|birth| today.years_since(birth))
  }
}

// ─── NewContact ──────────────────────────────────────────────────────────────

/// Body of `POST /people`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewContact {
  #[serde(default)]
  pub parent_contact_id:            Option<String>,
  #[serde(default)]
  pub imei:                         Option<String>,
  pub name:                         String,
  pub first_name:                   String,
  #[serde(default)]
  pub last_name:                    Option<String>,
  pub doc_type:                     String,
  pub doc_number:                   String,
  #[serde(default)]
  pub birth:                        Option<NaiveDate>,
  #[serde(default)]
  pub phone_number:                 Option<String>,
  #[serde(default)]
  pub cellphone_number:             Option<String>,
  #[serde(default)]
  pub alternative_cellphone_number: Option<String>,
  #[serde(default)]
  pub address:                      Option<Address>,
  #[serde(default)]
  pub comorbidity:                  Option<Comorbidity>,
  #[serde(default)]
  pub eess:                         Option<HealthFacility>,
  #[serde(default)]
  pub symptoms:                     Vec<NewSymptomEntry>,
}

impl NewContact {
  /// Convenience constructor with all optional fields left empty.
  pub fn new(
    name: impl Into<String>,
    first_name: impl Into<String>,
    doc_type: impl Into<String>,
    doc_number: impl Into<String>,
  ) -> Self {
    Self {
      parent_contact_id:            None,
      imei:                         None,
      name:                         name.into(),
      first_name:                   first_name.into(),
      last_name:                    None,
      doc_type:                     doc_type.into(),
      doc_number:                   doc_number.into(),
      birth:                        None,
      phone_number:                 None,
      cellphone_number:             None,
      alternative_cellphone_number: None,
      address:                      None,
      comorbidity:                  None,
      eess:                         None,
      symptoms:                     Vec::new(),
    }
  }

  /// Build the stored form. Each embedded symptom gets an id from `next_id`.
  pub(crate) fn into_contact(
    self,
    contact_id: String,
    now: i64,
    mut next_id: impl FnMut() -> String,
  ) -> Contact {
    Contact {
      contact_id,
      parent_contact_id: self.parent_contact_id,
      imei: self.imei,
      name: self.name,
      first_name: self.first_name,
      last_name: self.last_name,
      doc_type: self.doc_type,
      doc_number: self.doc_number,
      birth: self.birth,
      phone_number: self.phone_number,
      cellphone_number: self.cellphone_number,
      alternative_cellphone_number: self.alternative_cellphone_number,
      address: self.address,
      comorbidity: self.comorbidity,
      eess: self.eess,
      symptoms: self
        .symptoms
        .into_iter()
        .map(|entry| entry.into_entry(next_id(), now))
        .collect(),
      created: now,
      updated: now,
    }
  }
}

// ─── ContactPatch ────────────────────────────────────────────────────────────

/// Body of `PATCH /people/{id}`. Only the fields present are written;
/// `address`, `comorbidity`, `eess` and `symptoms` replace the stored value
/// as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parent_contact_id:            Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub imei:                         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:                         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_name:                   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_name:                    Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub doc_type:                     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub doc_number:                   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub birth:                        Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone_number:                 Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cellphone_number:             Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alternative_cellphone_number: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address:                      Option<Address>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comorbidity:                  Option<Comorbidity>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub eess:                         Option<HealthFacility>,
  /// Converted to stored entries by the repository, not serialised directly.
  #[serde(default, skip_serializing)]
  pub symptoms:                     Option<Vec<NewSymptomEntry>>,
}
