//! Field metadata and input validation.
//!
//! Each record kind has one registry of [`FieldSpec`]s keyed by field name.
//! Every input variant (create, patch, embedded entry) checks its string
//! fields against the same registry; whether a field is required is expressed
//! by the variant's type (`String` vs `Option<String>`), not here.

use serde::Serialize;

use crate::{
  Error, Result,
  contact::{Address, ContactPatch, NewContact, Region},
  symptom::{AlarmSignalInput, NewSymptom, NewSymptomEntry, SymptomPatch},
};

// ─── Registry ────────────────────────────────────────────────────────────────

/// Metadata for one field, shared by all variants that carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
  pub name:        &'static str,
  pub description: &'static str,
  pub example:     &'static str,
  /// Minimum length in characters for string values.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_length:  Option<usize>,
}

const fn text(name: &'static str, description: &'static str, example: &'static str) -> FieldSpec {
  FieldSpec { name, description, example, min_length: Some(1) }
}

const fn plain(name: &'static str, description: &'static str, example: &'static str) -> FieldSpec {
  FieldSpec { name, description, example, min_length: None }
}

pub static CONTACT_FIELDS: &[FieldSpec] = &[
  plain("contact_id", "Unique identifier of this person", "62c64bab-1f44-49dc-9ba3-6af33c887a12"),
  plain("parent_contact_id", "Identifier of the person this contact was traced from", "62c64bab-1f44-49dc-9ba3-6af33c887a12"),
  text("imei", "IMEI of the device this person registered with", "356938035643809"),
  text("name", "Name of this person", "John"),
  text("first_name", "First name of this person", "Doe"),
  plain("last_name", "Last name of this person", "Smith"),
  text("doc_type", "Document type of this person", "DNI"),
  text("doc_number", "Document number of this person", "45117789"),
  plain("birth", "Date of birth, in format YYYY-MM-DD", "1999-12-31"),
  plain("age", "Age of this person, if date of birth is specified", "20"),
  plain("phone_number", "Phone number of this person", "014567890"),
  plain("cellphone_number", "Cellphone number of this person", "935397346"),
  plain("alternative_cellphone_number", "Alternative cellphone number of this person", "935397346"),
  plain("address", "Address where this person lives; replaced as a whole on update", ""),
  plain("comorbidity", "Comorbidity answers; replaced as a whole on update", ""),
  plain("eess", "Health facility this person is registered with", ""),
  plain("symptoms", "Symptom reports; replaced as a whole on update", ""),
  plain("created", "When the person was registered (Unix timestamp)", "1633305600"),
  plain("updated", "When the person was last updated (Unix timestamp)", "1633305600"),
];

pub static ADDRESS_FIELDS: &[FieldSpec] = &[
  text("street", "Main address line", "22nd Bunker Hill Avenue"),
  plain("department", "Department", ""),
  plain("province", "Province", ""),
  plain("district", "District", ""),
];

pub static REGION_FIELDS: &[FieldSpec] = &[
  text("code", "Code", "01"),
  text("name", "Name", "AMAZONAS"),
];

pub static COMORBIDITY_FIELDS: &[FieldSpec] = &[
  plain("q1", "Cardiovascular disease", "true"),
  plain("q2", "Chronic kidney disease", "true"),
  plain("q3", "Chronic respiratory disease", "true"),
  plain("q4", "Chronic liver disease", "true"),
  plain("q5", "Diabetes", "true"),
  plain("q6", "Cancer", "true"),
  plain("q7", "HIV", "true"),
  plain("q8", "Active tuberculosis", "true"),
  plain("q9", "Chronic neurological disorder", "true"),
  plain("q10", "Sickle cell disorder", "true"),
  plain("q11", "Tobacco use", "true"),
  plain("q12", "Severe obesity (BMI > 40)", "true"),
  plain("q13", "Hypertension", "true"),
  plain("q14", "Pregnant", "true"),
  plain("q15", "Older than 60", "true"),
  plain("q16", "Health worker", "true"),
];

pub static SYMPTOM_FIELDS: &[FieldSpec] = &[
  plain("symptom_id", "Unique identifier of this symptom report", "c7166343-0913-4dc2-91e5-569d7d66f905"),
  text("contact_id", "Identifier of the person this report belongs to", "62c64bab-1f44-49dc-9ba3-6af33c887a12"),
  text("entry_id", "Identifier of a report within its person", "c7166343-0913-4dc2-91e5-569d7d66f905"),
  plain("q1", "Cough and/or sore throat", "true"),
  plain("q2", "General malaise", "true"),
  plain("q3", "Fever > 38 °C", "true"),
  plain("q4", "Headache", "true"),
  plain("q5", "Nasal congestion", "true"),
  plain("q6", "Diarrhea", "true"),
  plain("q7", "Difficulty breathing", "true"),
  plain("q8", "Loss of smell (anosmia)", "true"),
  plain("q9", "Loss of taste (ageusia)", "true"),
  text("q10", "Other (describe)", "Rash"),
  plain("is_suspicious", "Whether the report is suspicious", "true"),
  text("latitude", "Latitude", "12.123123"),
  text("longitude", "Longitude", "12.123123"),
  plain("alarm_signal", "Warning signs", ""),
  plain("created", "When the report was registered (Unix timestamp)", "1633305600"),
  plain("updated", "When the report was last updated (Unix timestamp)", "1633305600"),
];

pub static ALARM_SIGNAL_FIELDS: &[FieldSpec] = &[
  plain("q1", "Dyspnea", "true"),
  plain("q2", "Tachypnea (>= 22 rpm)", "true"),
  plain("q3", "Oxygen saturation < 92%", "true"),
  plain("q4", "Altered consciousness", "true"),
  plain("q5", "Other warning sign", "true"),
  plain("q6", "None", "true"),
];

/// Look up `name` in `registry`.
pub fn field(registry: &'static [FieldSpec], name: &str) -> Option<&'static FieldSpec> {
  registry.iter().find(|spec| spec.name == name)
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Structural checks beyond what deserialisation already enforces.
pub trait Validate {
  fn validate(&self) -> Result<()>;
}

/// Check a present string value against its registered constraints.
fn check(registry: &'static [FieldSpec], name: &str, value: Option<&str>) -> Result<()> {
  let (Some(value), Some(spec)) = (value, field(registry, name)) else {
    return Ok(());
  };
  match spec.min_length {
    Some(min) if value.chars().count() < min => Err(Error::Validation {
      field:  spec.name,
      reason: format!("must be at least {min} character(s) long"),
    }),
    _ => Ok(()),
  }
}

impl Validate for Region {
  fn validate(&self) -> Result<()> {
    check(REGION_FIELDS, "code", Some(&self.code))?;
    check(REGION_FIELDS, "name", Some(&self.name))
  }
}

impl Validate for Address {
  fn validate(&self) -> Result<()> {
    check(ADDRESS_FIELDS, "street", Some(&self.street))?;
    for region in [&self.department, &self.province, &self.district]
      .into_iter()
      .flatten()
    {
      region.validate()?;
    }
    Ok(())
  }
}

impl Validate for NewSymptomEntry {
  fn validate(&self) -> Result<()> {
    check(SYMPTOM_FIELDS, "q10", self.answers.q10.as_deref())?;
    check(SYMPTOM_FIELDS, "latitude", self.latitude.as_deref())?;
    check(SYMPTOM_FIELDS, "longitude", self.longitude.as_deref())
  }
}

impl Validate for NewContact {
  fn validate(&self) -> Result<()> {
    check(CONTACT_FIELDS, "imei", self.imei.as_deref())?;
    check(CONTACT_FIELDS, "name", Some(&self.name))?;
    check(CONTACT_FIELDS, "first_name", Some(&self.first_name))?;
    check(CONTACT_FIELDS, "doc_type", Some(&self.doc_type))?;
    check(CONTACT_FIELDS, "doc_number", Some(&self.doc_number))?;
    if let Some(address) = &self.address {
      address.validate()?;
    }
    self.symptoms.iter().try_for_each(Validate::validate)
  }
}

impl Validate for ContactPatch {
  fn validate(&self) -> Result<()> {
    check(CONTACT_FIELDS, "imei", self.imei.as_deref())?;
    check(CONTACT_FIELDS, "name", self.name.as_deref())?;
    check(CONTACT_FIELDS, "first_name", self.first_name.as_deref())?;
    check(CONTACT_FIELDS, "doc_type", self.doc_type.as_deref())?;
    check(CONTACT_FIELDS, "doc_number", self.doc_number.as_deref())?;
    if let Some(address) = &self.address {
      address.validate()?;
    }
    self
      .symptoms
      .iter()
      .flatten()
      .try_for_each(Validate::validate)
  }
}

impl Validate for AlarmSignalInput {
  fn validate(&self) -> Result<()> {
    check(SYMPTOM_FIELDS, "entry_id", self.entry_id.as_deref())
  }
}

impl Validate for NewSymptom {
  fn validate(&self) -> Result<()> {
    check(SYMPTOM_FIELDS, "contact_id", Some(&self.contact_id))?;
    check(SYMPTOM_FIELDS, "q10", self.answers.q10.as_deref())?;
    check(SYMPTOM_FIELDS, "latitude", Some(&self.latitude))?;
    check(SYMPTOM_FIELDS, "longitude", Some(&self.longitude))
  }
}

impl Validate for SymptomPatch {
  fn validate(&self) -> Result<()> {
    check(SYMPTOM_FIELDS, "q10", self.q10.as_deref())?;
    check(SYMPTOM_FIELDS, "latitude", self.latitude.as_deref())?;
    check(SYMPTOM_FIELDS, "longitude", self.longitude.as_deref())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn registries_have_unique_names() {
    for registry in [
      CONTACT_FIELDS,
      ADDRESS_FIELDS,
      REGION_FIELDS,
      COMORBIDITY_FIELDS,
      SYMPTOM_FIELDS,
      ALARM_SIGNAL_FIELDS,
    ] {
      for (i, spec) in registry.iter().enumerate() {
        assert!(
          registry[i + 1..].iter().all(|other| other.name != spec.name),
          "duplicate field {}",
          spec.name
        );
      }
    }
  }

  #[test]
  fn create_rejects_empty_required_text() {
    let input = NewContact::new("John", "", "DNI", "45117789");
    let err = input.validate().unwrap_err();
    assert!(matches!(err, Error::Validation { field: "first_name", .. }));
  }

  #[test]
  fn create_accepts_minimal_contact() {
    assert!(NewContact::new("John", "Doe", "DNI", "45117789").validate().is_ok());
  }

  #[test]
  fn patch_checks_only_present_fields() {
    assert!(ContactPatch::default().validate().is_ok());

    let patch = ContactPatch {
      doc_number: Some(String::new()),
      ..ContactPatch::default()
    };
    assert!(matches!(
      patch.validate(),
      Err(Error::Validation { field: "doc_number", .. })
    ));
  }

  #[test]
  fn nested_address_is_checked() {
    let mut input = NewContact::new("John", "Doe", "DNI", "45117789");
    input.address = Some(Address {
      department: Some(Region {
        code: "01".into(),
        name: String::new(),
      }),
      province:   None,
      district:   None,
      street:     "Av. Arequipa 123".into(),
    });
    assert!(matches!(
      input.validate(),
      Err(Error::Validation { field: "name", .. })
    ));
  }

  #[test]
  fn symptom_coordinates_must_not_be_empty() {
    let input = NewSymptom::new("c-1", "", "-77.03");
    assert!(matches!(
      input.validate(),
      Err(Error::Validation { field: "latitude", .. })
    ));

    let entry = NewSymptomEntry {
      longitude: Some(String::new()),
      ..NewSymptomEntry::default()
    };
    assert!(matches!(
      entry.validate(),
      Err(Error::Validation { field: "longitude", .. })
    ));
  }

  #[test]
  fn alarm_signal_entry_id_must_not_be_empty() {
    assert!(AlarmSignalInput::default().validate().is_ok());
    let input = AlarmSignalInput {
      entry_id: Some(String::new()),
      ..AlarmSignalInput::default()
    };
    assert!(matches!(
      input.validate(),
      Err(Error::Validation { field: "entry_id", .. })
    ));
  }

  #[test]
  fn lookup_finds_registered_fields() {
    let spec = field(CONTACT_FIELDS, "doc_type").unwrap();
    assert_eq!(spec.example, "DNI");
    assert!(field(CONTACT_FIELDS, "nope").is_none());
  }
}
