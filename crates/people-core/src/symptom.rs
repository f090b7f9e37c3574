//! Symptom records: the top-level [`Symptom`] entity, the [`SymptomEntry`]
//! embedded in a contact, and the [`AlarmSignal`] attached to either.

use serde::{Deserialize, Serialize};

// ─── Answers ─────────────────────────────────────────────────────────────────

/// The symptom questionnaire. Unanswered questions read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymptomAnswers {
  /// Cough and/or sore throat.
  pub q1:  bool,
  /// General malaise.
  pub q2:  bool,
  /// Fever above 38 °C.
  pub q3:  bool,
  /// Headache.
  pub q4:  bool,
  /// Nasal congestion.
  pub q5:  bool,
  /// Diarrhea.
  pub q6:  bool,
  /// Difficulty breathing.
  pub q7:  bool,
  /// Loss of smell (anosmia).
  pub q8:  bool,
  /// Loss of taste (ageusia).
  pub q9:  bool,
  /// Any other symptom, described in free text.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q10: Option<String>,
}

impl SymptomAnswers {
  /// Whether any symptom was reported.
  pub fn any_reported(&self) -> bool {
    [
      self.q1, self.q2, self.q3, self.q4, self.q5, self.q6, self.q7, self.q8,
      self.q9,
    ]
    .into_iter()
    .any(|answer| answer)
      || self.q10.as_deref().is_some_and(|other| !other.trim().is_empty())
  }
}

/// Warning signs recorded on top of a symptom report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmSignal {
  /// Dyspnea.
  pub q1: bool,
  /// Tachypnea (22 or more breaths per minute).
  pub q2: bool,
  /// Oxygen saturation below 92 %.
  pub q3: bool,
  /// Altered consciousness.
  pub q4: bool,
  /// Some other warning sign.
  pub q5: bool,
  /// None of the above.
  pub q6: bool,
}

impl AlarmSignal {
  pub fn any_warning(&self) -> bool {
    self.q1 || self.q2 || self.q3 || self.q4 || self.q5
  }
}

/// A report is suspicious when any symptom or any warning sign is present.
pub fn is_suspicious(answers: &SymptomAnswers, alarm: Option<&AlarmSignal>) -> bool {
  answers.any_reported() || alarm.is_some_and(AlarmSignal::any_warning)
}

// ─── Embedded entries ────────────────────────────────────────────────────────

/// A symptom report stored inside a contact's `symptoms` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomEntry {
  /// Only meaningful within the owning contact.
  pub entry_id:     String,
  #[serde(flatten)]
  pub answers:      SymptomAnswers,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub latitude:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub longitude:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub alarm_signal: Option<AlarmSignal>,
  pub created:      i64,
  pub updated:      i64,
}

impl SymptomEntry {
  pub fn is_suspicious(&self) -> bool {
    is_suspicious(&self.answers, self.alarm_signal.as_ref())
  }
}

/// Body of `PATCH /people-symptom/{id}`, and of each item of a contact's
/// `symptoms` when creating or replacing them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewSymptomEntry {
  #[serde(flatten)]
  pub answers:   SymptomAnswers,
  #[serde(default)]
  pub latitude:  Option<String>,
  #[serde(default)]
  pub longitude: Option<String>,
}

impl NewSymptomEntry {
  pub(crate) fn into_entry(self, entry_id: String, now: i64) -> SymptomEntry {
    SymptomEntry {
      entry_id,
      answers: self.answers,
      latitude: self.latitude,
      longitude: self.longitude,
      alarm_signal: None,
      created: now,
      updated: now,
    }
  }
}

/// Body of `PATCH /people-symptom-alarmsignal/{id}`.
///
/// Without an `entry_id` the signal lands on the contact's most recent entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlarmSignalInput {
  #[serde(default)]
  pub entry_id: Option<String>,
  #[serde(flatten)]
  pub signal:   AlarmSignal,
}

// ─── Top-level symptom ───────────────────────────────────────────────────────

/// A symptom report stored in its own collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
  pub symptom_id:   String,
  /// The contact this report belongs to.
  pub contact_id:   String,
  #[serde(flatten)]
  pub answers:      SymptomAnswers,
  pub latitude:     String,
  pub longitude:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub alarm_signal: Option<AlarmSignal>,
  pub created:      i64,
  pub updated:      i64,
}

impl Symptom {
  pub fn is_suspicious(&self) -> bool {
    is_suspicious(&self.answers, self.alarm_signal.as_ref())
  }
}

/// Body of `POST /symptoms`. `created`/`updated` and the id are assigned by
/// the repository.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewSymptom {
  pub contact_id:   String,
  #[serde(flatten)]
  pub answers:      SymptomAnswers,
  pub latitude:     String,
  pub longitude:    String,
  #[serde(default)]
  pub alarm_signal: Option<AlarmSignal>,
}

impl NewSymptom {
  /// Convenience constructor with every answer left unset.
  pub fn new(
    contact_id: impl Into<String>,
    latitude: impl Into<String>,
    longitude: impl Into<String>,
  ) -> Self {
    Self {
      contact_id:   contact_id.into(),
      answers:      SymptomAnswers::default(),
      latitude:     latitude.into(),
      longitude:    longitude.into(),
      alarm_signal: None,
    }
  }

  pub(crate) fn into_symptom(self, symptom_id: String, now: i64) -> Symptom {
    Symptom {
      symptom_id,
      contact_id: self.contact_id,
      answers: self.answers,
      latitude: self.latitude,
      longitude: self.longitude,
      alarm_signal: self.alarm_signal,
      created: now,
      updated: now,
    }
  }
}

/// Body of `PATCH /symptoms/{id}`. Only the fields present are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q1:           Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q2:           Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q3:           Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q4:           Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q5:           Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q6:           Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q7:           Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q8:           Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q9:           Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q10:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub latitude:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub longitude:    Option<String>,
  /// Replaces the whole alarm signal.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alarm_signal: Option<AlarmSignal>,
}
