//! Integration tests for `SqliteDocumentStore` and the repositories built on
//! it, against an in-memory database.

use std::sync::Arc;

use chrono::NaiveDate;
use people_core::{
  ContactRepository, EntityKind, Error, SymptomRepository,
  contact::{Address, Comorbidity, ContactPatch, NewContact, Region},
  store::{Document, DocumentStore, Filter, InsertOutcome, Update},
  symptom::{AlarmSignal, AlarmSignalInput, NewSymptom, NewSymptomEntry, SymptomPatch},
};
use serde_json::{Value, json};

use crate::SqliteDocumentStore;

async fn store() -> Arc<SqliteDocumentStore> {
  Arc::new(
    SqliteDocumentStore::open_in_memory()
      .await
      .expect("in-memory store"),
  )
}

async fn contacts() -> ContactRepository<SqliteDocumentStore> {
  ContactRepository::new(store().await, "people")
}

async fn symptoms() -> SymptomRepository<SqliteDocumentStore> {
  SymptomRepository::new(store().await, "symptoms")
}

fn doc(value: Value) -> Document {
  match value {
    Value::Object(map) => map,
    other => panic!("not an object: {other}"),
  }
}

fn john() -> NewContact { NewContact::new("John", "Doe", "DNI", "45117789") }

fn assert_not_found(err: Error, kind: EntityKind, id: &str) {
  match err {
    Error::NotFound { kind: k, id: i } => {
      assert_eq!(k, kind);
      assert_eq!(i, id);
    }
    other => panic!("expected NotFound, got {other:?}"),
  }
}

// ─── Raw store ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_by_id() {
  let s = store().await;
  let outcome = s
    .insert_one("people", doc(json!({ "_id": "a", "name": "John" })))
    .await
    .unwrap();
  assert_eq!(outcome, InsertOutcome::Inserted("a".into()));

  let found = s.find_one("people", Filter::id("a")).await.unwrap().unwrap();
  assert_eq!(found["name"], "John");
}

#[tokio::test]
async fn duplicate_id_is_reported_not_overwritten() {
  let s = store().await;
  s.insert_one("people", doc(json!({ "_id": "a", "name": "John" })))
    .await
    .unwrap();
  let outcome = s
    .insert_one("people", doc(json!({ "_id": "a", "name": "Jane" })))
    .await
    .unwrap();
  assert_eq!(outcome, InsertOutcome::Duplicate("a".into()));

  let found = s.find_one("people", Filter::id("a")).await.unwrap().unwrap();
  assert_eq!(found["name"], "John");
}

#[tokio::test]
async fn same_id_in_different_collections() {
  let s = store().await;
  s.insert_one("people", doc(json!({ "_id": "a" }))).await.unwrap();
  let outcome = s
    .insert_one("symptoms", doc(json!({ "_id": "a" })))
    .await
    .unwrap();
  assert!(matches!(outcome, InsertOutcome::Inserted(_)));
  assert_eq!(s.find("people", Filter::All).await.unwrap().len(), 1);
}

#[tokio::test]
async fn insert_without_id_errors() {
  let s = store().await;
  let err = s
    .insert_one("people", doc(json!({ "name": "John" })))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::MissingId { .. }));
}

#[tokio::test]
async fn find_by_field_equality() {
  let s = store().await;
  s.insert_one("symptoms", doc(json!({ "_id": "1", "contact_id": "c1", "q1": true })))
    .await
    .unwrap();
  s.insert_one("symptoms", doc(json!({ "_id": "2", "contact_id": "c2", "q1": false })))
    .await
    .unwrap();
  s.insert_one("symptoms", doc(json!({ "_id": "3", "contact_id": "c1", "q1": false })))
    .await
    .unwrap();

  let owned = s
    .find("symptoms", Filter::eq("contact_id", "c1"))
    .await
    .unwrap();
  let ids: Vec<_> = owned.iter().map(|d| d["_id"].as_str().unwrap()).collect();
  assert_eq!(ids, ["1", "3"]);

  let coughing = s.find("symptoms", Filter::eq("q1", true)).await.unwrap();
  assert_eq!(coughing.len(), 1);
}

#[tokio::test]
async fn update_reports_matched_and_modified() {
  let s = store().await;
  s.insert_one("people", doc(json!({ "_id": "a", "name": "John" })))
    .await
    .unwrap();

  let changed = s
    .update_one("people", Filter::id("a"), Update::set(doc(json!({ "name": "Jane" }))))
    .await
    .unwrap();
  assert_eq!((changed.matched, changed.modified), (1, 1));

  let same = s
    .update_one("people", Filter::id("a"), Update::set(doc(json!({ "name": "Jane" }))))
    .await
    .unwrap();
  assert_eq!((same.matched, same.modified), (1, 0));

  let missing = s
    .update_one("people", Filter::id("b"), Update::set(doc(json!({ "name": "X" }))))
    .await
    .unwrap();
  assert_eq!((missing.matched, missing.modified), (0, 0));
}

#[tokio::test]
async fn delete_reports_count() {
  let s = store().await;
  s.insert_one("people", doc(json!({ "_id": "a" }))).await.unwrap();
  assert_eq!(s.delete_one("people", Filter::id("a")).await.unwrap(), 1);
  assert_eq!(s.delete_one("people", Filter::id("a")).await.unwrap(), 0);
  assert!(s.find_one("people", Filter::id("a")).await.unwrap().is_none());
}

#[tokio::test]
async fn reopening_a_file_keeps_documents() {
  let path = std::env::temp_dir().join(format!("people-store-{}.db", people_core::ids::new_id()));
  {
    let s = SqliteDocumentStore::open(&path).await.unwrap();
    s.insert_one("people", doc(json!({ "_id": "a" }))).await.unwrap();
  }
  let s = SqliteDocumentStore::open(&path).await.unwrap();
  assert!(s.find_one("people", Filter::id("a")).await.unwrap().is_some());
  drop(s);
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
  }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_round_trips_fields() {
  let repo = contacts().await;
  let mut input = john();
  input.imei = Some("356938035643809".into());
  input.birth = NaiveDate::from_ymd_opt(1999, 12, 31);
  input.address = Some(Address {
    department: Some(Region {
      code: "15".into(),
      name: "LIMA".into(),
    }),
    province:   None,
    district:   None,
    street:     "Av. Arequipa 123".into(),
  });

  let created = repo.create(input.clone()).await.unwrap();
  assert_eq!(created.contact_id.len(), 36);
  assert_eq!(created.created, created.updated);

  let fetched = repo.get_by_id(&created.contact_id).await.unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.name, input.name);
  assert_eq!(fetched.first_name, input.first_name);
  assert_eq!(fetched.doc_type, input.doc_type);
  assert_eq!(fetched.doc_number, input.doc_number);
  assert_eq!(fetched.birth, input.birth);
  assert_eq!(fetched.address, input.address);
  assert_eq!(fetched.imei, input.imei);
}

#[tokio::test]
async fn get_by_imei() {
  let repo = contacts().await;
  let mut input = john();
  input.imei = Some("111".into());
  let created = repo.create(input).await.unwrap();
  repo.create(john()).await.unwrap();

  let fetched = repo.get_by_imei("111").await.unwrap();
  assert_eq!(fetched.contact_id, created.contact_id);

  let err = repo.get_by_imei("222").await.unwrap_err();
  assert_not_found(err, EntityKind::Contact, "222");
}

#[tokio::test]
async fn list_returns_every_contact() {
  let repo = contacts().await;
  assert!(repo.list().await.unwrap().is_empty());
  repo.create(john()).await.unwrap();
  repo.create(NewContact::new("Ana", "Diaz", "CE", "001")).await.unwrap();
  assert_eq!(repo.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn partial_update_touches_only_given_fields() {
  let repo = contacts().await;
  let created = repo.create(john()).await.unwrap();

  let patch = ContactPatch {
    name: Some("Jane".into()),
    ..ContactPatch::default()
  };
  repo.update(&created.contact_id, patch).await.unwrap();

  let fetched = repo.get_by_id(&created.contact_id).await.unwrap();
  assert_eq!(fetched.name, "Jane");
  assert_eq!(fetched.first_name, "Doe");
  assert_eq!(fetched.doc_type, "DNI");
  assert_eq!(fetched.doc_number, "45117789");
  assert_eq!(fetched.created, created.created);
  assert!(fetched.updated >= created.updated);
}

#[tokio::test]
async fn repeated_update_is_idempotent() {
  let repo = contacts().await;
  let created = repo.create(john()).await.unwrap();
  let patch = ContactPatch {
    comorbidity: Some(Comorbidity {
      q5: true,
      ..Comorbidity::default()
    }),
    ..ContactPatch::default()
  };

  repo.update(&created.contact_id, patch.clone()).await.unwrap();
  let first = repo.get_by_id(&created.contact_id).await.unwrap();
  repo.update(&created.contact_id, patch).await.unwrap();
  let second = repo.get_by_id(&created.contact_id).await.unwrap();

  assert_eq!(first.comorbidity, second.comorbidity);
  assert!(second.comorbidity.unwrap().q5);
  assert!(second.updated >= first.updated);
}

#[tokio::test]
async fn update_replaces_symptoms_wholesale() {
  let repo = contacts().await;
  let created = repo.create(john()).await.unwrap();
  repo
    .add_symptom(&created.contact_id, NewSymptomEntry::default())
    .await
    .unwrap();

  let replacement = NewSymptomEntry {
    latitude: Some("-12.04".into()),
    ..NewSymptomEntry::default()
  };
  let patch = ContactPatch {
    symptoms: Some(vec![replacement.clone(), replacement]),
    ..ContactPatch::default()
  };
  repo.update(&created.contact_id, patch).await.unwrap();

  let fetched = repo.get_by_id(&created.contact_id).await.unwrap();
  assert_eq!(fetched.symptoms.len(), 2);
  assert!(fetched.symptoms.iter().all(|e| e.latitude.as_deref() == Some("-12.04")));
  assert_ne!(fetched.symptoms[0].entry_id, fetched.symptoms[1].entry_id);
}

#[tokio::test]
async fn add_symptom_appends_in_order() {
  let repo = contacts().await;
  let created = repo.create(john()).await.unwrap();

  let mut first = NewSymptomEntry::default();
  first.answers.q1 = true;
  let mut second = NewSymptomEntry::default();
  second.answers.q3 = true;

  let first_id = repo.add_symptom(&created.contact_id, first).await.unwrap();
  let second_id = repo.add_symptom(&created.contact_id, second).await.unwrap();

  let fetched = repo.get_by_id(&created.contact_id).await.unwrap();
  assert_eq!(fetched.symptoms.len(), 2);
  assert_eq!(fetched.symptoms[0].entry_id, first_id);
  assert!(fetched.symptoms[0].answers.q1);
  assert_eq!(fetched.symptoms[1].entry_id, second_id);
  assert!(fetched.symptoms[1].answers.q3);
  assert!(fetched.updated >= created.updated);
}

#[tokio::test]
async fn alarm_signal_defaults_to_latest_entry() {
  let repo = contacts().await;
  let created = repo.create(john()).await.unwrap();
  repo
    .add_symptom(&created.contact_id, NewSymptomEntry::default())
    .await
    .unwrap();
  repo
    .add_symptom(&created.contact_id, NewSymptomEntry::default())
    .await
    .unwrap();

  let input = AlarmSignalInput {
    entry_id: None,
    signal:   AlarmSignal {
      q3: true,
      ..AlarmSignal::default()
    },
  };
  repo
    .add_alarm_signal(&created.contact_id, input)
    .await
    .unwrap();

  let fetched = repo.get_by_id(&created.contact_id).await.unwrap();
  assert!(fetched.symptoms[0].alarm_signal.is_none());
  assert!(fetched.symptoms[1].alarm_signal.unwrap().q3);
  assert!(fetched.symptoms[1].is_suspicious());
}

#[tokio::test]
async fn alarm_signal_addresses_entry_by_id() {
  let repo = contacts().await;
  let created = repo.create(john()).await.unwrap();
  let first_id = repo
    .add_symptom(&created.contact_id, NewSymptomEntry::default())
    .await
    .unwrap();
  repo
    .add_symptom(&created.contact_id, NewSymptomEntry::default())
    .await
    .unwrap();

  let input = AlarmSignalInput {
    entry_id: Some(first_id),
    signal:   AlarmSignal {
      q1: true,
      ..AlarmSignal::default()
    },
  };
  repo
    .add_alarm_signal(&created.contact_id, input)
    .await
    .unwrap();

  let fetched = repo.get_by_id(&created.contact_id).await.unwrap();
  assert!(fetched.symptoms[0].alarm_signal.unwrap().q1);
  assert!(fetched.symptoms[1].alarm_signal.is_none());
}

#[tokio::test]
async fn alarm_signal_without_entries_is_not_found() {
  let repo = contacts().await;
  let created = repo.create(john()).await.unwrap();

  let err = repo
    .add_alarm_signal(&created.contact_id, AlarmSignalInput::default())
    .await
    .unwrap_err();
  assert_not_found(err, EntityKind::Contact, &created.contact_id);

  let err = repo
    .add_alarm_signal(&created.contact_id, AlarmSignalInput {
      entry_id: Some("nope".into()),
      signal:   AlarmSignal::default(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { .. }));

  // A failed element update leaves the contact untouched.
  let fetched = repo.get_by_id(&created.contact_id).await.unwrap();
  assert_eq!(fetched.updated, created.updated);
}

#[tokio::test]
async fn unknown_contact_is_not_found_everywhere() {
  let repo = contacts().await;
  let id = "00000000-0000-0000-0000-000000000000";

  assert_not_found(repo.get_by_id(id).await.unwrap_err(), EntityKind::Contact, id);
  assert_not_found(
    repo.update(id, ContactPatch::default()).await.unwrap_err(),
    EntityKind::Contact,
    id,
  );
  assert_not_found(
    repo.add_symptom(id, NewSymptomEntry::default()).await.unwrap_err(),
    EntityKind::Contact,
    id,
  );
  assert_not_found(
    repo
      .add_alarm_signal(id, AlarmSignalInput::default())
      .await
      .unwrap_err(),
    EntityKind::Contact,
    id,
  );
  assert_not_found(repo.delete(id).await.unwrap_err(), EntityKind::Contact, id);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
  let repo = contacts().await;
  let created = repo.create(john()).await.unwrap();
  repo.delete(&created.contact_id).await.unwrap();

  let err = repo.get_by_id(&created.contact_id).await.unwrap_err();
  assert_not_found(err, EntityKind::Contact, &created.contact_id);
}

#[tokio::test]
async fn malformed_document_is_a_serialization_error() {
  let s = store().await;
  s.insert_one("people", doc(json!({ "_id": "broken", "name": 42 })))
    .await
    .unwrap();
  let repo = ContactRepository::new(s, "people");

  let err = repo.get_by_id("broken").await.unwrap_err();
  assert!(matches!(err, Error::Serialization(_)));
}

// ─── Symptoms ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn symptom_create_get_and_scoped_list() {
  let repo = symptoms().await;
  let mut input = NewSymptom::new("c-1", "-12.04", "-77.03");
  input.answers.q7 = true;

  let created = repo.create(input).await.unwrap();
  assert_eq!(created.symptom_id.len(), 36);
  assert_eq!(created.created, created.updated);
  assert!(created.answers.q7);
  assert!(created.is_suspicious());

  repo
    .create(NewSymptom::new("c-2", "1", "2"))
    .await
    .unwrap();

  let fetched = repo.get_by_id(&created.symptom_id).await.unwrap();
  assert_eq!(fetched, created);

  assert_eq!(repo.list(None).await.unwrap().len(), 2);
  let scoped = repo.list(Some("c-1")).await.unwrap();
  assert_eq!(scoped.len(), 1);
  assert_eq!(scoped[0].symptom_id, created.symptom_id);
  assert!(repo.list(Some("c-3")).await.unwrap().is_empty());
}

#[tokio::test]
async fn symptom_update_and_delete() {
  let repo = symptoms().await;
  let created = repo
    .create(NewSymptom::new("c-1", "-12.04", "-77.03"))
    .await
    .unwrap();

  let patch = SymptomPatch {
    q2: Some(true),
    alarm_signal: Some(AlarmSignal {
      q6: true,
      ..AlarmSignal::default()
    }),
    ..SymptomPatch::default()
  };
  repo.update(&created.symptom_id, patch).await.unwrap();

  let fetched = repo.get_by_id(&created.symptom_id).await.unwrap();
  assert!(fetched.answers.q2);
  assert_eq!(fetched.latitude, "-12.04");
  assert!(fetched.alarm_signal.unwrap().q6);

  repo.delete(&created.symptom_id).await.unwrap();
  let err = repo.get_by_id(&created.symptom_id).await.unwrap_err();
  assert_not_found(err, EntityKind::Symptom, &created.symptom_id);
  let err = repo.delete(&created.symptom_id).await.unwrap_err();
  assert_not_found(err, EntityKind::Symptom, &created.symptom_id);
}

#[tokio::test]
async fn unknown_symptom_update_is_not_found() {
  let repo = symptoms().await;
  let err = repo
    .update("missing", SymptomPatch::default())
    .await
    .unwrap_err();
  assert_not_found(err, EntityKind::Symptom, "missing");
}
