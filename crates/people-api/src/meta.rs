//! Service endpoints that do not touch the store.

use axum::Json;
use people_core::schema::{
  ADDRESS_FIELDS, ALARM_SIGNAL_FIELDS, COMORBIDITY_FIELDS, CONTACT_FIELDS, REGION_FIELDS,
  SYMPTOM_FIELDS,
};
use serde_json::{Value, json};

/// `GET /health`
pub async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

/// `GET /schema`: the field registries, keyed by record kind.
pub async fn schema() -> Json<Value> {
  Json(json!({
    "contact": CONTACT_FIELDS,
    "address": ADDRESS_FIELDS,
    "region": REGION_FIELDS,
    "comorbidity": COMORBIDITY_FIELDS,
    "symptom": SYMPTOM_FIELDS,
    "alarm_signal": ALARM_SIGNAL_FIELDS,
  }))
}
