//! Async HTTP client wrapping the people JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;

/// Connection settings for the people API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the people JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self.client.request(method, self.url(path))
  }

  /// Send `req`; on success return the JSON body, if there is one.
  async fn execute(&self, label: &str, req: RequestBuilder) -> Result<Option<Value>> {
    let resp = req.send().await.with_context(|| format!("{label} failed"))?;
    let status = resp.status();
    tracing::debug!(%status, "{label}");

    if !status.is_success() {
      return Err(failure(label, resp).await);
    }
    if status == reqwest::StatusCode::NO_CONTENT {
      return Ok(None);
    }
    let body = resp
      .json()
      .await
      .with_context(|| format!("deserialising response to {label}"))?;
    Ok(Some(body))
  }

  async fn get(&self, path: &str) -> Result<Value> {
    let label = format!("GET {path}");
    self
      .execute(&label, self.request(Method::GET, path))
      .await?
      .ok_or_else(|| anyhow!("{label} returned no body"))
  }

  async fn post(&self, path: &str, body: &Value) -> Result<Value> {
    let label = format!("POST {path}");
    self
      .execute(&label, self.request(Method::POST, path).json(body))
      .await?
      .ok_or_else(|| anyhow!("{label} returned no body"))
  }

  async fn patch(&self, path: &str, body: &Value) -> Result<()> {
    let label = format!("PATCH {path}");
    self
      .execute(&label, self.request(Method::PATCH, path).json(body))
      .await?;
    Ok(())
  }

  async fn delete(&self, path: &str) -> Result<()> {
    let label = format!("DELETE {path}");
    self.execute(&label, self.request(Method::DELETE, path)).await?;
    Ok(())
  }

  // ── People ────────────────────────────────────────────────────────────────

  /// `GET /people`
  pub async fn list_people(&self) -> Result<Value> { self.get("/people").await }

  /// `GET /people/{id}`
  pub async fn get_person(&self, id: &str) -> Result<Value> {
    self.get(&format!("/people/{id}")).await
  }

  /// `GET /imei/{imei}`
  pub async fn get_person_by_imei(&self, imei: &str) -> Result<Value> {
    self.get(&format!("/imei/{imei}")).await
  }

  /// `POST /people`
  pub async fn create_person(&self, body: &Value) -> Result<Value> {
    self.post("/people", body).await
  }

  /// `PATCH /people/{id}`
  pub async fn update_person(&self, id: &str, body: &Value) -> Result<()> {
    self.patch(&format!("/people/{id}"), body).await
  }

  /// `PATCH /people-symptom/{id}`
  pub async fn add_symptom(&self, id: &str, body: &Value) -> Result<()> {
    self.patch(&format!("/people-symptom/{id}"), body).await
  }

  /// `PATCH /people-symptom-alarmsignal/{id}`
  pub async fn add_alarm_signal(&self, id: &str, body: &Value) -> Result<()> {
    self
      .patch(&format!("/people-symptom-alarmsignal/{id}"), body)
      .await
  }

  /// `DELETE /people/{id}`
  pub async fn delete_person(&self, id: &str) -> Result<()> {
    self.delete(&format!("/people/{id}")).await
  }

  // ── Symptoms ──────────────────────────────────────────────────────────────

  /// `GET /symptoms`, or `GET /person-symptoms/{id}` when scoped to a contact.
  pub async fn list_symptoms(&self, contact_id: Option<&str>) -> Result<Value> {
    match contact_id {
      Some(id) => self.get(&format!("/person-symptoms/{id}")).await,
      None => self.get("/symptoms").await,
    }
  }

  /// `GET /symptoms/{id}`
  pub async fn get_symptom(&self, id: &str) -> Result<Value> {
    self.get(&format!("/symptoms/{id}")).await
  }

  /// `POST /symptoms`
  pub async fn create_symptom(&self, body: &Value) -> Result<Value> {
    self.post("/symptoms", body).await
  }

  /// `PATCH /symptoms/{id}`
  pub async fn update_symptom(&self, id: &str, body: &Value) -> Result<()> {
    self.patch(&format!("/symptoms/{id}"), body).await
  }

  /// `DELETE /symptoms/{id}`
  pub async fn delete_symptom(&self, id: &str) -> Result<()> {
    self.delete(&format!("/symptoms/{id}")).await
  }
}

/// Turn an error response into a readable error, using the server's
/// `message` (and `identifier`, if present) when the body carries them.
async fn failure(label: &str, resp: Response) -> anyhow::Error {
  let status = resp.status();
  let body: Option<Value> = resp.json().await.ok();
  let message = body
    .as_ref()
    .and_then(|b| b.get("message"))
    .and_then(Value::as_str);
  let identifier = body
    .as_ref()
    .and_then(|b| b.get("identifier"))
    .and_then(Value::as_str);

  match (message, identifier) {
    (Some(m), Some(id)) => anyhow!("{label} → {status}: {m} ({id})"),
    (Some(m), None) => anyhow!("{label} → {status}: {m}"),
    _ => anyhow!("{label} → {status}"),
  }
}
