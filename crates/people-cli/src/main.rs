//! `people`: command-line client for the people API.
//!
//! # Usage
//!
//! ```text
//! people --url http://localhost:8000 list
//! people create john.json
//! people symptoms --contact 62c64bab-1f44-49dc-9ba3-6af33c887a12
//! ```
//!
//! Request bodies are read from JSON files and checked locally against the
//! same rules the server applies before they are sent.

mod client;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use people_core::{
  contact::{ContactPatch, NewContact},
  schema::Validate,
  symptom::{AlarmSignalInput, NewSymptom, NewSymptomEntry, SymptomPatch},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "people", about = "Command-line client for the people API")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the people server (default: http://localhost:8000).
  #[arg(long, env = "PEOPLE_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
  /// List every person.
  List,
  /// Show one person.
  Get { id: String },
  /// Show the person registered with a device IMEI.
  Imei { imei: String },
  /// Create a person from a JSON file.
  Create { file: PathBuf },
  /// Update the fields of a person present in a JSON file.
  Update { id: String, file: PathBuf },
  /// Append a symptom report to a person.
  AddSymptom { id: String, file: PathBuf },
  /// Attach an alarm signal to one of a person's symptom reports.
  Alarm { id: String, file: PathBuf },
  /// Delete a person.
  Delete { id: String },
  /// List symptom reports, optionally only those of one person.
  Symptoms {
    #[arg(long, value_name = "ID")]
    contact: Option<String>,
  },
  /// Show one symptom report.
  Symptom { id: String },
  /// Create a symptom report from a JSON file.
  CreateSymptom { file: PathBuf },
  /// Update the fields of a symptom report present in a JSON file.
  UpdateSymptom { id: String, file: PathBuf },
  /// Delete a symptom report.
  DeleteSymptom { id: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// CLI flag (or `PEOPLE_URL`) overrides the config file, which overrides the
/// default.
fn resolve_url(flag: Option<String>, file_cfg: &ConfigFile) -> String {
  flag
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Request bodies ───────────────────────────────────────────────────────────

/// Read a JSON body from `path` and check it as a `T` before sending it
/// unchanged.
fn read_body<T>(path: &Path) -> Result<Value>
where
  T: DeserializeOwned + Validate,
{
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading {}", path.display()))?;
  let value: Value =
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
  let typed: T = serde_json::from_value(value.clone())
    .with_context(|| format!("{} is not a valid request body", path.display()))?;
  typed
    .validate()
    .with_context(|| format!("{} failed validation", path.display()))?;
  Ok(value)
}

fn print(value: &Value) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(ApiConfig {
    base_url: resolve_url(args.url, &file_cfg),
  })?;

  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::List => print(&client.list_people().await?),
    Command::Get { id } => print(&client.get_person(&id).await?),
    Command::Imei { imei } => print(&client.get_person_by_imei(&imei).await?),
    Command::Create { file } => {
      let body = read_body::<NewContact>(&file)?;
      print(&client.create_person(&body).await?)
    }
    Command::Update { id, file } => {
      let body = read_body::<ContactPatch>(&file)?;
      client.update_person(&id, &body).await?;
      tracing::info!(%id, "person updated");
      Ok(())
    }
    Command::AddSymptom { id, file } => {
      let body = read_body::<NewSymptomEntry>(&file)?;
      client.add_symptom(&id, &body).await?;
      tracing::info!(%id, "symptom report added");
      Ok(())
    }
    Command::Alarm { id, file } => {
      let body = read_body::<AlarmSignalInput>(&file)?;
      client.add_alarm_signal(&id, &body).await?;
      tracing::info!(%id, "alarm signal set");
      Ok(())
    }
    Command::Delete { id } => {
      client.delete_person(&id).await?;
      tracing::info!(%id, "person deleted");
      Ok(())
    }
    Command::Symptoms { contact } => print(&client.list_symptoms(contact.as_deref()).await?),
    Command::Symptom { id } => print(&client.get_symptom(&id).await?),
    Command::CreateSymptom { file } => {
      let body = read_body::<NewSymptom>(&file)?;
      print(&client.create_symptom(&body).await?)
    }
    Command::UpdateSymptom { id, file } => {
      let body = read_body::<SymptomPatch>(&file)?;
      client.update_symptom(&id, &body).await?;
      tracing::info!(%id, "symptom report updated");
      Ok(())
    }
    Command::DeleteSymptom { id } => {
      client.delete_symptom(&id).await?;
      tracing::info!(%id, "symptom report deleted");
      Ok(())
    }
  }
}
