//! Server configuration: an optional TOML file overlaid by `PEOPLE_*`
//! environment variables, with built-in defaults for every field.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  /// SQLite database file; a leading `~/` is expanded at startup.
  pub store_path:          PathBuf,
  pub contacts_collection: String,
  pub symptoms_collection: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_string(),
      port:                8000,
      store_path:          PathBuf::from("~/.local/share/people/people.db"),
      contacts_collection: "people".to_string(),
      symptoms_collection: "symptoms".to_string(),
    }
  }
}

impl ServerConfig {
  /// Load from `path` (if it exists) and the process environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::layered(
      File::from(path).required(false),
      Environment::with_prefix("PEOPLE"),
    )
  }

  fn layered<F>(file: F, env: Environment) -> Result<Self, ConfigError>
  where
    F: config::Source + Send + Sync + 'static,
  {
    Config::builder()
      .add_source(file)
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
