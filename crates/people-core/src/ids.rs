//! Identifier and clock helpers shared by the repositories.

use chrono::Utc;
use uuid::Uuid;

/// A fresh 36-character hyphenated UUID v4. Never checked against the store.
pub fn new_id() -> String { Uuid::new_v4().hyphenated().to_string() }

/// Current wall-clock time as Unix seconds.
pub fn now() -> i64 { Utc::now().timestamp() }
