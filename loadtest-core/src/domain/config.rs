//! Test configuration domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored load generator configuration
///
/// The body is the generator's own YAML document and is opaque to this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub id: String,
    pub folder_id: String,
    pub yaml_string: String,
    pub created_at: Option<DateTime<Utc>>,
}
