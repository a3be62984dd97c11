//! Long-running operation model
//!
//! Every mutating call of the load testing API returns an operation. The
//! operation is polled until `done`, after which it carries either an error or
//! the resulting resource.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A long-running operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Operation {
    pub id: String,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub modified_at: Option<DateTime<Utc>>,

    /// Set once the operation has completed, successfully or not
    pub done: bool,

    /// Operation-specific progress data, e.g. the id of the resource being created
    pub metadata: Option<serde_json::Value>,

    pub error: Option<OperationError>,

    /// The resulting resource, present once done without error
    pub response: Option<serde_json::Value>,
}

/// Error status of a failed operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationError {
    /// gRPC status code
    pub code: i32,
    pub message: String,
    pub details: Vec<serde_json::Value>,
}

impl Operation {
    /// Decode the operation response into a resource type
    ///
    /// Returns `Ok(None)` while the operation carries no response. The
    /// `@type` marker added by the service is ignored.
    pub fn decode_response<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.response
            .as_ref()
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }

    /// Read a string field from the metadata, e.g. `agentId`
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key)?.as_str()
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code {}: {}", self.code, self.message)
    }
}
