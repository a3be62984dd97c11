//! Config DTOs

use serde::{Deserialize, Serialize};

/// Request to store a load generator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigRequest {
    pub folder_id: String,
    pub yaml_string: String,
}
