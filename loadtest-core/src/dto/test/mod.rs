//! Test DTOs

use serde::{Deserialize, Serialize};

/// Request to create and start a test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestRequest {
    pub folder_id: String,
    pub configurations: Vec<SingleAgentConfiguration>,
    pub test_details: Details,
}

/// Binds one stored configuration to the agent that should run it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SingleAgentConfiguration {
    pub config_id: String,
    pub agent_selector: AgentSelector,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentSelector {
    pub agent_id: String,
}

/// Human-facing attributes of a test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Details {
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}
