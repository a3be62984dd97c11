//! Agent domain model
//!
//! An agent is a compute instance that runs load generators on behalf of a test.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A load testing agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Agent {
    /// Unique identifier of the agent
    pub id: String,

    /// Folder the agent belongs to
    pub folder_id: String,

    pub name: String,
    pub description: String,

    /// Compute instance backing this agent
    pub compute_instance_id: String,

    /// Current status of the agent
    pub status: AgentStatus,

    /// Errors reported by the agent, newest last
    pub errors: Vec<String>,

    /// Test the agent is currently executing, if any
    pub current_job_id: String,

    pub agent_version_id: String,
    pub labels: HashMap<String, String>,

    /// Where the agent ships its logs, if anywhere
    pub log_settings: Option<LogSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogSettings {
    pub cloud_log_group_id: String,
}

/// Status of an agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    #[default]
    StatusUnspecified,
    PreparingTest,
    /// Agent is up and can accept a test
    ReadyForTest,
    Testing,
    TankFailed,
    Provisioning,
    Stopping,
    Stopped,
    Starting,
    Restarting,
    Updating,
    Error,
    Crashed,
    Deleting,
    InitializingConnection,
    LostConnectionWithAgent,
    UploadingArtifacts,

    /// Status added by the service after this client was written
    #[serde(other)]
    Unknown,
}

impl AgentStatus {
    /// Whether a test can be scheduled on an agent in this status
    pub fn is_ready(self) -> bool {
        self == AgentStatus::ReadyForTest
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentStatus::StatusUnspecified => "STATUS_UNSPECIFIED",
            AgentStatus::PreparingTest => "PREPARING_TEST",
            AgentStatus::ReadyForTest => "READY_FOR_TEST",
            AgentStatus::Testing => "TESTING",
            AgentStatus::TankFailed => "TANK_FAILED",
            AgentStatus::Provisioning => "PROVISIONING",
            AgentStatus::Stopping => "STOPPING",
            AgentStatus::Stopped => "STOPPED",
            AgentStatus::Starting => "STARTING",
            AgentStatus::Restarting => "RESTARTING",
            AgentStatus::Updating => "UPDATING",
            AgentStatus::Error => "ERROR",
            AgentStatus::Crashed => "CRASHED",
            AgentStatus::Deleting => "DELETING",
            AgentStatus::InitializingConnection => "INITIALIZING_CONNECTION",
            AgentStatus::LostConnectionWithAgent => "LOST_CONNECTION_WITH_AGENT",
            AgentStatus::UploadingArtifacts => "UPLOADING_ARTIFACTS",
            AgentStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
