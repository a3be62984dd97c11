//! Suite configuration
//!
//! Everything the end-to-end suite needs to talk to the cloud: credentials,
//! the folder and network the agent is placed in, the target under load and
//! all wait budgets. Built once at startup and passed down explicitly.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use loadtest_client::LoadTestingClient;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://loadtesting.api.cloud.yandex.net";
pub const DEFAULT_OPERATION_URL: &str = "https://operation.api.cloud.yandex.net";
pub const DEFAULT_ZONE: &str = "ru-central1-b";
pub const DEFAULT_AGENT_NAME_PREFIX: &str = "ete-";

/// Compute resources of the agent instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSpec {
    pub cores: i64,
    /// Memory in bytes
    pub memory: i64,
    /// Boot disk size in bytes
    pub disk_size: i64,
}

impl Default for AgentSpec {
    fn default() -> Self {
        Self {
            cores: 2,
            memory: 2 * 1024 * 1024 * 1024,
            disk_size: 15 * 1024 * 1024 * 1024,
        }
    }
}

/// Wait budgets for every remote state transition the suite blocks on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    /// Agent create operation (instance provisioning)
    pub agent_create: Duration,

    /// Agent reaching READY_FOR_TEST after creation
    pub agent_ready: Duration,
    pub agent_ready_interval: Duration,

    /// Agent delete operation
    pub agent_delete: Duration,

    /// Config and test create operations
    pub resource_create: Duration,

    /// Test run reaching a finished state
    pub test_finish: Duration,
    pub test_finish_interval: Duration,

    /// Interval between operation status checks
    pub operation_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            agent_create: Duration::from_secs(20 * 60),
            agent_ready: Duration::from_secs(15 * 60),
            agent_ready_interval: Duration::from_secs(10),
            agent_delete: Duration::from_secs(10 * 60),
            resource_create: Duration::from_secs(60),
            test_finish: Duration::from_secs(3 * 60),
            test_finish_interval: Duration::from_secs(1),
            operation_interval: Duration::from_secs(1),
        }
    }
}

/// End-to-end suite configuration
#[derive(Clone)]
pub struct SuiteConfig {
    /// IAM token used for every API call
    pub token: String,

    /// Folder all resources are created in
    pub folder_id: String,

    /// Service account the agent instance runs under
    pub service_account_id: String,

    pub subnet_id: String,
    pub security_group_id: String,

    /// Value of the `ssh-keys` instance metadata
    pub agent_ssh_keys: String,

    /// Host the load is aimed at
    pub target_ip: String,

    /// Availability zone of the agent instance
    pub zone: String,

    /// Load testing API base URL
    pub api_url: String,

    /// Operation service base URL
    pub operation_url: String,

    /// Prefix of generated agent names
    pub agent_name_prefix: String,

    pub agent: AgentSpec,
    pub timeouts: Timeouts,
}

impl SuiteConfig {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - YC_TOKEN (required)
    /// - FOLDER_ID (required)
    /// - SERVICE_ACCOUNT_ID (required)
    /// - SUBNET_ID (required)
    /// - SECURITY_GROUP_ID (required)
    /// - AGENT_SSH_KEYS (required)
    /// - TARGET_IP (required)
    /// - AGENT_ZONE (optional, default: ru-central1-b)
    /// - LOADTESTING_ENDPOINT (optional)
    /// - OPERATION_ENDPOINT (optional)
    /// - AGENT_READY_TIMEOUT (optional, seconds, default: 900)
    /// - TEST_FINISH_TIMEOUT (optional, seconds, default: 180)
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first;
    /// variables already set in the process win over the file.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from a dotenv file without touching the process
    /// environment. Process variables still take precedence over the file.
    pub fn from_env_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file: HashMap<String, String> = dotenvy::from_path_iter(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
            .collect::<Result<HashMap<_, _>, _>>()
            .with_context(|| format!("Malformed env file {}", path.display()))?;

        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    /// Creates configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key).with_context(|| format!("{} environment variable not set", key))
        };

        let seconds = |key: &str, default: Duration| -> anyhow::Result<Duration> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{} must be a number of seconds, got {:?}", key, raw)),
                None => Ok(default),
            }
        };

        let defaults = Timeouts::default();
        let timeouts = Timeouts {
            agent_ready: seconds("AGENT_READY_TIMEOUT", defaults.agent_ready)?,
            test_finish: seconds("TEST_FINISH_TIMEOUT", defaults.test_finish)?,
            ..defaults
        };

        Ok(Self {
            token: required("YC_TOKEN")?,
            folder_id: required("FOLDER_ID")?,
            service_account_id: required("SERVICE_ACCOUNT_ID")?,
            subnet_id: required("SUBNET_ID")?,
            security_group_id: required("SECURITY_GROUP_ID")?,
            agent_ssh_keys: required("AGENT_SSH_KEYS")?,
            target_ip: required("TARGET_IP")?,
            zone: lookup("AGENT_ZONE").unwrap_or_else(|| DEFAULT_ZONE.to_string()),
            api_url: lookup("LOADTESTING_ENDPOINT").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            operation_url: lookup("OPERATION_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_OPERATION_URL.to_string()),
            agent_name_prefix: DEFAULT_AGENT_NAME_PREFIX.to_string(),
            agent: AgentSpec::default(),
            timeouts,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.token.trim().is_empty() {
            anyhow::bail!("Token should be specified");
        }

        for (name, value) in [
            ("folder_id", &self.folder_id),
            ("service_account_id", &self.service_account_id),
            ("subnet_id", &self.subnet_id),
            ("security_group_id", &self.security_group_id),
            ("agent_ssh_keys", &self.agent_ssh_keys),
            ("target_ip", &self.target_ip),
            ("zone", &self.zone),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }
        }

        for (name, url) in [("api_url", &self.api_url), ("operation_url", &self.operation_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.timeouts.agent_ready_interval.is_zero()
            || self.timeouts.test_finish_interval.is_zero()
            || self.timeouts.operation_interval.is_zero()
        {
            anyhow::bail!("poll intervals must be greater than 0");
        }

        Ok(())
    }

    /// Instance metadata attached to the agent
    pub fn agent_metadata(&self) -> HashMap<String, String> {
        HashMap::from([("ssh-keys".to_string(), self.agent_ssh_keys.clone())])
    }

    /// Builds an authenticated client for the configured endpoints
    pub fn client(&self) -> LoadTestingClient {
        LoadTestingClient::new(&self.api_url, &self.token)
            .with_operation_url(&self.operation_url)
            .with_operation_poll_interval(self.timeouts.operation_interval)
    }
}

impl std::fmt::Debug for SuiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteConfig")
            .field("token", &"<redacted>")
            .field("folder_id", &self.folder_id)
            .field("service_account_id", &self.service_account_id)
            .field("subnet_id", &self.subnet_id)
            .field("security_group_id", &self.security_group_id)
            .field("target_ip", &self.target_ip)
            .field("zone", &self.zone)
            .field("api_url", &self.api_url)
            .field("operation_url", &self.operation_url)
            .field("agent_name_prefix", &self.agent_name_prefix)
            .field("agent", &self.agent)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}
