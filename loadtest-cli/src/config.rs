//! Configuration module
//!
//! Command-line arguments (with environment fallbacks) and their conversion
//! into the client and suite configuration.

use std::time::Duration;

use clap::Args;
use loadtest_client::LoadTestingClient;
use loadtest_e2e::config::{
    AgentSpec, DEFAULT_AGENT_NAME_PREFIX, DEFAULT_API_URL, DEFAULT_OPERATION_URL, DEFAULT_ZONE,
};
use loadtest_e2e::{SuiteConfig, Timeouts};

/// How to reach and authenticate against the service
#[derive(Args, Clone)]
pub struct ConnectionArgs {
    /// IAM token
    #[arg(long, env = "YC_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Load testing API URL
    #[arg(long, env = "LOADTESTING_ENDPOINT", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Operation service URL
    #[arg(long, env = "OPERATION_ENDPOINT", default_value = DEFAULT_OPERATION_URL)]
    pub operation_url: String,
}

/// Where scenario resources are created and what they aim at
#[derive(Args, Clone)]
pub struct SuiteArgs {
    /// Folder all resources are created in
    #[arg(long, env = "FOLDER_ID")]
    pub folder_id: String,

    /// Service account of the agent instance
    #[arg(long, env = "SERVICE_ACCOUNT_ID")]
    pub service_account_id: String,

    #[arg(long, env = "SUBNET_ID")]
    pub subnet_id: String,

    #[arg(long, env = "SECURITY_GROUP_ID")]
    pub security_group_id: String,

    /// Value of the agent's `ssh-keys` metadata
    #[arg(long, env = "AGENT_SSH_KEYS", hide_env_values = true)]
    pub agent_ssh_keys: String,

    /// Host under load
    #[arg(long, env = "TARGET_IP")]
    pub target_ip: String,

    #[arg(long, env = "AGENT_ZONE", default_value = DEFAULT_ZONE)]
    pub zone: String,

    #[arg(long, default_value = DEFAULT_AGENT_NAME_PREFIX)]
    pub agent_name_prefix: String,

    /// Seconds to wait for the agent to become ready
    #[arg(long, env = "AGENT_READY_TIMEOUT", default_value_t = 900)]
    pub agent_ready_timeout: u64,

    /// Seconds to wait for the test to finish
    #[arg(long, env = "TEST_FINISH_TIMEOUT", default_value_t = 180)]
    pub test_finish_timeout: u64,
}

/// CLI configuration
#[derive(Clone)]
pub struct Config {
    pub connection: ConnectionArgs,

    /// Print raw JSON instead of formatted output
    pub json: bool,
}

impl Config {
    /// Builds an authenticated client
    pub fn client(&self) -> LoadTestingClient {
        LoadTestingClient::new(&self.connection.api_url, &self.connection.token)
            .with_operation_url(&self.connection.operation_url)
    }

    /// Combines the connection settings with scenario arguments
    pub fn suite(&self, args: SuiteArgs) -> anyhow::Result<SuiteConfig> {
        let suite = SuiteConfig {
            token: self.connection.token.clone(),
            folder_id: args.folder_id,
            service_account_id: args.service_account_id,
            subnet_id: args.subnet_id,
            security_group_id: args.security_group_id,
            agent_ssh_keys: args.agent_ssh_keys,
            target_ip: args.target_ip,
            zone: args.zone,
            api_url: self.connection.api_url.clone(),
            operation_url: self.connection.operation_url.clone(),
            agent_name_prefix: args.agent_name_prefix,
            agent: AgentSpec::default(),
            timeouts: Timeouts {
                agent_ready: Duration::from_secs(args.agent_ready_timeout),
                test_finish: Duration::from_secs(args.test_finish_timeout),
                ..Timeouts::default()
            },
        };

        suite.validate()?;
        Ok(suite)
    }
}
