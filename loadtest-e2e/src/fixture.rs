//! Agent fixture
//!
//! Provisions a dedicated agent for one test flow and guarantees it is
//! deleted afterwards, verifying that the service no longer knows about it.

use std::future::Future;

use anyhow::{Context, Result};
use loadtest_client::LoadTestingClient;
use loadtest_core::domain::agent::Agent;
use tracing::{error, info, warn};

use crate::config::SuiteConfig;
use crate::requests::{agent_name, create_agent_request};
use crate::wait::wait_for_agent_ready;

/// A ready agent owned by the current test flow
pub struct AgentFixture {
    client: LoadTestingClient,
    config: SuiteConfig,
    agent: Agent,
}

impl AgentFixture {
    /// Creates an agent and waits until it is ready for tests
    ///
    /// If the agent gets created but never becomes ready it is deleted on a
    /// best-effort basis before the error is returned.
    pub async fn provision(client: &LoadTestingClient, config: &SuiteConfig) -> Result<Self> {
        let name = agent_name(&config.agent_name_prefix);
        let request = create_agent_request(config, &name);

        let operation = client
            .create_agent(&request)
            .await
            .context("Failed to request agent creation")?;
        let agent: Agent = client
            .wait_operation_result(operation, config.timeouts.agent_create)
            .await
            .with_context(|| format!("Agent {} was not created", name))?;

        info!("Created agent {} ({})", agent.name, agent.id);

        let fixture = Self {
            client: client.clone(),
            config: config.clone(),
            agent,
        };

        if fixture.agent.name != name {
            let err = anyhow::anyhow!(
                "Created agent is named {:?}, expected {:?}",
                fixture.agent.name,
                name
            );
            return Err(fixture.abandon(err).await);
        }

        let ready = wait_for_agent_ready(
            client,
            &fixture.agent.id,
            config.timeouts.agent_ready,
            config.timeouts.agent_ready_interval,
        )
        .await;

        match ready {
            Ok(agent) => Ok(Self { agent, ..fixture }),
            Err(e) => {
                let err = anyhow::Error::new(e)
                    .context(format!("Agent {} never became ready", fixture.agent.id));
                Err(fixture.abandon(err).await)
            }
        }
    }

    /// The agent as last observed
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn id(&self) -> &str {
        &self.agent.id
    }

    /// Deletes the agent and checks that it is gone
    ///
    /// Succeeds only if a lookup after deletion answers "not found".
    pub async fn teardown(self) -> Result<()> {
        let agent_id = self.agent.id;

        let operation = self
            .client
            .delete_agent(&agent_id)
            .await
            .with_context(|| format!("Failed to request deletion of agent {}", agent_id))?;
        self.client
            .wait_operation(operation, self.config.timeouts.agent_delete)
            .await
            .with_context(|| format!("Agent {} was not deleted", agent_id))?;

        match self.client.get_agent(&agent_id).await {
            Ok(agent) => anyhow::bail!(
                "Agent {} is still visible after deletion (status {})",
                agent_id,
                agent.status
            ),
            Err(e) if e.is_not_found() => {
                info!("Agent {} deleted", agent_id);
                Ok(())
            }
            Err(e) => Err(e).with_context(|| {
                format!("Unexpected error while confirming deletion of agent {}", agent_id)
            }),
        }
    }

    /// Tears the agent down after a failed setup, keeping the setup error
    async fn abandon(self, err: anyhow::Error) -> anyhow::Error {
        let agent_id = self.agent.id.clone();
        warn!("Setup of agent {} failed, deleting it: {:#}", agent_id, err);

        if let Err(cleanup) = self.teardown().await {
            error!("Failed to clean up agent {}: {:#}", agent_id, cleanup);
        }

        err
    }
}

/// Runs `body` against a freshly provisioned agent, then tears it down
///
/// Teardown runs whether or not `body` succeeds. If both fail, the error of
/// `body` is returned and the teardown error is logged.
pub async fn with_agent<T, F, Fut>(
    client: &LoadTestingClient,
    config: &SuiteConfig,
    body: F,
) -> Result<T>
where
    F: FnOnce(Agent) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let fixture = AgentFixture::provision(client, config).await?;
    let agent_id = fixture.id().to_string();

    let outcome = body(fixture.agent().clone()).await;
    let teardown = fixture.teardown().await;

    match (outcome, teardown) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup)) => {
            error!("Failed to tear down agent {}: {:#}", agent_id, cleanup);
            Err(e)
        }
    }
}
