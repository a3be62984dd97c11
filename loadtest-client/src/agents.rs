//! Agent-related API endpoints

use crate::LoadTestingClient;
use crate::error::Result;
use loadtest_core::domain::agent::Agent;
use loadtest_core::domain::operation::Operation;
use loadtest_core::dto::agent::CreateAgentRequest;
use tracing::{debug, info};

impl LoadTestingClient {
    // =============================================================================
    // Agent Lifecycle
    // =============================================================================

    /// Create a new agent
    ///
    /// Provisioning a compute instance takes minutes; the returned operation
    /// completes with the [`Agent`] once the instance exists. The agent is
    /// usually not ready for tests at that point yet.
    ///
    /// # Arguments
    /// * `req` - The agent creation request
    ///
    /// # Returns
    /// The operation tracking the creation
    pub async fn create_agent(&self, req: &CreateAgentRequest) -> Result<Operation> {
        info!("Creating agent {} in folder {}", req.name, req.folder_id);

        let url = self.endpoint("agents");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get an agent by ID
    ///
    /// # Arguments
    /// * `agent_id` - The agent ID
    ///
    /// # Returns
    /// The current agent snapshot
    pub async fn get_agent(&self, agent_id: &str) -> Result<Agent> {
        debug!("Getting agent {}", agent_id);

        let url = self.endpoint(&format!("agents/{}", agent_id));
        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

        self.handle_response(response).await
    }

    /// Delete an agent
    ///
    /// # Arguments
    /// * `agent_id` - The agent ID to delete
    ///
    /// # Returns
    /// The operation tracking the deletion
    pub async fn delete_agent(&self, agent_id: &str) -> Result<Operation> {
        info!("Deleting agent {}", agent_id);

        let url = self.endpoint(&format!("agents/{}", agent_id));
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
