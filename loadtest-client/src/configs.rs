//! Config-related API endpoints

use crate::LoadTestingClient;
use crate::error::Result;
use loadtest_core::domain::config::Config;
use loadtest_core::domain::operation::Operation;
use loadtest_core::dto::config::CreateConfigRequest;
use tracing::{debug, info};

impl LoadTestingClient {
    /// Store a load generator configuration
    ///
    /// # Returns
    /// The operation tracking the creation; it completes with a [`Config`]
    pub async fn create_config(&self, req: &CreateConfigRequest) -> Result<Operation> {
        info!("Creating config in folder {}", req.folder_id);

        let url = self.endpoint("configs");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a config by ID
    pub async fn get_config(&self, config_id: &str) -> Result<Config> {
        debug!("Getting config {}", config_id);

        let url = self.endpoint(&format!("configs/{}", config_id));
        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

        self.handle_response(response).await
    }
}
