//! Test-related API endpoints

use crate::LoadTestingClient;
use crate::error::Result;
use loadtest_core::domain::operation::Operation;
use loadtest_core::domain::test::Test;
use loadtest_core::dto::test::CreateTestRequest;
use tracing::{debug, info};

impl LoadTestingClient {
    // =============================================================================
    // Test Lifecycle
    // =============================================================================

    /// Create a test and schedule it on its agents
    ///
    /// # Arguments
    /// * `req` - The test creation request
    ///
    /// # Returns
    /// The operation tracking the creation; it completes with a [`Test`]
    pub async fn create_test(&self, req: &CreateTestRequest) -> Result<Operation> {
        info!(
            "Creating test {:?} with {} configuration(s)",
            req.test_details.name,
            req.configurations.len()
        );

        let url = self.endpoint("tests");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a test by ID
    ///
    /// # Arguments
    /// * `test_id` - The test ID
    ///
    /// # Returns
    /// The current test snapshot, including its execution summary
    pub async fn get_test(&self, test_id: &str) -> Result<Test> {
        debug!("Getting test {}", test_id);

        let url = self.endpoint(&format!("tests/{}", test_id));
        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

        self.handle_response(response).await
    }
}
