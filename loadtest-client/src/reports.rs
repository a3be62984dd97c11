//! Report-related API endpoints

use crate::LoadTestingClient;
use crate::error::Result;
use loadtest_core::domain::report::TableReport;
use tracing::debug;

impl LoadTestingClient {
    /// Get the aggregated table report of a test
    ///
    /// # Arguments
    /// * `test_id` - The test ID
    pub async fn get_table_report(&self, test_id: &str) -> Result<TableReport> {
        debug!("Getting table report for test {}", test_id);

        let url = self.endpoint(&format!("reports/{}/table", test_id));
        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

        self.handle_response(response).await
    }
}
