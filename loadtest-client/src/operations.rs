//! Operation service endpoints
//!
//! Mutating calls return immediately with an operation; these helpers poll the
//! operation until it is done and turn its outcome into a `Result`.

use std::time::Duration;

use crate::LoadTestingClient;
use crate::error::{ClientError, Result};
use loadtest_core::Poller;
use loadtest_core::domain::operation::Operation;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

impl LoadTestingClient {
    /// Get an operation by ID
    ///
    /// # Arguments
    /// * `operation_id` - The operation ID
    pub async fn get_operation(&self, operation_id: &str) -> Result<Operation> {
        debug!("Getting operation {}", operation_id);

        let url = format!("{}/operations/{}", self.operation_url, operation_id);
        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

        self.handle_response(response).await
    }

    /// Wait for an operation to finish
    ///
    /// An operation that is already done is not queried again.
    ///
    /// # Arguments
    /// * `operation` - The operation returned by a mutating call
    /// * `timeout` - Maximum time to wait
    ///
    /// # Returns
    /// The finished operation, or [`ClientError::Operation`] if it failed
    pub async fn wait_operation(&self, operation: Operation, timeout: Duration) -> Result<Operation> {
        let operation = if operation.done {
            operation
        } else {
            let id = operation.id.clone();
            Poller::new(self.operation_poll_interval, timeout)
                .describe(format!("operation {}", id))
                .wait_async(|| self.get_operation(&id), |op| op.done)
                .await?
        };

        match operation.error {
            Some(error) => Err(ClientError::Operation {
                id: operation.id,
                error,
            }),
            None => {
                info!("Operation {} finished", operation.id);
                Ok(operation)
            }
        }
    }

    /// Wait for an operation to finish and decode the resource it produced
    ///
    /// # Arguments
    /// * `operation` - The operation returned by a mutating call
    /// * `timeout` - Maximum time to wait
    ///
    /// # Returns
    /// The resource carried in the operation response
    pub async fn wait_operation_result<T: DeserializeOwned>(
        &self,
        operation: Operation,
        timeout: Duration,
    ) -> Result<T> {
        let operation = self.wait_operation(operation, timeout).await?;

        operation
            .decode_response()
            .map_err(|e| {
                ClientError::ParseError(format!(
                    "Failed to decode response of operation {}: {}",
                    operation.id, e
                ))
            })?
            .ok_or_else(|| {
                ClientError::ParseError(format!(
                    "Operation {} finished without a response",
                    operation.id
                ))
            })
    }
}
