//! Waits on remote state transitions
//!
//! Thin wrappers that pair a status query with the predicate and budget
//! appropriate for each resource kind.

use std::time::Duration;

use loadtest_client::{LoadTestingClient, Result};
use loadtest_core::Poller;
use loadtest_core::domain::agent::Agent;
use loadtest_core::domain::test::Test;
use tracing::info;

/// Blocks until the agent reports READY_FOR_TEST
///
/// # Returns
/// The first agent snapshot that was ready
pub async fn wait_for_agent_ready(
    client: &LoadTestingClient,
    agent_id: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<Agent> {
    info!("Waiting up to {:?} for agent {} to be ready", timeout, agent_id);

    let agent = Poller::new(interval, timeout)
        .describe(format!("agent {} to be ready", agent_id))
        .wait_async(|| client.get_agent(agent_id), |agent| agent.status.is_ready())
        .await?;

    Ok(agent)
}

/// Blocks until the test summary says it is finished
///
/// A finished test may still have failed; callers inspect the returned summary.
pub async fn wait_for_test_finished(
    client: &LoadTestingClient,
    test_id: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<Test> {
    info!("Waiting up to {:?} for test {} to finish", timeout, test_id);

    let test = Poller::new(interval, timeout)
        .describe(format!("test {} to finish", test_id))
        .wait_async(|| client.get_test(test_id), Test::is_finished)
        .await?;

    Ok(test)
}
