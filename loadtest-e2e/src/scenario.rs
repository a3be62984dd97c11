//! End-to-end scenarios
//!
//! Each scenario provisions its own agent and removes it before returning, so
//! scenarios never share remote state.

use anyhow::{Context, Result};
use loadtest_client::LoadTestingClient;
use loadtest_core::domain::agent::Agent;
use loadtest_core::domain::config::Config;
use loadtest_core::domain::report::TableReport;
use loadtest_core::domain::test::Test;
use tracing::info;

use crate::config::SuiteConfig;
use crate::fixture::{AgentFixture, with_agent};
use crate::requests::{create_config_request, create_test_request};
use crate::wait::wait_for_test_finished;

/// HTTP status the target must have answered at least once
const EXPECTED_HTTP_CODE: i64 = 200;

/// What a load test run left behind
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub agent_id: String,
    pub config_id: String,
    pub test_id: String,
    pub report: TableReport,
}

/// Creates an agent, waits for it to be ready, deletes it
///
/// # Returns
/// The agent as it was when it became ready
pub async fn agent_lifecycle(client: &LoadTestingClient, config: &SuiteConfig) -> Result<Agent> {
    let fixture = AgentFixture::provision(client, config).await?;
    let agent = fixture.agent().clone();
    fixture.teardown().await?;

    Ok(agent)
}

/// Runs a complete load test on a dedicated agent
///
/// Stores the load generator config, starts a test on the agent, waits for it
/// to finish and checks the table report for HTTP 200 responses.
pub async fn load_test_run(client: &LoadTestingClient, config: &SuiteConfig) -> Result<RunOutcome> {
    with_agent(client, config, |agent| async move {
        run_on_agent(client, config, &agent.id).await
    })
    .await
}

async fn run_on_agent(
    client: &LoadTestingClient,
    config: &SuiteConfig,
    agent_id: &str,
) -> Result<RunOutcome> {
    let operation = client
        .create_config(&create_config_request(config))
        .await
        .context("Failed to request config creation")?;
    let stored: Config = client
        .wait_operation_result(operation, config.timeouts.resource_create)
        .await
        .context("Config was not created")?;
    info!("Created config {}", stored.id);

    let operation = client
        .create_test(&create_test_request(config, &stored.id, agent_id))
        .await
        .context("Failed to request test creation")?;
    let test: Test = client
        .wait_operation_result(operation, config.timeouts.resource_create)
        .await
        .context("Test was not created")?;
    info!("Created test {} on agent {}", test.id, agent_id);

    let finished = wait_for_test_finished(
        client,
        &test.id,
        config.timeouts.test_finish,
        config.timeouts.test_finish_interval,
    )
    .await
    .with_context(|| format!("Test {} did not finish", test.id))?;
    info!(
        "Test {} finished with status {:?}",
        finished.id, finished.summary.status
    );

    let report = client
        .get_table_report(&finished.id)
        .await
        .with_context(|| format!("Failed to fetch report of test {}", finished.id))?;

    anyhow::ensure!(
        report.saw_http_code(EXPECTED_HTTP_CODE),
        "Report of test {} has no HTTP {} responses (codes seen: {:?})",
        finished.id,
        EXPECTED_HTTP_CODE,
        report.overall.http_codes.keys().collect::<Vec<_>>()
    );

    Ok(RunOutcome {
        agent_id: agent_id.to_string(),
        config_id: stored.id,
        test_id: finished.id,
        report,
    })
}
