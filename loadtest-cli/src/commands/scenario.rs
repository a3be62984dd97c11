//! Scenario command handlers
//!
//! Runs the end-to-end scenarios. Both provision a fresh agent and tear it
//! down again, so a successful run leaves nothing behind.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use loadtest_e2e::{SuiteConfig, agent_lifecycle, load_test_run};

use super::agent::print_agent_details;
use super::print_json;
use super::report::print_report;
use crate::config::Config;

/// Scenario subcommands
#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// Create an agent, wait for it to be ready and delete it
    Agent,
    /// Run a load test on a fresh agent and check its report
    LoadTest,
}

pub async fn handle_scenario_command(
    command: ScenarioCommands,
    suite: SuiteConfig,
    config: &Config,
) -> Result<()> {
    let client = suite.client();

    match command {
        ScenarioCommands::Agent => {
            let agent = agent_lifecycle(&client, &suite).await?;
            if config.json {
                return print_json(&agent);
            }
            println!("{} Agent lifecycle passed", "✓".green().bold());
            print_agent_details(&agent);
        }
        ScenarioCommands::LoadTest => {
            let outcome = load_test_run(&client, &suite).await?;
            if config.json {
                return print_json(&outcome.report);
            }
            println!("{} Load test run passed", "✓".green().bold());
            println!("  {:<18} {}", "Agent:".bold(), outcome.agent_id);
            println!("  {:<18} {}", "Config:".bold(), outcome.config_id);
            println!("  {:<18} {}", "Test:".bold(), outcome.test_id);
            println!();
            print_report(&outcome.test_id, &outcome.report);
        }
    }

    Ok(())
}
