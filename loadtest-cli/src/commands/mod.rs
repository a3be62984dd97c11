//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod agent;
mod report;
mod scenario;

pub use agent::AgentCommands;
pub use scenario::ScenarioCommands;
pub use test::TestCommands;

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::config::{Config, SuiteArgs};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run an end-to-end scenario against the service
    Scenario {
        #[command(flatten)]
        suite: SuiteArgs,

        #[command(subcommand)]
        command: ScenarioCommands,
    },
    /// Agent inspection and cleanup
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Test inspection
    Test {
        #[command(subcommand)]
        command: TestCommands,
    },
    /// Show the table report of a test
    Report {
        /// Test ID
        test_id: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Scenario { suite, command } => {
            scenario::handle_scenario_command(command, config.suite(suite)?, config).await
        }
        Commands::Agent { command } => agent::handle_agent_command(command, config).await,
        Commands::Test { command } => test::handle_test_command(command, config).await,
        Commands::Report { test_id } => report::handle_report_command(&test_id, config).await,
    }
}

/// Prints a resource as pretty JSON
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
