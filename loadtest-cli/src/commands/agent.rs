//! Agent command handlers

use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use loadtest_core::domain::agent::{Agent, AgentStatus};
use loadtest_e2e::wait::wait_for_agent_ready;

use super::print_json;
use crate::config::Config;

/// Agent subcommands
#[derive(Subcommand)]
pub enum AgentCommands {
    /// Get agent details
    Get {
        /// Agent ID
        id: String,
    },
    /// Wait until the agent is ready for a test
    Wait {
        /// Agent ID
        id: String,

        /// Seconds to wait
        #[arg(long, default_value_t = 900)]
        timeout: u64,

        /// Seconds between status checks
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },
    /// Delete an agent and wait for the deletion to finish
    Delete {
        /// Agent ID
        id: String,

        /// Seconds to wait for the delete operation
        #[arg(long, default_value_t = 600)]
        timeout: u64,
    },
}

pub async fn handle_agent_command(command: AgentCommands, config: &Config) -> Result<()> {
    match command {
        AgentCommands::Get { id } => get_agent(&id, config).await,
        AgentCommands::Wait {
            id,
            timeout,
            interval,
        } => wait_agent(&id, timeout, interval, config).await,
        AgentCommands::Delete { id, timeout } => delete_agent(&id, timeout, config).await,
    }
}

async fn get_agent(id: &str, config: &Config) -> Result<()> {
    let agent = config.client().get_agent(id).await?;

    if config.json {
        return print_json(&agent);
    }
    print_agent_details(&agent);
    Ok(())
}

async fn wait_agent(id: &str, timeout: u64, interval: u64, config: &Config) -> Result<()> {
    let agent = wait_for_agent_ready(
        &config.client(),
        id,
        Duration::from_secs(timeout),
        Duration::from_secs(interval),
    )
    .await?;

    if config.json {
        return print_json(&agent);
    }
    println!("{} Agent {} is ready", "✓".green(), agent.id.cyan());
    print_agent_details(&agent);
    Ok(())
}

async fn delete_agent(id: &str, timeout: u64, config: &Config) -> Result<()> {
    let client = config.client();
    let op = client.delete_agent(id).await?;
    let op = client
        .wait_operation(op, Duration::from_secs(timeout))
        .await?;

    if config.json {
        return print_json(&op);
    }
    println!("{} Agent {} deleted (operation {})", "✓".green(), id.cyan(), op.id.dimmed());
    Ok(())
}

pub(super) fn print_agent_details(agent: &Agent) {
    println!("{}", "Agent Details".bold());
    println!("{}", "─".repeat(80).dimmed());
    println!("  {:<18} {}", "ID:".bold(), agent.id);
    println!("  {:<18} {}", "Name:".bold(), agent.name);
    println!("  {:<18} {}", "Folder:".bold(), agent.folder_id);
    println!("  {:<18} {}", "Status:".bold(), colorize_status(agent.status));

    if !agent.compute_instance_id.is_empty() {
        println!("  {:<18} {}", "Instance:".bold(), agent.compute_instance_id);
    }
    if !agent.current_job_id.is_empty() {
        println!("  {:<18} {}", "Current job:".bold(), agent.current_job_id);
    }

    if !agent.errors.is_empty() {
        println!();
        println!("{}", "Errors".bold());
        for error in &agent.errors {
            println!("  {} {}", "▸".red(), error);
        }
    }
}

fn colorize_status(status: AgentStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        AgentStatus::ReadyForTest => text.green(),
        AgentStatus::PreparingTest | AgentStatus::Testing | AgentStatus::UploadingArtifacts => {
            text.cyan()
        }
        AgentStatus::Provisioning
        | AgentStatus::Starting
        | AgentStatus::Restarting
        | AgentStatus::Updating
        | AgentStatus::InitializingConnection => text.yellow(),
        AgentStatus::TankFailed
        | AgentStatus::Error
        | AgentStatus::Crashed
        | AgentStatus::LostConnectionWithAgent => text.red(),
        _ => text.dimmed(),
    }
}
