//! Report command handler

use anyhow::Result;
use colored::*;
use loadtest_core::domain::report::TableReport;

use super::print_json;
use crate::config::Config;

pub async fn handle_report_command(test_id: &str, config: &Config) -> Result<()> {
    let report = config.client().get_table_report(test_id).await?;

    if config.json {
        return print_json(&report);
    }
    print_report(test_id, &report);
    Ok(())
}

pub(super) fn print_report(test_id: &str, report: &TableReport) {
    let overall = &report.overall;

    println!("{} {}", "Report of test".bold(), test_id.cyan());
    println!("{}", "─".repeat(80).dimmed());
    println!("  {:<18} {:?}", "Status:".bold(), report.status);
    println!("  {:<18} {}", "Requests:".bold(), overall.request_count);

    println!();
    println!("{}", "HTTP codes".bold());
    if overall.http_codes.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for (code, count) in &overall.http_codes {
        let code_text = code.to_string();
        let code_text = match code {
            200..=299 => code_text.green(),
            400..=499 => code_text.yellow(),
            _ => code_text.red(),
        };
        println!("  {} {:<6} {}", "▸".cyan(), code_text, count);
    }

    if !overall.net_codes.is_empty() {
        println!();
        println!("{}", "Net codes".bold());
        for (code, count) in &overall.net_codes {
            println!("  {} {:<6} {}", "▸".cyan(), code, count);
        }
    }

    let q = &overall.quantiles;
    println!();
    println!("{}", "Latency quantiles (ms)".bold());
    println!(
        "  q50 {:.2}  q75 {:.2}  q90 {:.2}  q95 {:.2}  q99 {:.2}  q100 {:.2}",
        q.q50, q.q75, q.q90, q.q95, q.q99, q.q100
    );
}
