//! Output formatters for the section summary

use anyhow::Result;
use colored::*;
use quotesheet_core::Report;
use std::path::Path;

/// Print the per-section results with colors
pub fn print_human(output: &Path, report: &Report) {
    println!("{}", format!("Quote sheet: {}", report.product_name).bold());
    println!();

    for outcome in &report.outcomes {
        match &outcome.error {
            None => println!("  {} {}", "OK".green().bold(), outcome.section),
            Some(message) => println!(
                "  {} {} {}",
                "FAILED".red().bold(),
                outcome.section,
                message.bright_black()
            ),
        }
    }
    println!();

    let failed = report.failures().count();
    println!("{}", "Summary:".bold().underline());
    println!(
        "  {} {}",
        "Sections:".bold(),
        report.outcomes.len() - failed
    );
    if failed > 0 {
        println!("  {} {}", "Failed:".red().bold(), failed);
    }
    println!("  {} {}", "Output:".bold(), output.display().to_string().cyan());
}

/// Print the per-section results as JSON
pub fn print_json(output: &Path, report: &Report) -> Result<()> {
    let failed = report.failures().count();
    let summary = serde_json::json!({
        "product_name": report.product_name,
        "output": output.display().to_string(),
        "sections": report.outcomes,
        "summary": {
            "total": report.outcomes.len(),
            "failed": failed,
        }
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
