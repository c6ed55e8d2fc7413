//! Score lookup across configured sources.

use std::sync::Arc;

use console::style;

use crate::cli::helpers::{format_score, ScorePayload};
use crate::config::{Settings, ENV_SURNAME};
use crate::fetch::CsvFileFetcher;
use crate::sources::{ScoreReport, ScoreRunner, SourceConfig};

/// Errors shown in text output before the rest are summarized.
const MAX_SHOWN_ERRORS: usize = 5;

/// Look up a person's score in every configured (or selected) source.
pub async fn cmd_scores(
    settings: &Settings,
    surname: Option<String>,
    only: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let Some(surname) = surname
        .or_else(|| settings.surname.clone())
        .filter(|s| !s.trim().is_empty())
    else {
        anyhow::bail!(
            "No surname given. Pass --surname or set `surname` in config or {}",
            ENV_SURNAME
        );
    };

    let sources = select_sources(settings, only)?;
    if sources.is_empty() {
        println!("{} No sources configured.", style("!").yellow());
        return Ok(());
    }

    let runner = ScoreRunner::new(Arc::new(CsvFileFetcher::new()))
        .with_workers(settings.workers)
        .with_fetch_timeout(settings.fetch_timeout);
    let report = runner.run_all(surname.trim(), &sources).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&ScorePayload::from(&report))?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn select_sources(settings: &Settings, only: &[String]) -> anyhow::Result<Vec<SourceConfig>> {
    if only.is_empty() {
        return Ok(settings.sources.clone());
    }
    only.iter()
        .map(|name| {
            settings
                .source(name)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Source '{}' is not configured", name))
        })
        .collect()
}

fn print_report(report: &ScoreReport) {
    println!("\n{} {}", style("Scores for").bold(), style(&report.target).cyan());
    println!("{}", "-".repeat(40));

    if report.found_count() == 0 {
        println!("{} No scores found.", style("!").yellow());
    }
    for outcome in report.outcomes.iter().filter(|o| !o.is_failed()) {
        match outcome.score() {
            Some(score) => println!("  {} {}: {}", style("•").green(), outcome.source, format_score(score)),
            None => println!("  {} {}: {}", style("•").dim(), outcome.source, style("—").dim()),
        }
    }

    let failed = report.failed_count();
    if failed > 0 {
        println!("\n{}", style("Errors:").red().bold());
        for (name, error) in report.failures().take(MAX_SHOWN_ERRORS) {
            println!("  {} {}: {}", style("✗").red(), name, error);
        }
        if failed > MAX_SHOWN_ERRORS {
            println!("  ... and {} more", failed - MAX_SHOWN_ERRORS);
        }
    }

    println!(
        "\n{} found, {} not found, {} failed",
        style(report.found_count()).green(),
        report.not_found_count(),
        failed
    );
}
