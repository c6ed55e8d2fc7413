//! One-off extraction from a CSV file.

use std::path::Path;
use std::sync::Arc;

use console::style;

use crate::cli::helpers::format_score;
use crate::config::Settings;
use crate::extract::Strategy;
use crate::fetch::CsvFileFetcher;
use crate::sources::{ScoreRunner, SourceConfig};

/// Extract a score from a CSV file given on the command line.
pub async fn cmd_extract(
    settings: &Settings,
    file: &Path,
    surname: &str,
    strategy: Strategy,
    json: bool,
) -> anyhow::Result<()> {
    let name = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let source = SourceConfig::new(&name, &file.to_string_lossy(), strategy);

    let runner = ScoreRunner::new(Arc::new(CsvFileFetcher::new()))
        .with_fetch_timeout(settings.fetch_timeout);
    let result = runner.run_source(surname, &source).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match result {
        None => println!("{} '{}' not found in {}", style("!").yellow(), surname, file.display()),
        Some(result) => match result.score {
            Some(score) => println!(
                "{} {}: {} ({}, row {})",
                style("✓").green(),
                name,
                style(format_score(score)).bold(),
                strategy,
                result.row_index
            ),
            None => println!(
                "{} {}: matched row {} has no numeric data",
                style("!").yellow(),
                name,
                result.row_index
            ),
        },
    }

    Ok(())
}
