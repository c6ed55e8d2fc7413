//! Layout inspection for a single source.

use console::style;

use crate::cli::helpers::{format_score, truncate};
use crate::config::Settings;
use crate::extract::{extract_score, Grid, SheetLayout};
use crate::fetch::{CsvFileFetcher, FetchError, TableFetcher};

/// Show the header row and total column detected for a source, and
/// optionally how one person's row is scored.
pub async fn cmd_inspect(settings: &Settings, name: &str, surname: Option<&str>) -> anyhow::Result<()> {
    let Some(source) = settings.source(name) else {
        println!("{} Source '{}' not found", style("✗").red(), name);
        return Ok(());
    };

    let fetcher = CsvFileFetcher::new();
    let grid: Grid = tokio::time::timeout(settings.fetch_timeout, fetcher.fetch(source))
        .await
        .map_err(|_| FetchError::Timeout(settings.fetch_timeout))??;

    let layout = SheetLayout::detect(&grid);

    println!("\n{} {}", style("Source").bold(), style(&source.name).cyan());
    println!("{}", "-".repeat(60));
    println!("{:<16} {}", "Location:", source.location);
    println!("{:<16} {}", "Strategy:", source.strategy);
    println!("{:<16} {}", "Rows:", grid.len());
    println!("{:<16} {}", "Header row:", layout.header_index);
    match layout.total_column {
        Some(total) => println!("{:<16} {} ({})", "Total column:", total.index, total.rank),
        None => println!("{:<16} none", "Total column:"),
    }

    if !layout.headers.is_empty() {
        println!("\n{}", style("Columns").bold());
        for (i, header) in layout.headers.iter().enumerate() {
            let marker = match layout.total_column {
                Some(total) if total.index == i => style("*").green().to_string(),
                _ => " ".to_string(),
            };
            println!("  {} {:>3}  {}", marker, i, truncate(header, 50));
        }
    }

    let Some(surname) = surname else {
        return Ok(());
    };

    println!();
    match extract_score(&grid, surname, source.strategy) {
        None => println!("{} No row matches '{}'", style("!").yellow(), surname),
        Some(result) => {
            println!(
                "{} Row {}: {}",
                style("✓").green(),
                result.row_index,
                truncate(&result.matched_row.join(" | "), 60)
            );
            let values: Vec<String> = result
                .contributing_values
                .iter()
                .map(|v| format_score(*v))
                .collect();
            println!("  Values: [{}]", values.join(", "));
            match result.score {
                Some(score) => println!("  Score:  {}", style(format_score(score)).green()),
                None => println!("  Score:  {}", style("no numeric data").dim()),
            }
            if result.is_ambiguous() {
                println!(
                    "  {} Also matched rows {:?}; using the first match",
                    style("!").yellow(),
                    result.ambiguous_rows
                );
            }
        }
    }

    Ok(())
}
