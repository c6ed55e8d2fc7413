//! Source listing.

use console::style;

use crate::cli::helpers::truncate;
use crate::config::Settings;

/// List configured sources.
pub async fn cmd_sources(settings: &Settings) -> anyhow::Result<()> {
    if settings.sources.is_empty() {
        println!(
            "{} No sources configured. Add [[sources]] entries to sheetscore.toml.",
            style("!").yellow()
        );
        return Ok(());
    }

    println!("\n{}", style("Gradebook Sources").bold());
    println!("{}", "-".repeat(72));
    println!("{:<20} {:<16} Location", "Name", "Strategy");
    println!("{}", "-".repeat(72));

    for source in &settings.sources {
        println!(
            "{:<20} {:<16} {}",
            truncate(&source.name, 19),
            source.strategy.as_str(),
            source.location
        );
    }

    println!(
        "\n{} workers, {:?} fetch timeout",
        settings.workers, settings.fetch_timeout
    );

    Ok(())
}
