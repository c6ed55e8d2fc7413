//! sheetscore - look up a person's score across gradebook exports.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheetscore::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // SHEETSCORE_* overrides may live in .env
    let _ = dotenvy::dotenv();

    // RUST_LOG wins; otherwise -v raises sheetscore events to info
    let default_filter = if cli::is_verbose() {
        "sheetscore=info"
    } else {
        "sheetscore=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    cli::run().await
}
