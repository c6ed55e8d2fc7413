//! Table fetchers.
//!
//! A fetcher turns a configured source into a [`Grid`] of raw cells. How the
//! table is obtained is entirely the fetcher's business; the extraction
//! engine only ever sees the grid, and a fetch failure is reported for that
//! source alone.

mod csv_file;
mod memory;

pub use csv_file::{parse_csv, CsvFileFetcher};
pub use memory::MemoryFetcher;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::extract::Grid;
use crate::sources::SourceConfig;

/// Errors that can occur while fetching a source's table.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown source: {0}")]
    NotFound(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Trait for pluggable table sources.
#[async_trait]
pub trait TableFetcher: Send + Sync {
    /// Short identifier used in logs (e.g., "csv", "memory").
    fn name(&self) -> &str;

    /// Fetch the raw grid for `source`.
    async fn fetch(&self, source: &SourceConfig) -> Result<Grid, FetchError>;
}
