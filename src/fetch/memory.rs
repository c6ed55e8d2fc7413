//! In-memory fetcher for callers that already hold decoded tables.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::{FetchError, TableFetcher};
use crate::extract::Grid;
use crate::sources::SourceConfig;

#[derive(Debug, Clone)]
struct Entry {
    table: Result<Grid, String>,
    delay: Option<Duration>,
}

/// Serves grids registered by source name.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, Entry>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grid for `source_name`.
    pub fn with_grid(mut self, source_name: &str, grid: Grid) -> Self {
        self.entries.insert(
            source_name.to_string(),
            Entry {
                table: Ok(grid),
                delay: None,
            },
        );
        self
    }

    /// Make fetches of `source_name` fail as unavailable.
    pub fn with_failure(mut self, source_name: &str, detail: &str) -> Self {
        self.entries.insert(
            source_name.to_string(),
            Entry {
                table: Err(detail.to_string()),
                delay: None,
            },
        );
        self
    }

    /// Delay fetches of an already registered source.
    pub fn with_delay(mut self, source_name: &str, delay: Duration) -> Self {
        if let Some(entry) = self.entries.get_mut(source_name) {
            entry.delay = Some(delay);
        }
        self
    }
}

#[async_trait]
impl TableFetcher for MemoryFetcher {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, source: &SourceConfig) -> Result<Grid, FetchError> {
        let entry = self
            .entries
            .get(&source.name)
            .ok_or_else(|| FetchError::NotFound(source.name.clone()))?;

        if let Some(delay) = entry.delay {
            tokio::time::sleep(delay).await;
        }

        entry.table.clone().map_err(FetchError::Unavailable)
    }
}
