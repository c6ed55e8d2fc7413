//! Local CSV export reader.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{FetchError, TableFetcher};
use crate::extract::Grid;
use crate::sources::SourceConfig;

/// Reads each source's `location` as a CSV file on disk.
#[derive(Debug, Clone, Default)]
pub struct CsvFileFetcher {
    base_dir: Option<PathBuf>,
}

impl CsvFileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl TableFetcher for CsvFileFetcher {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch(&self, source: &SourceConfig) -> Result<Grid, FetchError> {
        let path = self.resolve(&source.location);
        debug!("Reading {} from {}", source.name, path.display());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::Read {
                path: path.clone(),
                source: e,
            })?;

        // Invalid UTF-8 sequences are dropped rather than rejected.
        let text = String::from_utf8_lossy(&bytes).replace('\u{fffd}', "");
        let grid = parse_csv(&text)?;
        debug!("Decoded {} rows for {}", grid.len(), source.name);
        Ok(grid)
    }
}

/// Decode CSV text into a grid. Every record becomes a row; ragged rows are kept.
pub fn parse_csv(text: &str) -> Result<Grid, csv::Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Strategy;

    fn source(location: &str) -> SourceConfig {
        SourceConfig::new("Алгоритмы", location, Strategy::SumUntilTotal)
    }

    #[test]
    fn test_parse_csv_ragged_rows() {
        let grid = parse_csv("\u{feff}ФИО,лр1,лр2\nИванов,5\n\"Петров, П.\",3,\"4,5\"\n").unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0][0], "ФИО");
        assert_eq!(grid[1], vec!["Иванов", "5"]);
        assert_eq!(grid[2], vec!["Петров, П.", "3", "4,5"]);
    }

    #[tokio::test]
    async fn test_fetch_reads_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("algo.csv"), "ФИО,Итог\nИванов,10\n").unwrap();

        let fetcher = CsvFileFetcher::with_base_dir(dir.path());
        let grid = fetcher.fetch(&source("algo.csv")).await.unwrap();
        assert_eq!(grid, vec![vec!["ФИО", "Итог"], vec!["Иванов", "10"]]);
    }

    #[tokio::test]
    async fn test_fetch_drops_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        let mut bytes = "ФИО,Итог\nИванов,1".as_bytes().to_vec();
        bytes.push(0xff);
        bytes.extend_from_slice(b"2\n");
        std::fs::write(&path, bytes).unwrap();

        let fetcher = CsvFileFetcher::new();
        let grid = fetcher.fetch(&source(path.to_str().unwrap())).await.unwrap();
        assert_eq!(grid[1], vec!["Иванов", "12"]);
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let fetcher = CsvFileFetcher::new();
        let err = fetcher
            .fetch(&source("/definitely/not/here.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Read { .. }));
    }
}
