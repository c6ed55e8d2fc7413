//! Concurrent evaluation of many sources for one person.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::{ScoreReport, SourceConfig, SourceError, SourceOutcome};
use crate::extract::{extract_score, ExtractionResult};
use crate::fetch::{FetchError, TableFetcher};

/// Default number of sources evaluated at once.
pub const DEFAULT_WORKERS: usize = 4;

/// Default per-source fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Runs the extraction pipeline for a person across sources.
#[derive(Clone)]
pub struct ScoreRunner {
    fetcher: Arc<dyn TableFetcher>,
    workers: usize,
    fetch_timeout: Duration,
}

impl ScoreRunner {
    pub fn new(fetcher: Arc<dyn TableFetcher>) -> Self {
        Self {
            fetcher,
            workers: DEFAULT_WORKERS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Limit how many sources are fetched and evaluated concurrently.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Fetch one source and extract `target`'s score from it.
    ///
    /// `Ok(None)` means the person was not found; fetch failures are passed
    /// through unchanged.
    pub async fn run_source(
        &self,
        target: &str,
        source: &SourceConfig,
    ) -> Result<Option<ExtractionResult>, SourceError> {
        evaluate(self.fetcher.as_ref(), self.fetch_timeout, target, source).await
    }

    /// Evaluate every source concurrently.
    ///
    /// Each source runs in its own task, so a failure or panic in one source
    /// only marks that source's outcome. Outcomes keep the order of `sources`.
    pub async fn run_all(&self, target: &str, sources: &[SourceConfig]) -> ScoreReport {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(sources.len());

        for source in sources {
            let fetcher = self.fetcher.clone();
            let semaphore = semaphore.clone();
            let source = source.clone();
            let target = target.to_string();
            let timeout = self.fetch_timeout;

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await;
                evaluate(fetcher.as_ref(), timeout, &target, &source).await
            }));
        }

        let mut outcomes = Vec::with_capacity(sources.len());
        for (source, handle) in sources.iter().zip(handles) {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(SourceError::Task(e.to_string())),
            };
            if let Err(ref e) = result {
                warn!("Source {} failed: {}", source.name, e);
            }
            outcomes.push(SourceOutcome {
                source: source.name.clone(),
                result,
            });
        }

        let report = ScoreReport::new(target, outcomes);
        info!(
            found = report.found_count(),
            not_found = report.not_found_count(),
            failed = report.failed_count(),
            "Evaluated {} sources via {}",
            sources.len(),
            self.fetcher.name()
        );
        report
    }
}

async fn evaluate(
    fetcher: &dyn TableFetcher,
    timeout: Duration,
    target: &str,
    source: &SourceConfig,
) -> Result<Option<ExtractionResult>, SourceError> {
    let grid = match tokio::time::timeout(timeout, fetcher.fetch(source)).await {
        Ok(fetched) => fetched?,
        Err(_) => return Err(FetchError::Timeout(timeout).into()),
    };

    let result = extract_score(&grid, target, source.strategy);
    match &result {
        Some(found) if found.is_ambiguous() => warn!(
            "Ambiguous match in {}: using row {}, rows {:?} also match '{}'",
            source.name, found.row_index, found.ambiguous_rows, target
        ),
        Some(found) => debug!("{}: row {} -> {:?}", source.name, found.row_index, found.score),
        None => debug!("{}: no row matches '{}'", source.name, target),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Strategy;
    use crate::fetch::MemoryFetcher;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_run_source_not_found_is_ok_none() {
        let fetcher = MemoryFetcher::new().with_grid("ОП", grid(&[&["ФИО", "Итог"], &["Петров", "3"]]));
        let runner = ScoreRunner::new(Arc::new(fetcher));
        let source = SourceConfig::new("ОП", "mem", Strategy::PreferTotal);
        assert!(runner.run_source("Иванов", &source).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_run_source_timeout() {
        let fetcher = MemoryFetcher::new()
            .with_grid("ДМ", grid(&[&["ФИО"], &["Иванов", "5"]]))
            .with_delay("ДМ", Duration::from_millis(500));
        let runner = ScoreRunner::new(Arc::new(fetcher)).with_fetch_timeout(Duration::from_millis(20));
        let source = SourceConfig::new("ДМ", "mem", Strategy::TakeLast);
        let err = runner.run_source("Иванов", &source).await.unwrap_err();
        assert!(matches!(err, SourceError::Fetch(FetchError::Timeout(_))));
    }

    #[test]
    fn test_workers_never_zero() {
        let runner = ScoreRunner::new(Arc::new(MemoryFetcher::new())).with_workers(0);
        assert_eq!(runner.workers(), 1);
    }
}
