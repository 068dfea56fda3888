use anyhow::Result;
use async_trait::async_trait;

use crate::normalize::{normalize_rows, Dataset, RawRow};

/// Hard cap on how deep the pagination loop will scan, as a guard against
/// a source that keeps returning full pages.
const MAX_OFFSET: usize = 500_000;

/// One page of raw rows from the upstream data source.
#[derive(Debug, Clone, Default)]
pub struct FetchPage {
    pub rows: Vec<RawRow>,
    /// Server-side exact row count, when the source reports one.
    pub exact_count: Option<u64>,
}

/// Boundary to the hosted data source. The host application implements
/// this (including its own retry/backoff and caching policy); the core
/// only pages through it.
#[async_trait]
pub trait RecordSource {
    async fn fetch_page(&self, view: &str, offset: usize, limit: usize) -> Result<FetchPage>;
}

/// Load statistics for the data-health panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub rows_loaded: usize,
    pub exact_count: Option<u64>,
}

/// Page through a source view and normalize everything fetched.
///
/// Stops on the first short page. An empty result is not an error: the
/// caller receives an empty dataset and renders its empty state.
pub async fn load_dataset(
    source: &dyn RecordSource,
    view: &str,
    page_size: usize,
) -> Result<(Dataset, SourceStats)> {
    let mut rows: Vec<RawRow> = Vec::new();
    let mut exact_count = None;
    let mut offset = 0;

    loop {
        let page = source.fetch_page(view, offset, page_size).await?;
        if exact_count.is_none() {
            exact_count = page.exact_count;
        }

        let batch_len = page.rows.len();
        rows.extend(page.rows);

        if batch_len < page_size {
            break;
        }
        offset += page_size;
        if offset > MAX_OFFSET {
            tracing::warn!("stopping {view} scan at offset {offset}");
            break;
        }
    }

    let stats = SourceStats {
        rows_loaded: rows.len(),
        exact_count,
    };
    tracing::info!(
        "loaded {} rows from {view} (server count: {:?})",
        stats.rows_loaded,
        stats.exact_count
    );

    Ok((normalize_rows(&rows), stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// In-memory source that serves a fixed row set page by page.
    struct FixtureSource {
        rows: Vec<RawRow>,
    }

    impl FixtureSource {
        fn with_rows(n: usize) -> Self {
            let rows = (0..n)
                .map(|i| {
                    json!({
                        "call_id": format!("c{i}"),
                        "pipeline_name": "CZ Main",
                        "call_type": "intro_call"
                    })
                    .as_object()
                    .unwrap()
                    .clone()
                })
                .collect();
            Self { rows }
        }
    }

    #[async_trait]
    impl RecordSource for FixtureSource {
        async fn fetch_page(&self, _view: &str, offset: usize, limit: usize) -> Result<FetchPage> {
            let end = (offset + limit).min(self.rows.len());
            let rows = if offset >= self.rows.len() {
                vec![]
            } else {
                self.rows[offset..end].to_vec()
            };
            Ok(FetchPage {
                rows,
                exact_count: Some(self.rows.len() as u64),
            })
        }
    }

    #[tokio::test]
    async fn test_pages_until_short_batch() {
        let source = FixtureSource::with_rows(25);
        let (dataset, stats) = load_dataset(&source, "calls_raw", 10).await.unwrap();
        assert_eq!(dataset.len(), 25);
        assert_eq!(stats.rows_loaded, 25);
        assert_eq!(stats.exact_count, Some(25));
    }

    #[tokio::test]
    async fn test_exact_page_boundary() {
        // 20 rows at page size 10: the third fetch returns an empty page.
        let source = FixtureSource::with_rows(20);
        let (dataset, stats) = load_dataset(&source, "calls_raw", 10).await.unwrap();
        assert_eq!(dataset.len(), 20);
        assert_eq!(stats.rows_loaded, 20);
    }

    #[tokio::test]
    async fn test_empty_source_is_empty_dataset_not_error() {
        let source = FixtureSource::with_rows(0);
        let (dataset, stats) = load_dataset(&source, "calls_raw", 10).await.unwrap();
        assert!(dataset.is_empty());
        assert_eq!(stats.exact_count, Some(0));
    }
}
