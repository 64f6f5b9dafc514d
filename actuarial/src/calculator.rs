use crate::errors::AnalysisError;
use crate::metrics_defs::{ANALYSIS_DURATION, ANALYSIS_FAILURES};
use crate::ratio::{LossRatio, RatioResult};
use crate::source::{Source, SourceFetcher};
use crate::table::Table;
use shared::{counter, histogram};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::Instant;

/// Loads workbooks from any [`Source`] and reduces them to a [`LossRatio`].
///
/// Every failure is returned as an [`AnalysisError`] inside the result; the
/// calculator never panics on bad input.
#[derive(Clone)]
pub struct Calculator {
    fetcher: Arc<dyn SourceFetcher>,
    default_source: PathBuf,
}

impl Calculator {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, default_source: impl Into<PathBuf>) -> Self {
        Calculator {
            fetcher,
            default_source: default_source.into(),
        }
    }

    pub fn default_source(&self) -> &Path {
        &self.default_source
    }

    pub async fn analyze(&self, source: &Source) -> RatioResult {
        let started = Instant::now();
        let result = self.load(source).await.and_then(|table| LossRatio::from_table(&table));

        let source_tag = match source {
            Source::Remote(_) => "remote",
            Source::Local(_) => "local",
            Source::Default => "default",
        };
        histogram!(ANALYSIS_DURATION, "source" => source_tag).record(started.elapsed().as_secs_f64());

        match &result {
            Ok(ratio) => tracing::info!(
                %source,
                premium = ratio.premium,
                claims = ratio.claims,
                ratio = ratio.ratio,
                records = ratio.record_count,
                "Computed loss ratio"
            ),
            Err(err) => {
                counter!(ANALYSIS_FAILURES, "kind" => err.kind().as_str()).increment(1);
                tracing::warn!(%source, error = %err, "Loss ratio analysis failed");
            }
        }

        result
    }

    async fn load(&self, source: &Source) -> Result<Table, AnalysisError> {
        match source {
            Source::Remote(url) => {
                let bytes = self.fetcher.fetch(url).await?;
                run_blocking(move || Table::from_bytes(&bytes)).await
            }
            Source::Local(path) => {
                let path = path.clone();
                run_blocking(move || Table::from_path(&path)).await
            }
            Source::Default => {
                let path = self.default_source.clone();
                run_blocking(move || Table::from_path(&path)).await
            }
        }
    }
}

/// Workbook parsing is CPU bound, keep it off the async workers.
async fn run_blocking<F>(f: F) -> Result<Table, AnalysisError>
where
    F: FnOnce() -> Result<Table, AnalysisError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AnalysisError::Parse(e.to_string()))?
}
