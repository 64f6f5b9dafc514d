//! Loss ratio analysis of insurance portfolio workbooks.
//!
//! A workbook with `Premium` and `Claims` columns is loaded from a
//! [`Source`], reduced to a [`LossRatio`] by the [`Calculator`], and
//! rendered for chat with [`format::render`].

pub mod calculator;
pub mod errors;
pub mod format;
pub mod metrics_defs;
pub mod ratio;
pub mod source;
pub mod table;

#[cfg(test)]
mod testutils;

pub use calculator::Calculator;
pub use errors::{AnalysisError, AnalysisErrorKind, FetchError};
pub use ratio::{LossRatio, RatioResult};
pub use source::{HttpFetcher, Source, SourceFetcher};
