use crate::errors::{AnalysisError, REQUIRED_COLUMNS};
use crate::table::Table;

/// Outcome of one analysis request.
pub type RatioResult = Result<LossRatio, AnalysisError>;

/// Aggregate claims/premium figures for a portfolio.
#[derive(Clone, Debug, PartialEq)]
pub struct LossRatio {
    pub premium: f64,
    pub claims: f64,
    /// Claims as a percentage of premium; zero when there is no positive premium.
    pub ratio: f64,
    pub record_count: usize,
}

impl LossRatio {
    pub fn new(premium: f64, claims: f64, record_count: usize) -> Self {
        LossRatio {
            premium,
            claims,
            ratio: loss_ratio(premium, claims),
            record_count,
        }
    }

    /// Validates the schema and reduces the Premium and Claims columns.
    pub fn from_table(table: &Table) -> RatioResult {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !table.has_column(column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AnalysisError::MissingColumns(missing));
        }

        let premium = table.sum_column("Premium")?;
        let claims = table.sum_column("Claims")?;

        Ok(LossRatio::new(premium, claims, table.record_count()))
    }

    pub fn exceeds(&self, threshold: f64) -> bool {
        self.ratio > threshold
    }
}

pub fn loss_ratio(premium: f64, claims: f64) -> f64 {
    if premium > 0.0 {
        claims / premium * 100.0
    } else {
        0.0
    }
}
