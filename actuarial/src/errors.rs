use thiserror::Error;

/// The column names every workbook must provide.
pub const REQUIRED_COLUMNS: [&str; 2] = ["Premium", "Claims"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisErrorKind {
    NotFound,
    MissingColumns,
    Download,
    Parse,
    UnsupportedFile,
}

impl AnalysisErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AnalysisErrorKind::NotFound => "not_found",
            AnalysisErrorKind::MissingColumns => "missing_columns",
            AnalysisErrorKind::Download => "download",
            AnalysisErrorKind::Parse => "parse",
            AnalysisErrorKind::UnsupportedFile => "unsupported_file",
        }
    }
}

/// Why an analysis could not produce a loss ratio.
///
/// The `Display` output is shown to chat users as-is.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum AnalysisError {
    #[error("Excel file not found")]
    NotFound,

    #[error(
        "Missing required columns: {}. File must have \"Premium\" and \"Claims\" columns.",
        .0.join(", ")
    )]
    MissingColumns(Vec<String>),

    #[error("Failed to download file: {0}")]
    Download(String),

    #[error("Error reading file: {0}")]
    Parse(String),

    #[error("Please upload an Excel file (.xlsx or .xls). You uploaded: {0}")]
    UnsupportedFile(String),
}

impl AnalysisError {
    pub fn kind(&self) -> AnalysisErrorKind {
        match self {
            AnalysisError::NotFound => AnalysisErrorKind::NotFound,
            AnalysisError::MissingColumns(_) => AnalysisErrorKind::MissingColumns,
            AnalysisError::Download(_) => AnalysisErrorKind::Download,
            AnalysisError::Parse(_) => AnalysisErrorKind::Parse,
            AnalysisError::UnsupportedFile(_) => AnalysisErrorKind::UnsupportedFile,
        }
    }
}

/// Failure to fetch a remote workbook.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl From<FetchError> for AnalysisError {
    fn from(err: FetchError) -> Self {
        AnalysisError::Download(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_what_users_see() {
        assert_eq!(AnalysisError::NotFound.to_string(), "Excel file not found");
        assert_eq!(
            AnalysisError::MissingColumns(vec!["Claims".into()]).to_string(),
            "Missing required columns: Claims. File must have \"Premium\" and \"Claims\" columns."
        );
        assert_eq!(
            AnalysisError::MissingColumns(vec!["Premium".into(), "Claims".into()]).to_string(),
            "Missing required columns: Premium, Claims. File must have \"Premium\" and \"Claims\" columns."
        );
        assert_eq!(
            AnalysisError::UnsupportedFile("data.csv".into()).to_string(),
            "Please upload an Excel file (.xlsx or .xls). You uploaded: data.csv"
        );
        assert_eq!(
            AnalysisError::Download("connection refused".into()).kind(),
            AnalysisErrorKind::Download
        );
    }
}
