use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommentaryError {
    #[error("AI commentary is not configured")]
    NotConfigured,

    #[error("invalid completion API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion API returned no content")]
    EmptyResponse,
}
