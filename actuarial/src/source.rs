use crate::errors::FetchError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use shared::credential::Credential;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// File extensions accepted from chat uploads.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &[".xlsx", ".xls"];

/// Returns true if `name` ends in one of the accepted spreadsheet extensions.
pub fn is_spreadsheet_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SPREADSHEET_EXTENSIONS
        .iter()
        .any(|extension| lower.ends_with(extension))
}

/// Where a workbook is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Downloaded with the bot's bearer token.
    Remote(Url),
    Local(PathBuf),
    /// The workbook configured as `default_source`.
    Default,
}

impl Source {
    /// Interprets an opaque locator: http(s) URLs are remote, anything else is a path.
    pub fn from_locator(locator: &str) -> Self {
        if (locator.starts_with("http://") || locator.starts_with("https://"))
            && let Ok(url) = Url::parse(locator)
        {
            return Source::Remote(url);
        }
        Source::Local(PathBuf::from(locator))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{url}"),
            Source::Local(path) => write!(f, "{}", path.display()),
            Source::Default => f.write_str("<default>"),
        }
    }
}

/// Fetches the raw bytes of a remote workbook.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Bytes, FetchError>;
}

/// Downloads files over HTTP with `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    token: Credential,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, token: Credential) -> Self {
        HttpFetcher { client, token }
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.token.expose()))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?)
    }
}
