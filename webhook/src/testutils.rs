use crate::session::SessionStore;
use crate::slack::{ChatApi, SlackError};
use crate::state::{AppState, CredentialStatus};
use crate::tasks::BackgroundTasks;
use actuarial::{Calculator, FetchError, SourceFetcher};
use async_trait::async_trait;
use bytes::Bytes;
use commentary::{Commentary, CommentaryError, CompletionApi, CompletionRequest};
use rust_xlsxwriter::Workbook;
use shared::credential::Credential;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Builds an in-memory xlsx workbook with one header row and numeric rows.
pub fn workbook_bytes(headers: &[&str], rows: &[Vec<f64>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (row, values) in rows.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            worksheet
                .write_number(row as u32 + 1, col as u16, *value)
                .unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

pub fn write_workbook(dir: &Path, name: &str, headers: &[&str], rows: &[Vec<f64>]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, workbook_bytes(headers, rows)).unwrap();
    path
}

/// Records posted messages instead of sending them.
#[derive(Default)]
pub struct MockChat {
    messages: Mutex<Vec<(String, String)>>,
}

impl MockChat {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    /// Polls until at least `count` messages were posted.
    pub async fn wait_for(&self, count: usize) -> Vec<(String, String)> {
        for _ in 0..200 {
            let messages = self.messages();
            if messages.len() >= count {
                return messages;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {count} messages, got {:?}", self.messages());
    }
}

#[async_trait]
impl ChatApi for MockChat {
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        self.messages
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }
}

/// Serves canned workbooks by URL.
#[derive(Default)]
pub struct MockFetcher {
    files: HashMap<Url, Bytes>,
    requests: Mutex<Vec<Url>>,
}

impl MockFetcher {
    pub fn with_file(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(Url::parse(url).unwrap(), Bytes::from(bytes));
        self
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<Bytes, FetchError> {
        self.requests.lock().unwrap().push(url.clone());
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Other("404 Not Found".into()))
    }
}

/// Completion API returning a fixed reply, or failing when there is none.
#[derive(Default)]
pub struct ScriptedCompletions {
    reply: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletions {
    pub fn replying(reply: &str) -> Self {
        ScriptedCompletions {
            reply: Some(reply.to_string()),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionApi for ScriptedCompletions {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CommentaryError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone().ok_or(CommentaryError::EmptyResponse)
    }
}

pub fn commentary_with(api: Arc<ScriptedCompletions>) -> Commentary {
    Commentary::new(api, &commentary::Config::default(), 75.0)
}

pub struct TestApp {
    pub state: AppState,
    pub chat: Arc<MockChat>,
    pub fetcher: Arc<MockFetcher>,
}

impl TestApp {
    pub fn new(default_source: PathBuf, fetcher: MockFetcher) -> Self {
        Self::build(default_source, fetcher, None)
    }

    pub fn with_commentary(
        default_source: PathBuf,
        fetcher: MockFetcher,
        api: Arc<ScriptedCompletions>,
    ) -> Self {
        Self::build(default_source, fetcher, Some(Arc::new(commentary_with(api))))
    }

    fn build(
        default_source: PathBuf,
        fetcher: MockFetcher,
        commentary: Option<Arc<Commentary>>,
    ) -> Self {
        let chat = Arc::new(MockChat::default());
        let fetcher = Arc::new(fetcher);
        let completion_key = if commentary.is_some() {
            Credential::new("sk-test")
        } else {
            Credential::default()
        };

        let state = AppState {
            calculator: Calculator::new(fetcher.clone(), default_source),
            commentary,
            chat: chat.clone(),
            sessions: SessionStore::new(),
            tasks: BackgroundTasks::new(Duration::from_secs(5)),
            threshold: 75.0,
            credentials: CredentialStatus::new(&Credential::new("xoxb-test"), &completion_key),
        };

        TestApp {
            state,
            chat,
            fetcher,
        }
    }
}
