use actuarial::{RatioResult, Source};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Identifies the conversation a session belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub team_id: String,
    pub channel_id: String,
}

impl SessionKey {
    pub fn new(team_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        SessionKey {
            team_id: team_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

/// The most recently uploaded workbook of a channel.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredFile {
    pub source: Source,
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    pub file: Option<StoredFile>,
    pub last_result: Option<RatioResult>,
}

/// In-memory session state shared by all handlers.
///
/// Sessions are created on first write and live for the lifetime of the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionKey, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SessionKey) -> Option<Session> {
        self.sessions.read().get(key).cloned()
    }

    pub fn stored_file(&self, key: &SessionKey) -> Option<StoredFile> {
        self.sessions
            .read()
            .get(key)
            .and_then(|session| session.file.clone())
    }

    pub fn last_result(&self, key: &SessionKey) -> Option<RatioResult> {
        self.sessions
            .read()
            .get(key)
            .and_then(|session| session.last_result.clone())
    }

    /// Replaces the stored file and its result under a single write lock.
    pub fn record_upload(&self, key: SessionKey, file: StoredFile, result: RatioResult) {
        let mut sessions = self.sessions.write();
        let session = sessions.entry(key).or_default();
        session.file = Some(file);
        session.last_result = Some(result);
    }

    pub fn record_result(&self, key: SessionKey, result: RatioResult) {
        self.sessions.write().entry(key).or_default().last_result = Some(result);
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
