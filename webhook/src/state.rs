use crate::session::SessionStore;
use crate::slack::ChatApi;
use crate::tasks::BackgroundTasks;
use actuarial::Calculator;
use commentary::Commentary;
use shared::credential::Credential;
use std::sync::Arc;

/// Everything a request handler needs, shared across the router.
#[derive(Clone)]
pub struct AppState {
    pub calculator: Calculator,
    /// `None` when no completion API key is configured.
    pub commentary: Option<Arc<Commentary>>,
    pub chat: Arc<dyn ChatApi>,
    pub sessions: SessionStore,
    pub tasks: BackgroundTasks,
    pub threshold: f64,
    pub credentials: CredentialStatus,
}

/// Which credentials were configured at startup, for `/health`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialStatus {
    pub slack_token: &'static str,
    pub completion_api: &'static str,
}

impl CredentialStatus {
    pub fn new(slack_token: &Credential, completion_api: &Credential) -> Self {
        CredentialStatus {
            slack_token: slack_token.status(),
            completion_api: completion_api.status(),
        }
    }
}
