//! Natural-language commentary on loss ratio results.
//!
//! Talks to any OpenAI-compatible chat completions endpoint. Commentary is
//! always best-effort: a failed completion never blocks the numeric result.

pub mod client;
pub mod config;
pub mod errors;
pub mod generator;
pub mod metrics_defs;
pub mod prompts;

pub use client::{ChatCompletionsClient, ChatMessage, CompletionApi, CompletionRequest, Role};
pub use config::Config;
pub use errors::CommentaryError;
pub use generator::Commentary;
