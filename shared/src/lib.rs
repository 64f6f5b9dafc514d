pub mod credential;
pub mod metrics_defs;
