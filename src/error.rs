use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("engine is already running")]
    AlreadyRunning,

    #[error("engine has been disposed")]
    Disposed,
}
