use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Top-level client errors. HTTP status handling lives in
/// `client::ClientError`; this covers everything around it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
}
