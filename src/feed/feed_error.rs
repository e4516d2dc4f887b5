use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Network(#[from] crate::http::TransportError),
    #[error("stock API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("stock API returned invalid JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("could not save raw dump to {}: {source}", path.display())]
    Dump {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("unexpected feed shape: {0}")]
    Shape(String),
}
