use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Network(#[from] crate::http::TransportError),
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid hosting URL: {0}")]
    Url(String),
    #[error("existence check returned {status}: {body}")]
    Probe { status: StatusCode, body: String },
    #[error("upload returned {status}: {body}")]
    Upload { status: StatusCode, body: String },
    #[error("unexpected hosting response: {0}")]
    Response(String),
}
