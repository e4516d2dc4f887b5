// errors.rs
use crate::feed::{FetchError, LoadError};
use crate::output::WriteError;
use crate::publish::PublishError;
use thiserror::Error;

/// Problems with the environment-supplied settings, caught before any stage runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Stage-level failure of a run. Every variant stops the remaining stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
    #[error("feed contained no eligible units")]
    NoRecords,
    #[error("write failed: {0}")]
    Write(#[from] WriteError),
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Config(_) => "config",
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Load(_) | PipelineError::NoRecords => "normalize",
            PipelineError::Write(_) => "write",
            PipelineError::Publish(_) => "publish",
        }
    }

    /// Publishing is the only stage that runs after the artifact is on disk.
    pub fn artifact_written(&self) -> bool {
        matches!(self, PipelineError::Publish(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_failures_report_their_own_stage() {
        let err = PipelineError::from(ConfigError::Missing("GITHUB_TOKEN"));

        assert_eq!(err.stage(), "config");
        assert!(!err.artifact_written());
        assert_eq!(
            err.to_string(),
            "configuration error: environment variable GITHUB_TOKEN is not set"
        );
    }

    #[test]
    fn only_publish_failures_leave_an_artifact_behind() {
        assert!(!PipelineError::NoRecords.artifact_written());
        assert_eq!(PipelineError::NoRecords.stage(), "normalize");

        let publish = PipelineError::from(PublishError::Url("https://".to_string()));
        assert_eq!(publish.stage(), "publish");
        assert!(publish.artifact_written());
    }
}
