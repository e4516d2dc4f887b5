// github.rs
use crate::http::{ApiRequest, Transport};
use crate::publish::PublishError;
use base64::Engine;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::info;
use url::Url;

const GITHUB_JSON: &str = "application/vnd.github.v3+json";

/// Where the artifact goes on the hosting side.
#[derive(Clone)]
pub struct HostingTarget {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub branch: String,
    pub token: String,
    pub commit_message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub mode: PublishMode,
    pub html_url: String,
    pub raw_url: String,
}

/// Outcome of the existence probe.
#[derive(Debug, PartialEq)]
enum UploadPlan {
    Create,
    Update { sha: String },
}

#[derive(Deserialize)]
struct ExistingFile {
    sha: Option<String>,
}

#[derive(Deserialize)]
struct PutResponse {
    content: Option<PutContent>,
}

#[derive(Deserialize)]
struct PutContent {
    html_url: Option<String>,
    download_url: Option<String>,
}

pub struct GithubPublisher<'a> {
    transport: &'a dyn Transport,
    target: &'a HostingTarget,
}

impl<'a> GithubPublisher<'a> {
    pub fn new(transport: &'a dyn Transport, target: &'a HostingTarget) -> Self {
        Self { transport, target }
    }

    /// `<api>/repos/<owner>/<repo>/contents/<path>`
    pub fn contents_url(&self) -> Result<Url, PublishError> {
        let t = self.target;
        let mut url = Url::parse(&t.api_url).map_err(|e| PublishError::Url(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| PublishError::Url(format!("{} cannot be a base URL", t.api_url)))?
            .pop_if_empty()
            .extend(["repos", t.owner.as_str(), t.repo.as_str(), "contents"])
            .extend(t.path.split('/').filter(|s| !s.is_empty()));

        Ok(url)
    }

    /// Single attempt: read, probe, then create or update.
    pub fn publish(&self, local_path: &Path) -> Result<Published, PublishError> {
        let bytes = fs::read(local_path).map_err(|source| PublishError::Read {
            path: local_path.to_path_buf(),
            source,
        })?;

        let url = self.contents_url()?;
        let request = ApiRequest::new(url.as_str(), &self.target.token).accept(GITHUB_JSON);

        let plan = self.probe(&request)?;

        let mut body = json!({
            "message": self.target.commit_message,
            "content": base64::engine::general_purpose::STANDARD.encode(&bytes),
            "branch": self.target.branch,
        });
        let mode = match plan {
            UploadPlan::Create => PublishMode::Created,
            UploadPlan::Update { sha } => {
                body["sha"] = Value::String(sha);
                PublishMode::Updated
            }
        };

        info!(url = %url, ?mode, bytes = bytes.len(), "uploading artifact");

        let reply = self.transport.put_json(&request, &body)?;

        if reply.status != StatusCode::OK && reply.status != StatusCode::CREATED {
            return Err(PublishError::Upload {
                status: reply.status,
                body: reply.body,
            });
        }

        let content = serde_json::from_str::<PutResponse>(&reply.body)
            .ok()
            .and_then(|r| r.content);

        let published = Published {
            mode,
            html_url: content
                .as_ref()
                .and_then(|c| c.html_url.clone())
                .unwrap_or_else(|| self.html_url()),
            raw_url: content
                .and_then(|c| c.download_url)
                .unwrap_or_else(|| self.raw_url()),
        };

        info!(status = %reply.status, html_url = %published.html_url, "artifact published");
        Ok(published)
    }

    fn probe(&self, request: &ApiRequest) -> Result<UploadPlan, PublishError> {
        info!(url = %request.url, "checking whether the file already exists");

        // Ask for the target branch, not the default one.
        let request = request.clone().query("ref", &self.target.branch);
        let reply = self.transport.get(&request)?;

        match reply.status {
            StatusCode::OK => {
                let existing: ExistingFile = serde_json::from_str(&reply.body)
                    .map_err(|e| PublishError::Response(e.to_string()))?;
                let sha = existing
                    .sha
                    .ok_or_else(|| PublishError::Response("existing file has no sha".to_string()))?;
                info!(%sha, "existing file found, updating");
                Ok(UploadPlan::Update { sha })
            }
            StatusCode::NOT_FOUND => {
                info!("no existing file, creating");
                Ok(UploadPlan::Create)
            }
            status => Err(PublishError::Probe {
                status,
                body: reply.body,
            }),
        }
    }

    fn html_url(&self) -> String {
        let t = self.target;
        format!(
            "https://github.com/{}/{}/blob/{}/{}",
            t.owner, t.repo, t.branch, t.path
        )
    }

    fn raw_url(&self) -> String {
        let t = self.target;
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            t.owner, t.repo, t.branch, t.path
        )
    }
}
