// config.rs

use crate::errors::ConfigError;
use crate::publish::HostingTarget;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const DEFAULT_API_URL: &str = "https://miizy.com/miizy/stock";
const DEFAULT_PAGE_SIZE: u32 = 200;
const DEFAULT_RAW_DUMP: &str = "miizy_dump.json";
const DEFAULT_OUTPUT: &str = "miizy_properties_structured.json";
const DEFAULT_GITHUB_API: &str = "https://api.github.com";
const DEFAULT_BRANCH: &str = "main";

pub struct FeedSettings {
    pub api_url: String,
    pub token: String,
    pub promoters_per_page: u32,
    pub estates_per_promoter: u32,
    pub raw_dump_path: PathBuf,
    /// Skip the network and normalize the dump a previous run left behind.
    pub reuse_dump: bool,
}

pub struct Config {
    pub feed: FeedSettings,
    pub output_path: PathBuf,
    pub hosting: HostingTarget,
    /// Deadline for each HTTP call; unset means none.
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// Secrets and destinations come from the environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let page_size = |key: &'static str| match get(key) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::Invalid { var: key, value: raw }),
            None => Ok(DEFAULT_PAGE_SIZE),
        };

        let raw_dump_path =
            PathBuf::from(get("MIIZY_RAW_DUMP_PATH").unwrap_or_else(|| DEFAULT_RAW_DUMP.into()));
        let output_path =
            PathBuf::from(get("MIIZY_OUTPUT_PATH").unwrap_or_else(|| DEFAULT_OUTPUT.into()));

        let reuse_dump = match get("MIIZY_REUSE_DUMP") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "MIIZY_REUSE_DUMP",
                        value: raw,
                    })
                }
            },
            None => false,
        };

        let http_timeout = match get("MIIZY_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "MIIZY_HTTP_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => None,
        };

        // The dump can be reused without a feed token.
        let token = if reuse_dump {
            get("MIIZY_API_TOKEN").unwrap_or_default()
        } else {
            required("MIIZY_API_TOKEN")?
        };

        let feed = FeedSettings {
            api_url: get("MIIZY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            token,
            promoters_per_page: page_size("MIIZY_PROMOTERS_PER_PAGE")?,
            estates_per_promoter: page_size("MIIZY_ESTATES_PER_PROMOTER")?,
            raw_dump_path,
            reuse_dump,
        };

        let path = get("GITHUB_PATH").unwrap_or_else(|| file_name(&output_path));
        let hosting = HostingTarget {
            api_url: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API.into()),
            owner: required("GITHUB_OWNER")?,
            repo: required("GITHUB_REPO")?,
            branch: get("GITHUB_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.into()),
            token: required("GITHUB_TOKEN")?,
            commit_message: get("GITHUB_COMMIT_MESSAGE")
                .unwrap_or_else(|| format!("Update {path} via miizy_sync")),
            path,
        };

        Ok(Config {
            feed,
            output_path,
            hosting,
            http_timeout,
        })
    }

    /// Logs everything except the two tokens.
    pub fn trace_loaded(&self) {
        info!(
            api_url = %self.feed.api_url,
            promoters_per_page = self.feed.promoters_per_page,
            estates_per_promoter = self.feed.estates_per_promoter,
            raw_dump = %self.feed.raw_dump_path.display(),
            reuse_dump = self.feed.reuse_dump,
            output = %self.output_path.display(),
            http_timeout = ?self.http_timeout,
            destination = %format!(
                "{}/{}:{}@{}",
                self.hosting.owner, self.hosting.repo, self.hosting.path, self.hosting.branch
            ),
            "configuration loaded"
        );
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
