// fetcher.rs
use crate::config::FeedSettings;
use crate::feed::{FetchError, LoadError};
use crate::http::{ApiRequest, Transport};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

pub struct StockFetcher<'a> {
    transport: &'a dyn Transport,
    settings: &'a FeedSettings,
}

impl<'a> StockFetcher<'a> {
    pub fn new(transport: &'a dyn Transport, settings: &'a FeedSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// One GET against the stock endpoint. The body is returned parsed and
    /// also kept verbatim on disk so a later run can reuse it.
    pub fn fetch(&self) -> Result<Value, FetchError> {
        let request = ApiRequest::new(&self.settings.api_url, &self.settings.token)
            .query("promoter_per_page", self.settings.promoters_per_page)
            .query("estates_per_promoter", self.settings.estates_per_promoter);

        info!(url = %self.settings.api_url, "fetching stock feed");

        let reply = self.transport.get(&request)?;

        if !reply.status.is_success() {
            return Err(FetchError::Status {
                status: reply.status,
                body: reply.body,
            });
        }

        let data: Value = serde_json::from_str(&reply.body)?;

        save_raw_dump(&self.settings.raw_dump_path, &data)?;
        info!(
            status = %reply.status,
            path = %self.settings.raw_dump_path.display(),
            "stock feed saved"
        );

        Ok(data)
    }
}

pub fn save_raw_dump(path: &Path, data: &Value) -> Result<(), FetchError> {
    let dump_err = |source: std::io::Error| FetchError::Dump {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(dump_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush().map_err(dump_err)?;
    Ok(())
}

/// Reads back a dump written by a previous fetch.
pub fn load_raw_feed(path: &Path) -> Result<Value, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let data: Value = serde_json::from_str(&text)?;
    Ok(data)
}
