use crate::domain::UnitRecord;
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DESCRIPTION: &str = "Données immobilières Miizy structurées par bien";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("could not serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub extraction_date: DateTime<FixedOffset>,
    pub total_properties: usize,
    pub description: String,
    pub source: String,
}

/// The structured output file: metadata first, then every unit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub metadata: Metadata,
    pub properties: Vec<UnitRecord>,
}

impl Artifact {
    pub fn new(properties: Vec<UnitRecord>, source: impl Into<String>) -> Self {
        Self {
            metadata: Metadata {
                extraction_date: Local::now().into(),
                total_properties: properties.len(),
                description: DESCRIPTION.to_string(),
                source: source.into(),
            },
            properties,
        }
    }
}

/// Writes to a sibling temp file and renames it over `path`, so the target
/// either holds the complete artifact or is left untouched.
pub fn write_artifact(path: &Path, artifact: &Artifact) -> Result<(), WriteError> {
    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = write_pretty(&tmp_path, artifact).and_then(|_| {
        fs::rename(&tmp_path, path).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
        return result;
    }

    info!(
        path = %path.display(),
        total_properties = artifact.metadata.total_properties,
        "structured artifact written"
    );
    Ok(())
}

fn write_pretty(path: &Path, artifact: &Artifact) -> Result<(), WriteError> {
    let io_err = |source: std::io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, artifact)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}
