use crate::config::{file_name, Config};
use crate::domain::normalize;
use crate::errors::PipelineError;
use crate::feed::{load_raw_feed, StockFetcher};
use crate::http::Transport;
use crate::output::{write_artifact, Artifact, Statistics};
use crate::publish::{GithubPublisher, Published};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct RunSummary {
    pub records: usize,
    pub output_path: PathBuf,
    pub statistics: Statistics,
    pub published: Published,
}

/// fetch → normalize → write → report → publish, strictly in that order.
/// The first failing stage ends the run.
pub fn run(config: &Config, transport: &dyn Transport) -> Result<RunSummary, PipelineError> {
    let feed = if config.feed.reuse_dump {
        info!(path = %config.feed.raw_dump_path.display(), "reusing saved raw dump");
        load_raw_feed(&config.feed.raw_dump_path)?
    } else {
        StockFetcher::new(transport, &config.feed).fetch()?
    };

    let records = normalize(&feed)?;
    info!(records = records.len(), "feed normalized");
    if records.is_empty() {
        return Err(PipelineError::NoRecords);
    }

    let artifact = Artifact::new(records, file_name(&config.feed.raw_dump_path));
    write_artifact(&config.output_path, &artifact)?;

    let statistics = Statistics::compute(&artifact.properties);
    println!("{statistics}");

    let published = GithubPublisher::new(transport, &config.hosting).publish(&config.output_path)?;

    Ok(RunSummary {
        records: artifact.metadata.total_properties,
        output_path: config.output_path.clone(),
        statistics,
        published,
    })
}
