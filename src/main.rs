use crate::config::Config;
use crate::errors::PipelineError;
use crate::http::ReqwestTransport;
use crate::publish::PublishMode;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod domain;
mod errors;
mod feed;
mod http;
mod output;
mod pipeline;
mod publish;

#[cfg(test)]
mod tests;

fn main() {
    // 1️⃣ Secrets and destinations from the environment (.env is optional)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => fail(&PipelineError::from(e), None),
    };
    config.trace_loaded();

    // 2️⃣ One blocking client shared by the feed and the hosting API
    let transport = match ReqwestTransport::new(config.http_timeout) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("❌ HTTP client init failed: {e}");
            std::process::exit(1);
        }
    };

    // 3️⃣ Run the whole pipeline once
    match pipeline::run(&config, &transport) {
        Ok(summary) => {
            let action = match summary.published.mode {
                PublishMode::Created => "created",
                PublishMode::Updated => "updated",
            };
            println!("🎉 {} units written to {}", summary.records, summary.output_path.display());
            println!("✅ Remote file {action}");
            println!("🔗 URL: {}", summary.published.html_url);
            println!("🔗 Raw URL: {}", summary.published.raw_url);
        }
        Err(e) => fail(&e, Some(&config.output_path)),
    }
}

fn fail(e: &PipelineError, output_path: Option<&Path>) -> ! {
    eprintln!("❌ {} stage failed: {e}", e.stage());
    match output_path {
        Some(path) if e.artifact_written() => {
            eprintln!("📄 {} was written but not published", path.display())
        }
        _ => eprintln!("📄 nothing written"),
    }
    std::process::exit(1);
}
