use std::process::ExitCode;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airspace_notice_builder::{AppConfig, NoticePipeline, SystemClock};

fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "airspace_notice_builder=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;
    info!("Configuration loaded successfully");

    let pipeline = NoticePipeline::from_config(&config, SystemClock)?;
    let summary = pipeline.run().await?;

    info!(
        path = %config.output.path.display(),
        areas = summary.areas_emitted,
        "Notice file created"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Failed to build airspace notice");
            ExitCode::FAILURE
        }
    }
}
