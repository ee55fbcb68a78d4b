/// Main application entry point: ingest the configured planning and catalog files
use chrono::Utc;
use s1_completeness::config::AppConfig;
use s1_completeness::domain::{CatalogFile, PlanningFile};
use s1_completeness::errors::IngestionError;
use s1_completeness::repo::InMemoryStore;
use s1_completeness::services::{IngestionReport, IngestionRunner};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!(
        "Configuration loaded: {} planning files, {} catalog files",
        config.planning_inputs.len(),
        config.catalog_inputs.len()
    );

    let mut runner = IngestionRunner::from_config(InMemoryStore::new(), &config);
    let mut reports: Vec<IngestionReport> = Vec::new();
    let mut failures = 0;

    // Planning first so catalog entries find their planned imaging
    for path in &config.planning_inputs {
        let result = read_json::<PlanningFile>(path).and_then(|file| {
            Ok(runner.ingest_planning(&file, Utc::now().naive_utc())?)
        });
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                error!("[{}] Planning file {} rejected: {:#}", failure_code(&e), path.display(), e);
                failures += 1;
            }
        }
    }

    for path in &config.catalog_inputs {
        let result = read_json::<CatalogFile>(path).and_then(|file| {
            Ok(runner.ingest_catalog(&file, Utc::now().naive_utc())?)
        });
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                error!("[{}] Catalog file {} rejected: {:#}", failure_code(&e), path.display(), e);
                failures += 1;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    info!(
        "Ingestion finished: {} files committed, {} rejected",
        reports.len(),
        failures
    );

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Short code of an ingestion failure; anything else is an input read failure
fn failure_code(e: &anyhow::Error) -> &'static str {
    e.downcast_ref::<IngestionError>()
        .map_or("INPUT_ERROR", IngestionError::code)
}
