pub mod domain;
pub mod shared;
pub mod system;
pub mod usecases;

use std::path::Path;
use std::sync::Arc;

use system::tasks::{SchemaTaskWorker, TaskLogger};
use usecases::u501_build_schema::{ProgressTracker, SalesforceApiClient, SchemaRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = shared::config::load_config()?;
    let log_dir = Path::new(&config.worker.log_dir);
    system::tracing::initialize(log_dir)?;

    let db_path = shared::config::get_database_path(&config)?;
    let db = shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize database: {}", e))?;

    let client = SalesforceApiClient::new(config.salesforce.request_timeout_secs)?;
    let runner = SchemaRunner::new(
        Arc::new(client),
        db.clone(),
        &config.salesforce,
        Arc::new(ProgressTracker::new()),
    );

    let worker = SchemaTaskWorker::new(
        runner,
        db,
        Arc::new(TaskLogger::new(log_dir)),
        config.worker.interval_seconds,
    );

    tracing::info!(
        "schemalister started: api_version={}, database={}",
        config.salesforce.api_version,
        db_path.display()
    );
    worker.run_loop().await;
    Ok(())
}
