use anyhow::Result;
use contracts::usecases::u501_build_schema::BuildSchemaRequest;
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use super::logger::TaskLogger;
use crate::domain::a001_schema;
use crate::usecases::u501_build_schema::SchemaRunner;

/// Фоновый воркер: забирает запуски в статусе Pending и выполняет их.
///
/// Каждый запуск идёт в своей tokio-задаче; разные схемы обрабатываются
/// параллельно, одна и та же схема никогда не запускается дважды одновременно.
#[derive(Clone)]
pub struct SchemaTaskWorker {
    runner: SchemaRunner,
    db: DatabaseConnection,
    logger: Arc<TaskLogger>,
    interval_seconds: u64,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SchemaTaskWorker {
    pub fn new(
        runner: SchemaRunner,
        db: DatabaseConnection,
        logger: Arc<TaskLogger>,
        interval_seconds: u64,
    ) -> Self {
        Self {
            runner,
            db,
            logger,
            interval_seconds,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Запускает цикл опроса очереди.
    pub async fn run_loop(&self) {
        info!(
            "Schema task worker started with interval {} seconds",
            self.interval_seconds
        );
        let mut interval = time::interval(time::Duration::from_secs(self.interval_seconds));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if let Err(e) = self.process_pending().await {
                error!("Error processing pending schemas: {:?}", e);
            }
        }
    }

    /// Запускает все ожидающие схемы, которые ещё не выполняются.
    pub async fn process_pending(&self) -> Result<Vec<JoinHandle<Result<String>>>> {
        let pending = a001_schema::service::list_pending(&self.db).await?;
        let mut handles = Vec::new();
        for schema in pending {
            let schema_id = schema.to_string_id();
            if self.is_in_flight(&schema_id) {
                continue;
            }
            info!("Schema {} is pending. Running...", schema_id);
            handles.push(self.spawn_run(BuildSchemaRequest { schema_id }));
        }
        Ok(handles)
    }

    /// Асинхронно выполнить один запуск; результат задачи это id схемы.
    pub fn spawn_run(&self, request: BuildSchemaRequest) -> JoinHandle<Result<String>> {
        let worker = self.clone();
        self.mark_in_flight(&request.schema_id, true);

        tokio::spawn(async move {
            let schema_id = request.schema_id;
            worker.log(&schema_id, "Schema build started");

            let result = worker.runner.run_by_id(&schema_id).await;
            worker.mark_in_flight(&schema_id, false);

            match result {
                Ok(response) => {
                    let line = match &response.error {
                        Some(e) => format!("Schema build finished with status {}: {}", response.status, e),
                        None => format!("Schema build finished with status {}", response.status),
                    };
                    worker.log(&schema_id, &line);
                    Ok(schema_id)
                }
                Err(e) => {
                    error!("Schema {} run failed: {:?}", schema_id, e);
                    worker.log(&schema_id, &format!("Schema build aborted: {}", e));
                    Err(e)
                }
            }
        })
    }

    fn is_in_flight(&self, schema_id: &str) -> bool {
        self.in_flight
            .lock()
            .map(|set| set.contains(schema_id))
            .unwrap_or(false)
    }

    fn mark_in_flight(&self, schema_id: &str, running: bool) {
        if let Ok(mut set) = self.in_flight.lock() {
            if running {
                set.insert(schema_id.to_string());
            } else {
                set.remove(schema_id);
            }
        }
    }

    fn log(&self, schema_id: &str, message: &str) {
        if let Err(e) = self.logger.write_log(schema_id, message) {
            warn!("Cannot write task log for schema {}: {}", schema_id, e);
        }
    }
}
