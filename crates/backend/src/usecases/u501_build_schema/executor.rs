use super::error::SchemaBuildError;
use super::object_ingestor::ObjectIngestor;
use super::progress_tracker::ProgressTracker;
use super::salesforce_api_client::{MetadataClient, SalesforceConnection};
use super::usage_scanner::UsageScanner;
use crate::domain::a001_schema;
use crate::shared::config::SalesforceConfig;
use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_schema::aggregate::{Schema, SchemaId};
use contracts::usecases::u501_build_schema::{BuildPhase, BuildProgress, BuildSchemaResponse};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

/// Executor для UseCase построения схемы.
///
/// Pending -> {Finished, Error}. Ошибки компонентов не выходят наружу,
/// а переводятся в status/error запуска; `Err` возвращается только если
/// запуск не удалось загрузить или сохранить.
#[derive(Clone)]
pub struct SchemaRunner {
    client: Arc<dyn MetadataClient>,
    db: DatabaseConnection,
    config: SalesforceConfig,
    progress_tracker: Arc<ProgressTracker>,
}

impl SchemaRunner {
    pub fn new(
        client: Arc<dyn MetadataClient>,
        db: DatabaseConnection,
        config: &SalesforceConfig,
        progress_tracker: Arc<ProgressTracker>,
    ) -> Self {
        Self {
            client,
            db,
            config: config.clone(),
            progress_tracker,
        }
    }

    /// Получить текущий прогресс запуска
    pub fn get_progress(&self, schema_id: &str) -> Option<BuildProgress> {
        self.progress_tracker.get_progress(schema_id)
    }

    /// Загрузить запуск по строковому id и выполнить его
    pub async fn run_by_id(&self, schema_id: &str) -> Result<BuildSchemaResponse> {
        let id = Uuid::parse_str(schema_id)
            .map_err(|_| anyhow::anyhow!("Invalid schema_id: {}", schema_id))?;
        let schema = a001_schema::service::get_by_id(&self.db, SchemaId(id))
            .await?
            .ok_or_else(|| anyhow::anyhow!("Schema not found: {}", schema_id))?;
        self.run(schema).await
    }

    /// Выполнить запуск до конечного статуса
    pub async fn run(&self, mut schema: Schema) -> Result<BuildSchemaResponse> {
        let schema_key = schema.to_string_id();
        if schema.status.is_terminal() {
            tracing::warn!(
                "Schema {} is already {}, skipping run",
                schema_key,
                schema.status
            );
            return Ok(BuildSchemaResponse::from(&schema));
        }

        tracing::info!("Starting schema build: {}", schema_key);
        self.progress_tracker.create_session(&schema_key);

        match self.build(&schema).await {
            Ok(()) => {
                schema.mark_finished(Utc::now());
                self.progress_tracker.complete_session(&schema_key, None);
                tracing::info!("Schema build {} finished", schema_key);
            }
            Err(e) => {
                tracing::error!("Schema build {} failed ({}): {}", schema_key, e.kind(), e);
                schema.mark_error(e.schema_error_text(), Utc::now());
                self.progress_tracker
                    .complete_session(&schema_key, schema.error.clone());
            }
        }

        a001_schema::repository::update_result(&self.db, &schema).await?;
        Ok(BuildSchemaResponse::from(&schema))
    }

    async fn build(&self, schema: &Schema) -> Result<(), SchemaBuildError> {
        let schema_key = schema.to_string_id();
        let connection = SalesforceConnection::from_schema(schema, self.config.api_version);

        self.progress_tracker
            .set_phase(&schema_key, BuildPhase::Ingesting);
        let outcome = ObjectIngestor::new(self.client.as_ref(), &self.db, &self.progress_tracker)
            .ingest(&connection, schema)
            .await?;

        if !schema.include_field_usage {
            return Ok(());
        }

        self.progress_tracker
            .set_phase(&schema_key, BuildPhase::ScanningUsage);
        UsageScanner::new(self.client.as_ref(), &self.db, &self.progress_tracker)
            .scan(&connection, schema, &outcome)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{a002_object, a003_field, a004_field_usage, a005_debug};
    use crate::shared::data::db::memory_connection;
    use crate::usecases::u501_build_schema::error::NO_OBJECTS_MESSAGE;
    use crate::usecases::u501_build_schema::test_support::{
        catalog, describe_url, test_connection, test_salesforce_config, FakeMetadataClient,
        INSTANCE_URL,
    };
    use contracts::domain::a001_schema::aggregate::{SchemaDto, SchemaStatus};

    const ACCOUNT_DESCRIBE: &str =
        r#"{"name": "Account", "fields": [{"name": "Name", "label": "Account Name", "type": "string", "length": 255}]}"#;
    const FOO_DESCRIBE: &str =
        r#"{"name": "Foo__c", "fields": [{"name": "Active__c", "label": "Active", "type": "boolean", "inlineHelpText": "Is it on?"}]}"#;

    fn happy_client() -> FakeMetadataClient {
        let connection = test_connection();
        FakeMetadataClient::new()
            .with_json(
                &connection.describe_global_url(),
                &catalog(&[
                    ("Account", "Account"),
                    ("ApexClass", "Apex Class"),
                    ("Foo__c", "Foo"),
                ]),
            )
            .with_json(&describe_url("Account"), ACCOUNT_DESCRIBE)
            .with_json(&describe_url("Foo__c"), FOO_DESCRIBE)
    }

    async fn pending_schema(db: &DatabaseConnection, include_field_usage: bool) -> Schema {
        let id = a001_schema::service::create(
            db,
            SchemaDto {
                instance_url: INSTANCE_URL.into(),
                org_id: "00D000000000001".into(),
                access_token: "token".into(),
                include_field_usage,
            },
        )
        .await
        .unwrap();
        a001_schema::service::get_by_id(db, SchemaId(id))
            .await
            .unwrap()
            .unwrap()
    }

    fn runner(client: FakeMetadataClient, db: &DatabaseConnection) -> SchemaRunner {
        SchemaRunner::new(
            Arc::new(client),
            db.clone(),
            &test_salesforce_config(),
            Arc::new(ProgressTracker::new()),
        )
    }

    #[tokio::test]
    async fn test_run_ingests_supported_objects_and_finishes() {
        let db = memory_connection().await.unwrap();
        let schema = pending_schema(&db, false).await;
        let runner = runner(happy_client(), &db);

        let response = runner.run(schema.clone()).await.unwrap();
        assert_eq!(response.status, SchemaStatus::Finished);
        assert!(response.error.is_none());
        assert!(response.finished_date.is_some());

        let objects = a002_object::repository::list_by_schema(&db, schema.id).await.unwrap();
        let names: Vec<_> = objects.iter().map(|o| o.api_name.as_str()).collect();
        assert_eq!(names, vec!["Account", "Foo__c"]);

        let ids: Vec<_> = objects.iter().map(|o| o.id).collect();
        let fields = a003_field::repository::list_by_object_ids(&db, &ids).await.unwrap();
        assert_eq!(fields.len(), 2);
        let name = fields.iter().find(|f| f.api_name == "Name").unwrap();
        assert_eq!(name.data_type, "Text (255)");
        let active = fields.iter().find(|f| f.api_name == "Active__c").unwrap();
        assert_eq!(active.data_type, "Checkbox");
        assert_eq!(active.help_text.as_deref(), Some("Is it on?"));

        let stored = a001_schema::service::get_by_id(&db, schema.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SchemaStatus::Finished);
        assert!(stored.finished_date.is_some());

        let progress = runner.get_progress(&schema.to_string_id()).unwrap();
        assert_eq!(progress.phase, BuildPhase::Finished);
        assert_eq!(progress.objects_processed, 2);
        assert_eq!(progress.fields_processed, 2);
    }

    #[tokio::test]
    async fn test_run_with_empty_catalog_records_debug_and_fails() {
        let db = memory_connection().await.unwrap();
        let schema = pending_schema(&db, true).await;
        let client = FakeMetadataClient::new()
            .with_json(&test_connection().describe_global_url(), "{}");

        let response = runner(client, &db).run(schema.clone()).await.unwrap();
        assert_eq!(response.status, SchemaStatus::Error);
        assert_eq!(response.error.as_deref(), Some(NO_OBJECTS_MESSAGE));
        assert!(response.finished_date.is_some());

        assert!(a002_object::repository::list_by_schema(&db, schema.id)
            .await
            .unwrap()
            .is_empty());
        let debug = a005_debug::repository::list_by_schema(&db, schema.id).await.unwrap();
        assert_eq!(debug.len(), 1);
        assert_eq!(debug[0].debug, "{}");
    }

    #[tokio::test]
    async fn test_run_with_usage_scan_records_layout_usage() {
        let db = memory_connection().await.unwrap();
        let schema = pending_schema(&db, true).await;
        let connection = test_connection();
        let layout = serde_json::json!({
            "FullName": "Account-Account Layout",
            "Metadata": {"layoutSections": [{"layoutColumns": [{"layoutItems": [{"field": "Name"}]}]}]}
        });
        let client = happy_client()
            .with_json(
                &connection.tooling_query_url("SELECT+Id+FROM+Layout"),
                r#"{"records": [{"attributes": {"url": "/services/data/v59.0/tooling/sobjects/Layout/00h1"}, "Id": "00h1"}]}"#,
            )
            .with_json(
                &connection.tooling_record_url("Layout", "00h1"),
                &layout.to_string(),
            );

        let response = runner(client, &db).run(schema.clone()).await.unwrap();
        assert_eq!(response.status, SchemaStatus::Finished);

        let document = a001_schema::service::load_document(&db, schema.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(document.usage_count(), 1);
        let account = &document.objects[0];
        assert_eq!(account.object.api_name, "Account");
        assert_eq!(account.fields[0].usages[0].name, "Account-Account Layout");
    }

    #[tokio::test]
    async fn test_usage_scan_failure_keeps_ingested_rows() {
        let db = memory_connection().await.unwrap();
        let schema = pending_schema(&db, true).await;
        // Layout query is not routed, so the scan fails on its first request
        let runner = runner(happy_client(), &db);

        let response = runner.run(schema.clone()).await.unwrap();
        assert_eq!(response.status, SchemaStatus::Error);
        let error = response.error.unwrap();
        assert!(error.contains("Layout"));

        let objects = a002_object::repository::list_by_schema(&db, schema.id).await.unwrap();
        assert_eq!(objects.len(), 2);
        let ids: Vec<_> = objects.iter().map(|o| o.id).collect();
        let fields = a003_field::repository::list_by_object_ids(&db, &ids).await.unwrap();
        let field_ids: Vec<_> = fields.iter().map(|f| f.id).collect();
        assert_eq!(fields.len(), 2);
        assert!(a004_field_usage::repository::list_by_field_ids(&db, &field_ids)
            .await
            .unwrap()
            .is_empty());

        let progress = runner.get_progress(&schema.to_string_id()).unwrap();
        assert_eq!(progress.phase, BuildPhase::Failed);
    }

    #[tokio::test]
    async fn test_run_by_id_skips_terminal_schema() {
        let db = memory_connection().await.unwrap();
        let schema = pending_schema(&db, false).await;
        let runner = runner(happy_client(), &db);

        let first = runner.run_by_id(&schema.to_string_id()).await.unwrap();
        assert_eq!(first.status, SchemaStatus::Finished);

        let second = runner.run_by_id(&schema.to_string_id()).await.unwrap();
        assert_eq!(second.status, SchemaStatus::Finished);
        assert!(second.finished_date.is_some());
        assert_eq!(
            a002_object::repository::list_by_schema(&db, schema.id)
                .await
                .unwrap()
                .len(),
            2
        );

        assert!(runner.run_by_id("not-a-uuid").await.is_err());
        assert!(runner.run_by_id(&Uuid::new_v4().to_string()).await.is_err());
    }

    #[tokio::test]
    async fn test_document_keeps_remote_order() {
        let db = memory_connection().await.unwrap();
        let schema = pending_schema(&db, false).await;
        let client = FakeMetadataClient::new()
            .with_json(
                &test_connection().describe_global_url(),
                &catalog(&[("Zeta__c", "Zeta"), ("Account", "Account")]),
            )
            .with_json(
                &describe_url("Zeta__c"),
                r#"{"fields": [
                    {"name": "Id", "label": "Record ID", "type": "id", "length": 18},
                    {"name": "Active__c", "label": "Active", "type": "boolean"}
                ]}"#,
            )
            .with_json(&describe_url("Account"), ACCOUNT_DESCRIBE);

        let response = runner(client, &db).run(schema.clone()).await.unwrap();
        assert_eq!(response.status, SchemaStatus::Finished);

        let document = a001_schema::service::load_document(&db, schema.id)
            .await
            .unwrap()
            .unwrap();
        let objects: Vec<_> = document
            .objects
            .iter()
            .map(|o| o.object.api_name.as_str())
            .collect();
        assert_eq!(objects, vec!["Zeta__c", "Account"]);
        let zeta_fields: Vec<_> = document.objects[0]
            .fields
            .iter()
            .map(|f| f.field.api_name.as_str())
            .collect();
        assert_eq!(zeta_fields, vec!["Id", "Active__c"]);
    }

    #[tokio::test]
    async fn test_configured_api_version_is_used_for_requests() {
        let db = memory_connection().await.unwrap();
        let schema = pending_schema(&db, false).await;
        let config = SalesforceConfig {
            api_version: 60,
            request_timeout_secs: 30,
        };
        let catalog_url = SalesforceConnection::from_schema(&schema, 60).describe_global_url();
        assert!(catalog_url.contains("/services/data/v60.0/"));
        let client = Arc::new(
            FakeMetadataClient::new()
                .with_json(&catalog_url, &catalog(&[("Account", "Account")]))
                .with_json(&describe_url("Account"), ACCOUNT_DESCRIBE),
        );
        let runner = SchemaRunner::new(
            client.clone(),
            db.clone(),
            &config,
            Arc::new(ProgressTracker::new()),
        );

        let response = runner.run(schema).await.unwrap();
        assert_eq!(response.status, SchemaStatus::Finished);
        assert_eq!(client.requested_urls()[0], catalog_url);
    }
}
