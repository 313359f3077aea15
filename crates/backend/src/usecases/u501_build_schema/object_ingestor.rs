use anyhow::Context;
use contracts::domain::a001_schema::aggregate::Schema;
use contracts::domain::a002_object::aggregate::{SchemaObject, SchemaObjectId};
use contracts::domain::a003_field::aggregate::Field;
use contracts::domain::a005_debug::aggregate::DebugRecord;
use once_cell::sync::Lazy;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::collections::HashSet;

use super::error::SchemaBuildError;
use super::models::{SObjectDescribe, SObjectSummary, SOBJECTS_KEY};
use super::progress_tracker::ProgressTracker;
use super::salesforce_api_client::{MetadataClient, SalesforceConnection};
use super::type_resolver;
use crate::domain::{a002_object, a003_field, a005_debug};

/// Суффикс API-имени пользовательских объектов
pub const CUSTOM_OBJECT_SUFFIX: &str = "__c";

/// Стандартные объекты, которые попадают в схему без суффикса
static STANDARD_OBJECTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Account",
        "Activity",
        "Asset",
        "Campaign",
        "CampaignMember",
        "Case",
        "Contact",
        "ContentVersion",
        "Contract",
        "Event",
        "ForecastingAdjustment",
        "ForecastingQuota",
        "KnowledgeArticle",
        "Lead",
        "Opportunity",
        "OpportunityCompetitor",
        "OpportunityLineItem",
        "Order",
        "OrderItem",
        "Pricebook2",
        "PricebookEntry",
        "Product2",
        "Quote",
        "QuoteLineItem",
        "Solution",
        "Task",
        "User",
        "WorkOrder",
        "WorkOrderLineItem",
    ]
    .into_iter()
    .collect()
});

pub fn is_supported_object(api_name: &str) -> bool {
    STANDARD_OBJECTS.contains(api_name) || api_name.ends_with(CUSTOM_OBJECT_SUFFIX)
}

/// Результат загрузки: созданные объекты и поля в порядке ответа API
#[derive(Debug, Default, Clone)]
pub struct IngestOutcome {
    pub objects: Vec<SchemaObject>,
    pub fields: Vec<Field>,
}

impl IngestOutcome {
    pub fn object_api_name(&self, object_id: SchemaObjectId) -> Option<&str> {
        self.objects
            .iter()
            .find(|o| o.id == object_id)
            .map(|o| o.api_name.as_str())
    }
}

/// Загружает каталог объектов и поля каждого подходящего объекта
pub struct ObjectIngestor<'a> {
    client: &'a dyn MetadataClient,
    db: &'a DatabaseConnection,
    progress: &'a ProgressTracker,
}

impl<'a> ObjectIngestor<'a> {
    pub fn new(
        client: &'a dyn MetadataClient,
        db: &'a DatabaseConnection,
        progress: &'a ProgressTracker,
    ) -> Self {
        Self {
            client,
            db,
            progress,
        }
    }

    pub async fn ingest(
        &self,
        connection: &SalesforceConnection,
        schema: &Schema,
    ) -> Result<IngestOutcome, SchemaBuildError> {
        let catalog_url = connection.describe_global_url();
        let response = self
            .client
            .get(connection, &catalog_url)
            .await
            .context("Failed to fetch object catalog")
            .map_err(SchemaBuildError::ingestion)?;

        let Some(collection) = extract_sobjects(&response.body) else {
            tracing::error!(
                "Catalog response for schema {} has no '{}' collection (status {})",
                schema.to_string_id(),
                SOBJECTS_KEY,
                response.status
            );
            self.save_debug(schema, &response.body).await;
            return Err(SchemaBuildError::MalformedCatalogResponse {
                raw_body: response.body,
            });
        };
        let sobjects = collection.map_err(SchemaBuildError::ingestion)?;

        self.ingest_objects(connection, schema, sobjects)
            .await
            .map_err(SchemaBuildError::ingestion)
    }

    async fn ingest_objects(
        &self,
        connection: &SalesforceConnection,
        schema: &Schema,
        sobjects: Vec<Value>,
    ) -> anyhow::Result<IngestOutcome> {
        let schema_key = schema.to_string_id();
        let mut outcome = IngestOutcome::default();

        for raw in sobjects {
            let name = raw
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow::anyhow!("Catalog entry without a name: {}", raw))?
                .to_string();

            if !is_supported_object(&name) {
                continue;
            }

            let summary: SObjectSummary = serde_json::from_value(raw)
                .with_context(|| format!("Invalid catalog entry for object {}", name))?;
            self.progress
                .set_current_item(&schema_key, Some(summary.name.clone()));

            let object = SchemaObject::new_for_insert(
                schema.id,
                summary.name.clone(),
                summary.label.clone(),
                outcome.objects.len() as i32,
            );
            a002_object::repository::insert(self.db, &object)
                .await
                .with_context(|| format!("Failed to save object {}", object.api_name))?;
            tracing::info!("Object {} ({}) saved", object.api_name, object.label);

            let fields = self.ingest_fields(connection, &schema_key, &summary, &object).await?;
            outcome.fields.extend(fields);
            outcome.objects.push(object);
            self.progress.object_processed(&schema_key);
        }

        tracing::info!(
            "Ingestion for schema {} completed: objects={}, fields={}",
            schema_key,
            outcome.objects.len(),
            outcome.fields.len()
        );
        Ok(outcome)
    }

    async fn ingest_fields(
        &self,
        connection: &SalesforceConnection,
        schema_key: &str,
        summary: &SObjectSummary,
        object: &SchemaObject,
    ) -> anyhow::Result<Vec<Field>> {
        let describe_url = connection.absolute_url(&summary.urls.describe);
        let describe: SObjectDescribe = self
            .client
            .get(connection, &describe_url)
            .await
            .and_then(|response| response.json())
            .with_context(|| format!("Failed to describe object {}", summary.name))?;

        let mut fields = Vec::with_capacity(describe.fields.len());
        for (position, raw_field) in describe.fields.iter().enumerate() {
            let field = Field::new_for_insert(
                object.id,
                raw_field.name.clone(),
                raw_field.label.clone(),
                raw_field.inline_help_text.clone(),
                type_resolver::resolve(raw_field),
                position as i32,
            );
            a003_field::repository::insert(self.db, &field)
                .await
                .with_context(|| {
                    format!("Failed to save field {}.{}", object.api_name, field.api_name)
                })?;
            tracing::debug!(
                "Field {}.{}: {}",
                object.api_name,
                field.api_name,
                field.data_type
            );
            self.progress.field_processed(schema_key);
            fields.push(field);
        }
        Ok(fields)
    }

    /// Сохранить сырой ответ каталога для разбора
    async fn save_debug(&self, schema: &Schema, body: &str) {
        let record = DebugRecord::new_for_insert(Some(schema.id), body.to_string());
        if let Err(e) = a005_debug::repository::insert(self.db, &record).await {
            tracing::error!(
                "Failed to save debug record for schema {}: {:?}",
                schema.to_string_id(),
                e
            );
        }
    }
}

/// Коллекция объектов из тела ответа.
///
/// None: тело не JSON-объект или ключа нет. Ключ есть, но значение не массив: Err.
fn extract_sobjects(body: &str) -> Option<anyhow::Result<Vec<Value>>> {
    let mut value: Value = serde_json::from_str(body).ok()?;
    match value.as_object_mut()?.remove(SOBJECTS_KEY)? {
        Value::Array(items) => Some(Ok(items)),
        other => Some(Err(anyhow::anyhow!(
            "Catalog '{}' is not a list: {}",
            SOBJECTS_KEY,
            other
        ))),
    }
}
