//! Поиск мест использования полей в макетах страниц.
//!
//! Совпадение ищется по подстроке в сериализованной структуре макета, а не по
//! структуре: поле `Name` находится и в макете, где есть только `AccountName__c`.
//! Это известное ограничение, поведение сохранено намеренно.

use anyhow::Context;
use contracts::domain::a001_schema::aggregate::Schema;
use contracts::domain::a002_object::aggregate::SchemaObjectId;
use contracts::domain::a004_field_usage::aggregate::{FieldUsage, FieldUsageType};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::collections::HashMap;

use super::error::SchemaBuildError;
use super::metadata_lookup::{self, LAYOUT_METADATA_TYPE};
use super::object_ingestor::IngestOutcome;
use super::progress_tracker::ProgressTracker;
use super::salesforce_api_client::{MetadataClient, SalesforceConnection};
use crate::domain::a004_field_usage;

/// Метаданные одного макета, подготовленные для поиска
#[derive(Debug, Clone)]
pub struct LayoutMetadata {
    /// Например "Account-Account Layout"
    pub full_name: String,
    /// Объект-владелец: часть имени до первого '-'
    pub object_name: String,
    /// layoutSections в виде JSON-строки
    pub sections_text: String,
}

impl LayoutMetadata {
    pub fn from_json(value: &Value) -> anyhow::Result<Self> {
        let full_name = value
            .get("FullName")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("Layout metadata has no FullName"))?
            .to_string();
        let sections = value
            .get("Metadata")
            .and_then(|m| m.get("layoutSections"))
            .ok_or_else(|| anyhow::anyhow!("Layout {} has no Metadata.layoutSections", full_name))?;

        Ok(Self {
            object_name: layout_object_name(&full_name).to_string(),
            sections_text: serde_json::to_string(sections)?,
            full_name,
        })
    }

    pub fn references(&self, field_api_name: &str) -> bool {
        self.sections_text.contains(field_api_name)
    }
}

pub fn layout_object_name(full_name: &str) -> &str {
    full_name
        .split_once('-')
        .map(|(object, _)| object)
        .unwrap_or(full_name)
}

/// Второй проход: сопоставление загруженных полей с макетами страниц
pub struct UsageScanner<'a> {
    client: &'a dyn MetadataClient,
    db: &'a DatabaseConnection,
    progress: &'a ProgressTracker,
}

impl<'a> UsageScanner<'a> {
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

    pub async fn scan(
        &self,
        connection: &SalesforceConnection,
        schema: &Schema,
        outcome: &IngestOutcome,
    ) -> Result<Vec<FieldUsage>, SchemaBuildError> {
        self.scan_layouts(connection, schema, outcome)
            .await
            .map_err(SchemaBuildError::usage_scan)
    }

    async fn scan_layouts(
        &self,
        connection: &SalesforceConnection,
        schema: &Schema,
        outcome: &IngestOutcome,
    ) -> anyhow::Result<Vec<FieldUsage>> {
        let schema_key = schema.to_string_id();
        let layout_urls =
            metadata_lookup::urls_for_metadata_type(self.client, connection, LAYOUT_METADATA_TYPE)
                .await?;

        let object_names: HashMap<SchemaObjectId, &str> = outcome
            .objects
            .iter()
            .map(|o| (o.id, o.api_name.as_str()))
            .collect();

        let mut usages = Vec::new();
        for layout_url in layout_urls {
            let value: Value = self
                .client
                .get(connection, &layout_url)
                .await
                .and_then(|response| response.json())
                .with_context(|| format!("Failed to fetch layout {}", layout_url))?;
            let layout = LayoutMetadata::from_json(&value)
                .with_context(|| format!("Invalid layout metadata at {}", layout_url))?;
            self.progress
                .set_current_item(&schema_key, Some(layout.full_name.clone()));

            for field in &outcome.fields {
                let Some(object_name) = object_names.get(&field.object_id) else {
                    continue;
                };
                if *object_name != layout.object_name || !layout.references(&field.api_name) {
                    continue;
                }

                let usage = FieldUsage::new_for_insert(
                    field.id,
                    FieldUsageType::PageLayout,
                    layout.full_name.clone(),
                );
                a004_field_usage::repository::insert(self.db, &usage)
                    .await
                    .with_context(|| {
                        format!("Failed to save usage of {} in {}", field.api_name, layout.full_name)
                    })?;
                tracing::debug!("{}.{} used in {}", object_name, field.api_name, layout.full_name);
                self.progress.usage_found(&schema_key);
                usages.push(usage);
            }

            self.progress.layout_scanned(&schema_key);
        }

        tracing::info!(
            "Usage scan for schema {} completed: usages={}",
            schema_key,
            usages.len()
        );
        Ok(usages)
    }
}
