use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a001_schema::aggregate::{Schema, SchemaStatus};
use crate::domain::common::AggregateId;

/// Итог построения схемы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSchemaResponse {
    #[serde(rename = "schemaId")]
    pub schema_id: String,
    pub status: SchemaStatus,
    pub error: Option<String>,
    #[serde(rename = "finishedDate")]
    pub finished_date: Option<DateTime<Utc>>,
}

impl From<&Schema> for BuildSchemaResponse {
    fn from(schema: &Schema) -> Self {
        Self {
            schema_id: schema.id.as_string(),
            status: schema.status,
            error: schema.error.clone(),
            finished_date: schema.finished_date,
        }
    }
}
