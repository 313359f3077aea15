use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a001_schema::aggregate::SchemaId;

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор отладочной записи
    DebugRecordId
);

/// Сырой ответ удалённого API, сохранённый для разбора ошибок
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugRecord {
    pub id: DebugRecordId,
    #[serde(rename = "schemaId")]
    pub schema_id: Option<SchemaId>,
    pub debug: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl DebugRecord {
    pub fn new_for_insert(schema_id: Option<SchemaId>, debug: String) -> Self {
        Self {
            id: DebugRecordId::new_v4(),
            schema_id,
            debug,
            created_at: Utc::now(),
        }
    }
}
