use serde::{Deserialize, Serialize};

/// Запрос на построение схемы для ранее созданного запуска
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSchemaRequest {
    #[serde(rename = "schemaId")]
    pub schema_id: String,
}
