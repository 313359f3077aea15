use serde::{Deserialize, Serialize};

use crate::domain::a001_schema::aggregate::SchemaId;

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор объекта схемы
    SchemaObjectId
);

/// Тип сущности удалённой CRM (стандартный или пользовательский объект)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaObject {
    pub id: SchemaObjectId,
    #[serde(rename = "schemaId")]
    pub schema_id: SchemaId,
    #[serde(rename = "apiName")]
    pub api_name: String,
    pub label: String,
    /// Порядковый номер в каталоге удалённого API
    pub position: i32,
}

impl SchemaObject {
    pub fn new_for_insert(
        schema_id: SchemaId,
        api_name: String,
        label: String,
        position: i32,
    ) -> Self {
        Self {
            id: SchemaObjectId::new_v4(),
            schema_id,
            api_name,
            label,
            position,
        }
    }
}
