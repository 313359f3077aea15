use serde::{Deserialize, Serialize};

use crate::domain::a002_object::aggregate::SchemaObjectId;

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор поля
    FieldId
);

/// Поле объекта с вычисленным отображаемым типом данных
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    #[serde(rename = "objectId")]
    pub object_id: SchemaObjectId,
    #[serde(rename = "apiName")]
    pub api_name: String,
    pub label: String,
    #[serde(rename = "helpText")]
    pub help_text: Option<String>,
    /// Например "Text (80)", "Lookup (Account, Contact)"
    #[serde(rename = "dataType")]
    pub data_type: String,
    /// Порядковый номер в ответе describe объекта
    pub position: i32,
}

impl Field {
    pub fn new_for_insert(
        object_id: SchemaObjectId,
        api_name: String,
        label: String,
        help_text: Option<String>,
        data_type: String,
        position: i32,
    ) -> Self {
        Self {
            id: FieldId::new_v4(),
            object_id,
            api_name,
            label,
            help_text,
            data_type,
            position,
        }
    }
}
