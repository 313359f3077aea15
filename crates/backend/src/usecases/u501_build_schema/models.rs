use serde::{Deserialize, Deserializer, Serialize};

/// Ключ коллекции объектов в ответе describe global
pub const SOBJECTS_KEY: &str = "sobjects";

/// Краткое описание объекта из каталога (`/sobjects/`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SObjectSummary {
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub urls: SObjectUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SObjectUrls {
    /// Относительный путь, например "/services/data/v59.0/sobjects/Account/describe"
    pub describe: String,
}

/// Ответ describe конкретного объекта; нужны только поля
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SObjectDescribe {
    pub fields: Vec<FieldDescribe>,
}

/// Сырые метаданные одного поля
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDescribe {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(rename = "inlineHelpText", default)]
    pub inline_help_text: Option<String>,
    #[serde(rename = "referenceTo", default, deserialize_with = "null_as_default")]
    pub reference_to: Vec<String>,
    #[serde(rename = "picklistValues", default, deserialize_with = "null_as_default")]
    pub picklist_values: Vec<PicklistValue>,
    #[serde(default)]
    pub length: Option<i64>,
    #[serde(default)]
    pub digits: Option<i64>,
    #[serde(default)]
    pub precision: Option<i64>,
    #[serde(default)]
    pub scale: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PicklistValue {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl PicklistValue {
    /// Отображаемое значение: label, иначе value
    pub fn display(&self) -> &str {
        self.label
            .as_deref()
            .or(self.value.as_deref())
            .unwrap_or_default()
    }
}

/// Ответ tooling query (`SELECT Id FROM Layout`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolingQueryResponse {
    #[serde(default)]
    pub records: Vec<ToolingRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolingRecord {
    #[serde(default)]
    pub attributes: Option<RecordAttributes>,
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAttributes {
    #[serde(default)]
    pub url: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
