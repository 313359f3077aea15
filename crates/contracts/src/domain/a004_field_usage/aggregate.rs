use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::a003_field::aggregate::FieldId;

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор использования поля
    FieldUsageId
);

/// Вид UI-артефакта, в котором найдено поле
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldUsageType {
    #[serde(rename = "Page Layout")]
    PageLayout,
}

impl fmt::Display for FieldUsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldUsageType::PageLayout => f.write_str("Page Layout"),
        }
    }
}

impl FromStr for FieldUsageType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Page Layout" => Ok(FieldUsageType::PageLayout),
            other => anyhow::bail!("Unknown field usage type: {}", other),
        }
    }
}

/// Факт присутствия поля в именованном UI-артефакте
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldUsage {
    pub id: FieldUsageId,
    #[serde(rename = "fieldId")]
    pub field_id: FieldId,
    #[serde(rename = "type")]
    pub usage_type: FieldUsageType,
    /// Полное имя артефакта, например "Account-Account Layout"
    pub name: String,
}

impl FieldUsage {
    pub fn new_for_insert(field_id: FieldId, usage_type: FieldUsageType, name: String) -> Self {
        Self {
            id: FieldUsageId::new_v4(),
            field_id,
            usage_type,
            name,
        }
    }
}
