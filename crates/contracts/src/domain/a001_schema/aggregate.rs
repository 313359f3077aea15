use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::common::AggregateId;

// ============================================================================
// ID Type
// ============================================================================

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор запуска интроспекции схемы
    SchemaId
);

// ============================================================================
// Status
// ============================================================================

/// Статус запуска. Pending -> {Finished, Error}, оба конечные.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaStatus {
    Pending,
    Finished,
    Error,
}

impl SchemaStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SchemaStatus::Pending)
    }
}

impl fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchemaStatus::Pending => "Pending",
            SchemaStatus::Finished => "Finished",
            SchemaStatus::Error => "Error",
        };
        f.write_str(s)
    }
}

impl FromStr for SchemaStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(SchemaStatus::Pending),
            "Finished" => Ok(SchemaStatus::Finished),
            "Error" => Ok(SchemaStatus::Error),
            other => anyhow::bail!("Unknown schema status: {}", other),
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Один запуск интроспекции метаданных удалённой CRM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub id: SchemaId,

    // Параметры подключения (для ядра непрозрачны)
    #[serde(rename = "instanceUrl")]
    pub instance_url: String,
    #[serde(rename = "orgId")]
    pub org_id: String,
    #[serde(rename = "accessToken", skip_serializing)]
    pub access_token: String,

    #[serde(rename = "includeFieldUsage", default)]
    pub include_field_usage: bool,

    pub status: SchemaStatus,
    pub error: Option<String>,

    #[serde(rename = "createdDate")]
    pub created_date: DateTime<Utc>,
    #[serde(rename = "finishedDate")]
    pub finished_date: Option<DateTime<Utc>>,
}

impl Schema {
    /// Создать новый запуск для вставки в БД
    pub fn new_for_insert(
        instance_url: String,
        org_id: String,
        access_token: String,
        include_field_usage: bool,
    ) -> Self {
        Self {
            id: SchemaId::new_v4(),
            instance_url,
            org_id,
            access_token,
            include_field_usage,
            status: SchemaStatus::Pending,
            error: None,
            created_date: Utc::now(),
            finished_date: None,
        }
    }

    /// Получить ID как строку
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.instance_url.trim().is_empty() {
            return Err("Instance URL must not be empty".into());
        }
        if !self.instance_url.starts_with("http://") && !self.instance_url.starts_with("https://")
        {
            return Err("Instance URL must start with http:// or https://".into());
        }
        if self.access_token.trim().is_empty() {
            return Err("Access token must not be empty".into());
        }
        Ok(())
    }

    /// Успешное завершение запуска
    pub fn mark_finished(&mut self, at: DateTime<Utc>) {
        self.status = SchemaStatus::Finished;
        self.error = None;
        self.finished_date = Some(at);
    }

    /// Завершение с ошибкой; текст ошибки никогда не бывает пустым
    pub fn mark_error(&mut self, message: impl Into<String>, at: DateTime<Utc>) {
        let message = message.into();
        self.status = SchemaStatus::Error;
        self.error = Some(if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        });
        self.finished_date = Some(at);
    }
}

/// Входные данные для создания запуска
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDto {
    #[serde(rename = "instanceUrl")]
    pub instance_url: String,
    #[serde(rename = "orgId")]
    pub org_id: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "includeFieldUsage", default)]
    pub include_field_usage: bool,
}
