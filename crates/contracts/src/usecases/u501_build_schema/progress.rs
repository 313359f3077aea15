use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Фаза построения схемы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase {
    Pending,
    Ingesting,
    ScanningUsage,
    Finished,
    Failed,
}

/// Прогресс одного запуска (in-memory, для мониторинга)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildProgress {
    pub schema_id: String,
    pub phase: BuildPhase,
    pub objects_processed: i32,
    pub fields_processed: i32,
    pub layouts_scanned: i32,
    pub usages_found: i32,
    pub current_item: Option<String>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BuildProgress {
    pub fn new(schema_id: String) -> Self {
        let now = Utc::now();
        Self {
            schema_id,
            phase: BuildPhase::Pending,
            objects_processed: 0,
            fields_processed: 0,
            layouts_scanned: 0,
            usages_found: 0,
            current_item: None,
            error: None,
            started_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, BuildPhase::Finished | BuildPhase::Failed)
    }
}
