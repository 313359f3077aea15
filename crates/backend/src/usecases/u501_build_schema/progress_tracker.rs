use contracts::usecases::u501_build_schema::progress::{BuildPhase, BuildProgress};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Трекер прогресса построения схем (in-memory, для real-time мониторинга)
#[derive(Clone, Default)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, BuildProgress>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Создать (или перезапустить) сессию для запуска
    pub fn create_session(&self, schema_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(schema_id.to_string(), BuildProgress::new(schema_id.to_string()));
        }
    }

    /// Получить текущий прогресс
    pub fn get_progress(&self, schema_id: &str) -> Option<BuildProgress> {
        self.sessions
            .read()
            .ok()
            .and_then(|sessions| sessions.get(schema_id).cloned())
    }

    pub fn set_phase(&self, schema_id: &str, phase: BuildPhase) {
        self.with_session(schema_id, |p| p.phase = phase);
    }

    pub fn set_current_item(&self, schema_id: &str, label: Option<String>) {
        self.with_session(schema_id, |p| p.current_item = label);
    }

    pub fn object_processed(&self, schema_id: &str) {
        self.with_session(schema_id, |p| p.objects_processed += 1);
    }

    pub fn field_processed(&self, schema_id: &str) {
        self.with_session(schema_id, |p| p.fields_processed += 1);
    }

    pub fn layout_scanned(&self, schema_id: &str) {
        self.with_session(schema_id, |p| p.layouts_scanned += 1);
    }

    pub fn usage_found(&self, schema_id: &str) {
        self.with_session(schema_id, |p| p.usages_found += 1);
    }

    /// Завершить сессию; error задаётся только для провала
    pub fn complete_session(&self, schema_id: &str, error: Option<String>) {
        self.with_session(schema_id, |p| {
            p.phase = if error.is_some() {
                BuildPhase::Failed
            } else {
                BuildPhase::Finished
            };
            p.error = error;
            p.current_item = None;
            p.completed_at = Some(chrono::Utc::now());
        });
    }

    fn with_session(&self, schema_id: &str, update: impl FnOnce(&mut BuildProgress)) {
        let Ok(mut sessions) = self.sessions.write() else {
            tracing::warn!("Progress tracker lock poisoned, skipping update");
            return;
        };
        if let Some(progress) = sessions.get_mut(schema_id) {
            update(progress);
            progress.updated_at = chrono::Utc::now();
        }
    }
}
