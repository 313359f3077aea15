use anyhow::Result;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Логгер для записи хода построения схемы в отдельный файл.
/// Каждый лог-файл привязан к одному запуску (schema id).
pub struct TaskLogger {
    log_dir: PathBuf,
}

impl TaskLogger {
    pub fn new(base_log_dir: impl AsRef<Path>) -> Self {
        Self {
            log_dir: base_log_dir.as_ref().join("task_logs"),
        }
    }

    /// Путь к лог-файлу запуска
    pub fn log_file_path(&self, schema_id: &str) -> PathBuf {
        self.log_dir.join(format!("{}.log", schema_id))
    }

    /// Дописать строку с отметкой времени; файл и каталог создаются при необходимости
    pub fn write_log(&self, schema_id: &str, message: &str) -> Result<()> {
        fs::create_dir_all(&self.log_dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_file_path(schema_id))?;

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
        writeln!(file, "[{}] {}", timestamp, message)?;
        Ok(())
    }

    /// Прочитать лог запуска; отсутствующий файл даёт пустую строку
    pub fn read_log(&self, schema_id: &str) -> Result<String> {
        let path = self.log_file_path(schema_id);
        if path.exists() {
            Ok(fs::read_to_string(path)?)
        } else {
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let logger = TaskLogger::new(dir.path());

        assert_eq!(logger.read_log("abc").unwrap(), "");
        logger.write_log("abc", "started").unwrap();
        logger.write_log("abc", "finished").unwrap();

        let content = logger.read_log("abc").unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('[') && lines[0].ends_with("] started"));
        assert!(lines[1].ends_with("] finished"));
        assert_eq!(
            logger.log_file_path("abc"),
            dir.path().join("task_logs").join("abc.log")
        );
    }
}
