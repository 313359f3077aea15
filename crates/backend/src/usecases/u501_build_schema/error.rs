use thiserror::Error;

/// Сообщение для запуска, у которого каталог не вернул коллекцию объектов
pub const NO_OBJECTS_MESSAGE: &str = "There was no objects returned from the query";

/// Ошибки построения схемы. Наружу из SchemaRunner не выходят,
/// а превращаются в статус и текст ошибки запуска.
#[derive(Debug, Error)]
pub enum SchemaBuildError {
    /// В ответе каталога нет ключа коллекции объектов
    #[error("{}", NO_OBJECTS_MESSAGE)]
    MalformedCatalogResponse { raw_body: String },

    #[error("Ingestion failed: {message}")]
    IngestionFailure { message: String, details: String },

    #[error("Field usage scan failed: {message}")]
    UsageScanFailure { message: String, details: String },
}

impl SchemaBuildError {
    pub fn ingestion(err: anyhow::Error) -> Self {
        SchemaBuildError::IngestionFailure {
            message: err.to_string(),
            details: format!("{:?}", err),
        }
    }

    pub fn usage_scan(err: anyhow::Error) -> Self {
        SchemaBuildError::UsageScanFailure {
            message: err.to_string(),
            details: format!("{:?}", err),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SchemaBuildError::MalformedCatalogResponse { .. } => "malformed_catalog_response",
            SchemaBuildError::IngestionFailure { .. } => "ingestion_failure",
            SchemaBuildError::UsageScanFailure { .. } => "usage_scan_failure",
        }
    }

    /// Сырой ответ удалённого API, если он есть
    pub fn raw_context(&self) -> Option<&str> {
        match self {
            SchemaBuildError::MalformedCatalogResponse { raw_body } => Some(raw_body),
            _ => None,
        }
    }

    /// Текст, который сохраняется в поле error запуска
    pub fn schema_error_text(&self) -> String {
        match self {
            SchemaBuildError::MalformedCatalogResponse { .. } => NO_OBJECTS_MESSAGE.to_string(),
            SchemaBuildError::IngestionFailure { details, .. }
            | SchemaBuildError::UsageScanFailure { details, .. } => details.clone(),
        }
    }
}
