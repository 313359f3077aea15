use super::repository;
use crate::domain::{a002_object, a003_field, a004_field_usage};
use contracts::domain::a001_schema::aggregate::{Schema, SchemaDto, SchemaId};
use contracts::domain::a001_schema::document::{FieldEntry, ObjectSection, SchemaDocument};
use contracts::domain::a003_field::aggregate::Field;
use contracts::domain::a004_field_usage::aggregate::FieldUsage;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use uuid::Uuid;

/// Создание нового запуска в статусе Pending
pub async fn create(db: &DatabaseConnection, dto: SchemaDto) -> anyhow::Result<Uuid> {
    let aggregate = Schema::new_for_insert(
        dto.instance_url.trim_end_matches('/').to_string(),
        dto.org_id,
        dto.access_token,
        dto.include_field_usage,
    );

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    repository::insert(db, &aggregate).await
}

pub async fn get_by_id(db: &DatabaseConnection, id: SchemaId) -> anyhow::Result<Option<Schema>> {
    repository::get_by_id(db, id).await
}

pub async fn list_pending(db: &DatabaseConnection) -> anyhow::Result<Vec<Schema>> {
    repository::list_pending(db).await
}

/// Собрать документ схемы для слоя отображения
pub async fn load_document(
    db: &DatabaseConnection,
    id: SchemaId,
) -> anyhow::Result<Option<SchemaDocument>> {
    let Some(schema) = repository::get_by_id(db, id).await? else {
        return Ok(None);
    };

    let objects = a002_object::repository::list_by_schema(db, id).await?;
    let object_ids: Vec<_> = objects.iter().map(|o| o.id).collect();
    let fields = a003_field::repository::list_by_object_ids(db, &object_ids).await?;
    let field_ids: Vec<_> = fields.iter().map(|f| f.id).collect();
    let usages = a004_field_usage::repository::list_by_field_ids(db, &field_ids).await?;

    let mut usages_by_field: HashMap<_, Vec<FieldUsage>> = HashMap::new();
    for usage in usages {
        usages_by_field.entry(usage.field_id).or_default().push(usage);
    }

    let mut fields_by_object: HashMap<_, Vec<Field>> = HashMap::new();
    for field in fields {
        fields_by_object.entry(field.object_id).or_default().push(field);
    }

    let sections = objects
        .into_iter()
        .map(|object| {
            let fields = fields_by_object
                .remove(&object.id)
                .unwrap_or_default()
                .into_iter()
                .map(|field| FieldEntry {
                    usages: usages_by_field.remove(&field.id).unwrap_or_default(),
                    field,
                })
                .collect();
            ObjectSection { object, fields }
        })
        .collect();

    Ok(Some(SchemaDocument {
        schema,
        objects: sections,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;
    use contracts::domain::a001_schema::aggregate::SchemaStatus;

    fn dto() -> SchemaDto {
        SchemaDto {
            instance_url: "https://example.my.salesforce.com/".into(),
            org_id: "00D000000000001".into(),
            access_token: "token".into(),
            include_field_usage: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_load_pending_schema() {
        let db = memory_connection().await.unwrap();
        let id = SchemaId(create(&db, dto()).await.unwrap());

        let schema = get_by_id(&db, id).await.unwrap().unwrap();
        assert_eq!(schema.status, SchemaStatus::Pending);
        assert_eq!(schema.instance_url, "https://example.my.salesforce.com");
        assert!(schema.include_field_usage);

        let pending = list_pending(&db).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, id);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_dto() {
        let db = memory_connection().await.unwrap();
        let mut bad = dto();
        bad.access_token = String::new();
        assert!(create(&db, bad).await.is_err());
        assert!(list_pending(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_document_for_unknown_schema() {
        let db = memory_connection().await.unwrap();
        let missing = load_document(&db, SchemaId::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }
}
