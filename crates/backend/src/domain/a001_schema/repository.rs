use chrono::Utc;
use contracts::domain::a001_schema::aggregate::{Schema, SchemaId, SchemaStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_schema")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub instance_url: String,
    pub org_id: String,
    pub access_token: String,
    pub include_field_usage: bool,
    pub status: String,
    pub error: Option<String>,
    pub created_date: chrono::DateTime<chrono::Utc>,
    pub finished_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Schema {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(&m.id)
            .map_err(|e| anyhow::anyhow!("Invalid schema id {}: {}", m.id, e))?;
        Ok(Schema {
            id: SchemaId(uuid),
            instance_url: m.instance_url,
            org_id: m.org_id,
            access_token: m.access_token,
            include_field_usage: m.include_field_usage,
            status: m.status.parse::<SchemaStatus>()?,
            error: m.error,
            created_date: m.created_date,
            finished_date: m.finished_date,
        })
    }
}

pub async fn get_by_id(db: &DatabaseConnection, id: SchemaId) -> anyhow::Result<Option<Schema>> {
    Entity::find_by_id(id.value().to_string())
        .one(db)
        .await?
        .map(Schema::try_from)
        .transpose()
}

/// Запуски, ожидающие обработки (старые первыми)
pub async fn list_pending(db: &DatabaseConnection) -> anyhow::Result<Vec<Schema>> {
    Entity::find()
        .filter(Column::Status.eq(SchemaStatus::Pending.to_string()))
        .order_by_asc(Column::CreatedDate)
        .all(db)
        .await?
        .into_iter()
        .map(Schema::try_from)
        .collect()
}

pub async fn insert(db: &DatabaseConnection, aggregate: &Schema) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        instance_url: Set(aggregate.instance_url.clone()),
        org_id: Set(aggregate.org_id.clone()),
        access_token: Set(aggregate.access_token.clone()),
        include_field_usage: Set(aggregate.include_field_usage),
        status: Set(aggregate.status.to_string()),
        error: Set(aggregate.error.clone()),
        created_date: Set(aggregate.created_date),
        finished_date: Set(aggregate.finished_date),
    };
    active.insert(db).await?;
    Ok(uuid)
}

/// Единственное обновление запуска: конечный статус, ошибка и дата завершения
pub async fn update_result(db: &DatabaseConnection, aggregate: &Schema) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(aggregate.id.value().to_string()),
        status: Set(aggregate.status.to_string()),
        error: Set(aggregate.error.clone()),
        finished_date: Set(Some(aggregate.finished_date.unwrap_or_else(Utc::now))),
        instance_url: sea_orm::ActiveValue::NotSet,
        org_id: sea_orm::ActiveValue::NotSet,
        access_token: sea_orm::ActiveValue::NotSet,
        include_field_usage: sea_orm::ActiveValue::NotSet,
        created_date: sea_orm::ActiveValue::NotSet,
    };
    active.update(db).await?;
    Ok(())
}
