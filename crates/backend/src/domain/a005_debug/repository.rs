use contracts::domain::a001_schema::aggregate::SchemaId;
use contracts::domain::a005_debug::aggregate::{DebugRecord, DebugRecordId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_debug")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub schema_id: Option<String>,
    pub debug: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for DebugRecord {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let schema_id = m
            .schema_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()?
            .map(SchemaId);
        Ok(DebugRecord {
            id: DebugRecordId(Uuid::parse_str(&m.id)?),
            schema_id,
            debug: m.debug,
            created_at: m.created_at,
        })
    }
}

pub async fn list_by_schema(
    db: &DatabaseConnection,
    schema_id: SchemaId,
) -> anyhow::Result<Vec<DebugRecord>> {
    Entity::find()
        .filter(Column::SchemaId.eq(schema_id.value().to_string()))
        .all(db)
        .await?
        .into_iter()
        .map(DebugRecord::try_from)
        .collect()
}

pub async fn insert(db: &DatabaseConnection, aggregate: &DebugRecord) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        schema_id: Set(aggregate.schema_id.map(|id| id.value().to_string())),
        debug: Set(aggregate.debug.clone()),
        created_at: Set(aggregate.created_at),
    };
    active.insert(db).await?;
    Ok(uuid)
}
