use contracts::domain::a001_schema::aggregate::SchemaId;
use contracts::domain::a002_object::aggregate::{SchemaObject, SchemaObjectId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_object")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub schema_id: String,
    pub api_name: String,
    pub label: String,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for SchemaObject {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        Ok(SchemaObject {
            id: SchemaObjectId(Uuid::parse_str(&m.id)?),
            schema_id: SchemaId(Uuid::parse_str(&m.schema_id)?),
            api_name: m.api_name,
            label: m.label,
            position: m.position,
        })
    }
}

pub async fn list_by_schema(
    db: &DatabaseConnection,
    schema_id: SchemaId,
) -> anyhow::Result<Vec<SchemaObject>> {
    Entity::find()
        .filter(Column::SchemaId.eq(schema_id.value().to_string()))
        .order_by_asc(Column::Position)
        .all(db)
        .await?
        .into_iter()
        .map(SchemaObject::try_from)
        .collect()
}

pub async fn insert(db: &DatabaseConnection, aggregate: &SchemaObject) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        schema_id: Set(aggregate.schema_id.value().to_string()),
        api_name: Set(aggregate.api_name.clone()),
        label: Set(aggregate.label.clone()),
        position: Set(aggregate.position),
    };
    active.insert(db).await?;
    Ok(uuid)
}
