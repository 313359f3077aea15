use contracts::domain::a003_field::aggregate::FieldId;
use contracts::domain::a004_field_usage::aggregate::{FieldUsage, FieldUsageId, FieldUsageType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::ID_CHUNK_SIZE;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_field_usage")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub field_id: String,
    pub usage_type: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for FieldUsage {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        Ok(FieldUsage {
            id: FieldUsageId(Uuid::parse_str(&m.id)?),
            field_id: FieldId(Uuid::parse_str(&m.field_id)?),
            usage_type: m.usage_type.parse::<FieldUsageType>()?,
            name: m.name,
        })
    }
}

pub async fn list_by_field_ids(
    db: &DatabaseConnection,
    field_ids: &[FieldId],
) -> anyhow::Result<Vec<FieldUsage>> {
    let mut usages = Vec::new();
    for chunk in field_ids.chunks(ID_CHUNK_SIZE) {
        let ids: Vec<String> = chunk.iter().map(|id| id.value().to_string()).collect();
        let models = Entity::find()
            .filter(Column::FieldId.is_in(ids))
            .order_by_asc(Column::Name)
            .all(db)
            .await?;
        for model in models {
            usages.push(FieldUsage::try_from(model)?);
        }
    }
    Ok(usages)
}

pub async fn insert(db: &DatabaseConnection, aggregate: &FieldUsage) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        field_id: Set(aggregate.field_id.value().to_string()),
        usage_type: Set(aggregate.usage_type.to_string()),
        name: Set(aggregate.name.clone()),
    };
    active.insert(db).await?;
    Ok(uuid)
}
