use contracts::domain::a002_object::aggregate::SchemaObjectId;
use contracts::domain::a003_field::aggregate::{Field, FieldId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::ID_CHUNK_SIZE;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_field")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub object_id: String,
    pub api_name: String,
    pub label: String,
    pub help_text: Option<String>,
    pub data_type: String,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Field {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        Ok(Field {
            id: FieldId(Uuid::parse_str(&m.id)?),
            object_id: SchemaObjectId(Uuid::parse_str(&m.object_id)?),
            api_name: m.api_name,
            label: m.label,
            help_text: m.help_text,
            data_type: m.data_type,
            position: m.position,
        })
    }
}

/// Поля объектов; внутри объекта в порядке ответа describe.
/// Запросы идут пачками по `ID_CHUNK_SIZE`, чтобы не упереться в лимит параметров SQLite.
pub async fn list_by_object_ids(
    db: &DatabaseConnection,
    object_ids: &[SchemaObjectId],
) -> anyhow::Result<Vec<Field>> {
    let mut fields = Vec::new();
    for chunk in object_ids.chunks(ID_CHUNK_SIZE) {
        let ids: Vec<String> = chunk.iter().map(|id| id.value().to_string()).collect();
        let models = Entity::find()
            .filter(Column::ObjectId.is_in(ids))
            .order_by_asc(Column::Position)
            .all(db)
            .await?;
        for model in models {
            fields.push(Field::try_from(model)?);
        }
    }
    Ok(fields)
}

pub async fn insert(db: &DatabaseConnection, aggregate: &Field) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        object_id: Set(aggregate.object_id.value().to_string()),
        api_name: Set(aggregate.api_name.clone()),
        label: Set(aggregate.label.clone()),
        help_text: Set(aggregate.help_text.clone()),
        data_type: Set(aggregate.data_type.clone()),
        position: Set(aggregate.position),
    };
    active.insert(db).await?;
    Ok(uuid)
}
