use serde::{Deserialize, Serialize};

use super::aggregate::Schema;
use crate::domain::a002_object::aggregate::SchemaObject;
use crate::domain::a003_field::aggregate::Field;
use crate::domain::a004_field_usage::aggregate::FieldUsage;

/// Готовый к отображению документ схемы: объекты, поля и места использования
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub schema: Schema,
    pub objects: Vec<ObjectSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSection {
    pub object: SchemaObject,
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEntry {
    pub field: Field,
    pub usages: Vec<FieldUsage>,
}

impl SchemaDocument {
    pub fn field_count(&self) -> usize {
        self.objects.iter().map(|o| o.fields.len()).sum()
    }

    pub fn usage_count(&self) -> usize {
        self.objects
            .iter()
            .flat_map(|o| o.fields.iter())
            .map(|f| f.usages.len())
            .sum()
    }
}
