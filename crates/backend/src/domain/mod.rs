pub mod a001_schema;
pub mod a002_object;
pub mod a003_field;
pub mod a004_field_usage;
pub mod a005_debug;
