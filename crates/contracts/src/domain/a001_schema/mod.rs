pub mod aggregate;
pub mod document;
