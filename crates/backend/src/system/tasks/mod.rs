pub mod logger;
pub mod worker;

pub use logger::TaskLogger;
pub use worker::SchemaTaskWorker;
