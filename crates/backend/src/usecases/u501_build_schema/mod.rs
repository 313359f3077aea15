pub mod error;
pub mod executor;
pub mod metadata_lookup;
pub mod models;
pub mod object_ingestor;
pub mod progress_tracker;
pub mod salesforce_api_client;
pub mod type_resolver;
pub mod usage_scanner;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::SchemaBuildError;
pub use executor::SchemaRunner;
pub use progress_tracker::ProgressTracker;
pub use salesforce_api_client::{MetadataClient, SalesforceApiClient};
