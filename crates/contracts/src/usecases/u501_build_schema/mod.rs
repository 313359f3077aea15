pub mod progress;
pub mod request;
pub mod response;

pub use progress::{BuildPhase, BuildProgress};
pub use request::BuildSchemaRequest;
pub use response::BuildSchemaResponse;
