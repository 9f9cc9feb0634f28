pub mod ingest;
pub mod users;

pub use ingest::{IngestService, IngestStats};
pub use users::{UserError, UserService};
