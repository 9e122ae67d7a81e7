pub mod ingestion;
pub mod processing;
pub mod publishing;
pub mod server;

pub use ingestion::IngestionService;
pub use processing::ProcessingService;
pub use publishing::PublishingService;
pub use server::ServerService;
