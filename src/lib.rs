// Shipment Tracker - Core Library
// Exposes the record repository for the CLI, the API server, and tests

pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod repository;
pub mod stores;
pub mod timestamp;

// Re-export commonly used types
pub use backend::{CsvBackend, MemoryBackend, SqliteBackend, StoreBackend};
pub use config::{BackendKind, StoreFiles, TrackerConfig};
pub use error::{Result, TrackerError};
pub use models::{LogEntry, Role, ShipmentStatus, ShipmentSummary, StoreKind, UserAccount, UNKNOWN_PARTY};
pub use reports::{estimate_delivery, DeliveryEstimate, ManagerReport, Session, TrackingReport};
pub use repository::{parse_status, RecordRepository};
pub use stores::{ShipmentLogStore, ShipmentSummaryStore, UserStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository over whichever backend the config selected
pub type DynRepository = RecordRepository<Box<dyn StoreBackend + Send>>;

/// Open the configured backend and load every store
pub fn open_repository(config: &TrackerConfig) -> Result<DynRepository> {
    let backend = config.open_backend()?;
    RecordRepository::initialize(backend)
}
