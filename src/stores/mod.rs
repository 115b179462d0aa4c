// In-memory record sets
//
// Each store holds its full table in memory. Persisting is the backend's job;
// the repository rewrites a whole store after every mutation.

pub mod log_store;
pub mod summary_store;
pub mod user_store;

pub use log_store::ShipmentLogStore;
pub use summary_store::{ShipmentSummaryStore, SummaryChange};
pub use user_store::UserStore;
