// 💾 Storage Backends
//
// The repository only talks to `StoreBackend`. Every save is a full rewrite
// of one store; `load_*` returns `None` when the store does not exist yet.

pub mod csv_files;
pub mod memory;
pub mod rows;
pub mod sqlite;

pub use csv_files::CsvBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use crate::error::Result;
use crate::models::{LogEntry, ShipmentSummary, UserAccount};

pub trait StoreBackend {
    /// Short description for logs ("csv files in ./data", "sqlite :memory:")
    fn describe(&self) -> String;

    fn load_logs(&self) -> Result<Option<Vec<LogEntry>>>;
    fn save_logs(&mut self, entries: &[LogEntry]) -> Result<()>;

    fn load_users(&self) -> Result<Option<Vec<UserAccount>>>;
    fn save_users(&mut self, accounts: &[UserAccount]) -> Result<()>;

    fn load_summaries(&self) -> Result<Option<Vec<ShipmentSummary>>>;
    fn save_summaries(&mut self, rows: &[ShipmentSummary]) -> Result<()>;
}

impl<B: StoreBackend + ?Sized> StoreBackend for Box<B> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn load_logs(&self) -> Result<Option<Vec<LogEntry>>> {
        (**self).load_logs()
    }

    fn save_logs(&mut self, entries: &[LogEntry]) -> Result<()> {
        (**self).save_logs(entries)
    }

    fn load_users(&self) -> Result<Option<Vec<UserAccount>>> {
        (**self).load_users()
    }

    fn save_users(&mut self, accounts: &[UserAccount]) -> Result<()> {
        (**self).save_users(accounts)
    }

    fn load_summaries(&self) -> Result<Option<Vec<ShipmentSummary>>> {
        (**self).load_summaries()
    }

    fn save_summaries(&mut self, rows: &[ShipmentSummary]) -> Result<()> {
        (**self).save_summaries(rows)
    }
}

