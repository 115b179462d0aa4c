// 🧪 Memory Backend - Stores held in plain vectors
// Used by tests; `fail_writes` makes every save fail so startup and
// write-failure paths can be exercised without touching the filesystem.

use super::StoreBackend;
use crate::error::{Result, TrackerError};
use crate::models::{LogEntry, ShipmentSummary, StoreKind, UserAccount};

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    logs: Option<Vec<LogEntry>>,
    users: Option<Vec<UserAccount>>,
    summaries: Option<Vec<ShipmentSummary>>,
    fail_writes: bool,
    saves: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logs(mut self, logs: Vec<LogEntry>) -> Self {
        self.logs = Some(logs);
        self
    }

    pub fn with_users(mut self, users: Vec<UserAccount>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_summaries(mut self, summaries: Vec<ShipmentSummary>) -> Self {
        self.summaries = Some(summaries);
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// What was last persisted for each store
    pub fn logs(&self) -> Option<&[LogEntry]> {
        self.logs.as_deref()
    }

    pub fn users(&self) -> Option<&[UserAccount]> {
        self.users.as_deref()
    }

    pub fn summaries(&self) -> Option<&[ShipmentSummary]> {
        self.summaries.as_deref()
    }

    /// Number of successful saves across all stores
    pub fn save_count(&self) -> usize {
        self.saves
    }

    fn check_write(&mut self, store: StoreKind) -> Result<()> {
        if self.fail_writes {
            return Err(TrackerError::storage(store, "write rejected"));
        }
        self.saves += 1;
        Ok(())
    }
}

impl StoreBackend for MemoryBackend {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn load_logs(&self) -> Result<Option<Vec<LogEntry>>> {
        Ok(self.logs.clone())
    }

    fn save_logs(&mut self, entries: &[LogEntry]) -> Result<()> {
        self.check_write(StoreKind::Logs)?;
        self.logs = Some(entries.to_vec());
        Ok(())
    }

    fn load_users(&self) -> Result<Option<Vec<UserAccount>>> {
        Ok(self.users.clone())
    }

    fn save_users(&mut self, accounts: &[UserAccount]) -> Result<()> {
        self.check_write(StoreKind::Users)?;
        self.users = Some(accounts.to_vec());
        Ok(())
    }

    fn load_summaries(&self) -> Result<Option<Vec<ShipmentSummary>>> {
        Ok(self.summaries.clone())
    }

    fn save_summaries(&mut self, rows: &[ShipmentSummary]) -> Result<()> {
        self.check_write(StoreKind::Summaries)?;
        self.summaries = Some(rows.to_vec());
        Ok(())
    }
}
