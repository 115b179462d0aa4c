// 🗃️ Record Repository - Facade over the three stores
//
// Load everything at startup, mutate in memory, rewrite the touched store in
// full after every mutation. Writes are sequential and best-effort: when a
// save fails the in-memory state is kept and the error goes to the caller.

use crate::backend::StoreBackend;
use crate::error::{Result, TrackerError};
use crate::models::{LogEntry, Role, ShipmentStatus, ShipmentSummary, StoreKind};
use crate::reports::{estimate_delivery, DeliveryEstimate, ManagerReport, Session, TrackingReport};
use crate::stores::{ShipmentLogStore, ShipmentSummaryStore, SummaryChange, UserStore};
use crate::timestamp;
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

/// Parse a status typed by a user, as a validation failure if unknown
pub fn parse_status(raw: &str) -> Result<ShipmentStatus> {
    raw.parse()
        .map_err(|message: String| TrackerError::validation("status", message))
}

/// Trim a required text field, rejecting it if nothing is left
fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TrackerError::validation(field, "is required"));
    }
    Ok(value)
}

pub struct RecordRepository<B: StoreBackend> {
    backend: B,
    logs: ShipmentLogStore,
    users: UserStore,
    summaries: ShipmentSummaryStore,
}

impl<B: StoreBackend> RecordRepository<B> {
    // ========================================================================
    // STARTUP
    // ========================================================================

    /// Load all three stores, creating absent ones and seeding default
    /// accounts into an absent or empty user store. Any failure here is a
    /// `StorageInit` error and should abort startup.
    pub fn initialize(mut backend: B) -> Result<Self> {
        info!(backend = %backend.describe(), "initializing record repository");

        let logs = match backend
            .load_logs()
            .map_err(|e| e.into_init(StoreKind::Logs))?
        {
            Some(entries) => ShipmentLogStore::from_entries(entries),
            None => {
                backend
                    .save_logs(&[])
                    .map_err(|e| e.into_init(StoreKind::Logs))?;
                info!(store = %StoreKind::Logs, "created empty store");
                ShipmentLogStore::new()
            }
        };

        let mut users = match backend
            .load_users()
            .map_err(|e| e.into_init(StoreKind::Users))?
        {
            Some(accounts) => UserStore::from_accounts(accounts),
            None => UserStore::default(),
        };
        if users.seed_defaults() {
            backend
                .save_users(users.accounts())
                .map_err(|e| e.into_init(StoreKind::Users))?;
            info!(accounts = users.len(), "seeded default user accounts");
        }

        let summaries = match backend
            .load_summaries()
            .map_err(|e| e.into_init(StoreKind::Summaries))?
        {
            Some(rows) => ShipmentSummaryStore::from_rows(rows),
            None => {
                backend
                    .save_summaries(&[])
                    .map_err(|e| e.into_init(StoreKind::Summaries))?;
                info!(store = %StoreKind::Summaries, "created empty store");
                ShipmentSummaryStore::default()
            }
        };

        info!(
            log_entries = logs.len(),
            accounts = users.len(),
            shipments = summaries.len(),
            "record repository ready"
        );

        Ok(RecordRepository {
            backend,
            logs,
            users,
            summaries,
        })
    }

    // ========================================================================
    // CORE OPERATIONS
    // ========================================================================

    /// Role of the first account matching exactly. No side effects.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        let role = self.users.authenticate(username, password);
        debug!(username, matched = role.is_some(), "authentication attempt");
        role
    }

    /// All events for a tracking id, oldest first; `None` if it was never
    /// logged
    pub fn get_history(&self, tracking_id: &str) -> Option<Vec<LogEntry>> {
        self.logs.history(tracking_id)
    }

    /// Append an event stamped with the current time
    pub fn append_log(
        &mut self,
        tracking_id: &str,
        location: &str,
        status: ShipmentStatus,
    ) -> Result<LogEntry> {
        self.append_log_at(tracking_id, location, status, timestamp::now())
    }

    /// Append an event with an explicit timestamp, then persist the log and
    /// the updated summary, in that order
    pub fn append_log_at(
        &mut self,
        tracking_id: &str,
        location: &str,
        status: ShipmentStatus,
        at: NaiveDateTime,
    ) -> Result<LogEntry> {
        let tracking_id = required("tracking_id", tracking_id)?;
        let location = required("location", location)?;

        let entry = LogEntry::new(tracking_id, at, location, status);
        self.logs.append(entry.clone());
        self.backend
            .save_logs(self.logs.entries())
            .inspect_err(|e| warn!(tracking_id, error = %e, "log write failed"))?;

        let change = self.summaries.record_status(tracking_id, status);
        self.backend
            .save_summaries(self.summaries.rows())
            .inspect_err(|e| warn!(tracking_id, error = %e, "summary write failed"))?;

        info!(
            tracking_id,
            location,
            status = status.code(),
            new_shipment = change == SummaryChange::Created,
            "recorded shipment event"
        );
        Ok(entry)
    }

    pub fn estimate_delivery(&self, history: &[LogEntry]) -> DeliveryEstimate {
        estimate_delivery(history)
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    /// Customer lookup
    pub fn track(&self, tracking_id: &str) -> Result<TrackingReport> {
        let tracking_id = required("tracking_id", tracking_id)?;

        self.get_history(tracking_id)
            .and_then(|history| TrackingReport::from_history(tracking_id, history))
            .ok_or_else(|| TrackerError::not_found(tracking_id))
    }

    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        match self.authenticate(username, password) {
            Some(role) => Ok(Session {
                username: username.to_string(),
                role,
            }),
            None => Err(TrackerError::access_denied("invalid username or password")),
        }
    }

    /// Operator data entry
    pub fn record_event(
        &mut self,
        session: &Session,
        tracking_id: &str,
        location: &str,
        status: ShipmentStatus,
    ) -> Result<LogEntry> {
        if !session.role.can_record_events() {
            return Err(TrackerError::access_denied(format!(
                "{} accounts cannot record shipment events",
                session.role
            )));
        }
        self.append_log(tracking_id, location, status)
    }

    /// Manager overview
    pub fn manager_report(&self, session: &Session) -> Result<ManagerReport> {
        if !session.role.can_view_report() {
            return Err(TrackerError::access_denied(format!(
                "{} accounts cannot view the manager report",
                session.role
            )));
        }

        Ok(ManagerReport {
            accounts: self.users.accounts().to_vec(),
            shipments: self.summaries.rows().to_vec(),
            by_status: self.summaries.count_by_status(),
            total_events: self.logs.len(),
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn summary(&self, tracking_id: &str) -> Option<&ShipmentSummary> {
        self.summaries.get(tracking_id)
    }

    pub fn summaries(&self) -> &[ShipmentSummary] {
        self.summaries.rows()
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        self.logs.entries()
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
