// 🗄️ SQLite Backend - The three stores as tables in one database
//
// Same semantics as the CSV files: a table that does not exist yet is an
// absent store, and every save replaces the whole table inside one
// transaction.

use super::rows::{LogRow, SummaryRow, UserRow};
use super::StoreBackend;
use crate::error::{Result, TrackerError};
use crate::models::{LogEntry, ShipmentSummary, StoreKind, UserAccount};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

pub struct SqliteBackend {
    conn: Connection,
    label: String,
}

fn table_name(store: StoreKind) -> &'static str {
    match store {
        StoreKind::Logs => "shipment_logs",
        StoreKind::Users => "users",
        StoreKind::Summaries => "shipments",
    }
}

fn create_table_sql(store: StoreKind) -> &'static str {
    match store {
        StoreKind::Logs => {
            "CREATE TABLE IF NOT EXISTS shipment_logs (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                tracking_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                location TEXT NOT NULL,
                status TEXT NOT NULL
            )"
        }
        StoreKind::Users => {
            "CREATE TABLE IF NOT EXISTS users (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                password TEXT NOT NULL,
                role TEXT NOT NULL
            )"
        }
        StoreKind::Summaries => {
            "CREATE TABLE IF NOT EXISTS shipments (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                tracking_id TEXT NOT NULL,
                sender TEXT NOT NULL,
                recipient TEXT NOT NULL,
                current_status TEXT NOT NULL
            )"
        }
    }
}

impl SqliteBackend {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| TrackerError::database(path, e))?;
        // WAL for crash recovery on file databases
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| TrackerError::database(path, e))?;

        Ok(SqliteBackend {
            conn,
            label: format!("sqlite {}", path.display()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TrackerError::database(Path::new(":memory:"), e))?;

        Ok(SqliteBackend {
            conn,
            label: "sqlite :memory:".to_string(),
        })
    }

    fn table_exists(&self, store: StoreKind) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table_name(store)],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| TrackerError::storage(store, e))?;

        Ok(found.is_some())
    }

    /// Every row of a table as strings, in insertion order
    fn read_columns(&self, store: StoreKind) -> Result<Option<Vec<Vec<String>>>> {
        if !self.table_exists(store)? {
            debug!(store = %store, "table absent");
            return Ok(None);
        }

        let columns = store.columns();
        let sql = format!(
            "SELECT {} FROM {} ORDER BY seq",
            columns.join(", "),
            table_name(store)
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| TrackerError::storage(store, e))?;

        let rows = stmt
            .query_map([], |row| {
                (0..columns.len())
                    .map(|i| row.get::<_, String>(i))
                    .collect::<rusqlite::Result<Vec<String>>>()
            })
            .map_err(|e| TrackerError::storage(store, e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| TrackerError::storage(store, e))?;

        debug!(store = %store, rows = rows.len(), "loaded table");
        Ok(Some(rows))
    }

    /// Replace a table's contents in one transaction
    fn replace_rows(&mut self, store: StoreKind, rows: &[Vec<String>]) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| TrackerError::storage(store, e))?;

        tx.execute(create_table_sql(store), [])
            .map_err(|e| TrackerError::storage(store, e))?;
        tx.execute(&format!("DELETE FROM {}", table_name(store)), [])
            .map_err(|e| TrackerError::storage(store, e))?;

        let columns = store.columns();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table_name(store),
            columns.join(", "),
            placeholders.join(", ")
        );

        {
            let mut stmt = tx
                .prepare(&sql)
                .map_err(|e| TrackerError::storage(store, e))?;
            for row in rows {
                stmt.execute(rusqlite::params_from_iter(row.iter()))
                    .map_err(|e| TrackerError::storage(store, e))?;
            }
        }

        tx.commit().map_err(|e| TrackerError::storage(store, e))?;

        debug!(store = %store, rows = rows.len(), "replaced table");
        Ok(())
    }

    /// Number of rows currently in a table (0 when absent)
    pub fn count(&self, store: StoreKind) -> Result<i64> {
        if !self.table_exists(store)? {
            return Ok(0);
        }
        self.conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", table_name(store)),
                params![],
                |row| row.get(0),
            )
            .map_err(|e| TrackerError::storage(store, e))
    }
}

fn take(row: &mut std::vec::IntoIter<String>) -> String {
    row.next().unwrap_or_default()
}

impl StoreBackend for SqliteBackend {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn load_logs(&self) -> Result<Option<Vec<LogEntry>>> {
        let Some(rows) = self.read_columns(StoreKind::Logs)? else {
            return Ok(None);
        };

        rows.into_iter()
            .map(|row| {
                let mut row = row.into_iter();
                LogRow {
                    tracking_id: take(&mut row),
                    timestamp: take(&mut row),
                    location: take(&mut row),
                    status: take(&mut row),
                }
                .into_entry()
                .map_err(|e| TrackerError::storage(StoreKind::Logs, e))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn save_logs(&mut self, entries: &[LogEntry]) -> Result<()> {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(LogRow::from)
            .map(|r| vec![r.tracking_id, r.timestamp, r.location, r.status])
            .collect();
        self.replace_rows(StoreKind::Logs, &rows)
    }

    fn load_users(&self) -> Result<Option<Vec<UserAccount>>> {
        let Some(rows) = self.read_columns(StoreKind::Users)? else {
            return Ok(None);
        };

        rows.into_iter()
            .map(|row| {
                let mut row = row.into_iter();
                UserRow {
                    username: take(&mut row),
                    password: take(&mut row),
                    role: take(&mut row),
                }
                .into_account()
                .map_err(|e| TrackerError::storage(StoreKind::Users, e))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn save_users(&mut self, accounts: &[UserAccount]) -> Result<()> {
        let rows: Vec<Vec<String>> = accounts
            .iter()
            .map(UserRow::from)
            .map(|r| vec![r.username, r.password, r.role])
            .collect();
        self.replace_rows(StoreKind::Users, &rows)
    }

    fn load_summaries(&self) -> Result<Option<Vec<ShipmentSummary>>> {
        let Some(rows) = self.read_columns(StoreKind::Summaries)? else {
            return Ok(None);
        };

        rows.into_iter()
            .map(|row| {
                let mut row = row.into_iter();
                SummaryRow {
                    tracking_id: take(&mut row),
                    sender: take(&mut row),
                    recipient: take(&mut row),
                    current_status: take(&mut row),
                }
                .into_summary()
                .map_err(|e| TrackerError::storage(StoreKind::Summaries, e))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn save_summaries(&mut self, rows: &[ShipmentSummary]) -> Result<()> {
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(SummaryRow::from)
            .map(|r| vec![r.tracking_id, r.sender, r.recipient, r.current_status])
            .collect();
        self.replace_rows(StoreKind::Summaries, &rows)
    }
}
