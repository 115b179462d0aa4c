// 📄 CSV Backend - Three header-row CSV files
//
// Each store is one file. Saves truncate and rewrite the whole file; there is
// no locking, so concurrent writers from other processes are not supported.

use super::rows::{LogRow, SummaryRow, UserRow};
use super::StoreBackend;
use crate::error::{Result, TrackerError};
use crate::models::{LogEntry, ShipmentSummary, StoreKind, UserAccount};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CsvBackend {
    log_path: PathBuf,
    user_path: PathBuf,
    summary_path: PathBuf,
}

impl CsvBackend {
    pub fn new(
        log_path: impl Into<PathBuf>,
        user_path: impl Into<PathBuf>,
        summary_path: impl Into<PathBuf>,
    ) -> Self {
        CsvBackend {
            log_path: log_path.into(),
            user_path: user_path.into(),
            summary_path: summary_path.into(),
        }
    }

    pub fn path(&self, store: StoreKind) -> &Path {
        match store {
            StoreKind::Logs => &self.log_path,
            StoreKind::Users => &self.user_path,
            StoreKind::Summaries => &self.summary_path,
        }
    }
}

/// Read every row of a store file, or `None` if the file is absent.
/// A zero-byte file reads as an empty store.
fn read_rows<R: DeserializeOwned>(path: &Path, store: StoreKind) -> Result<Option<Vec<R>>> {
    if !path.exists() {
        debug!(store = %store, path = %path.display(), "store file absent");
        return Ok(None);
    }

    let mut rdr = csv::Reader::from_path(path)
        .map_err(|e| TrackerError::storage(store, format!("{}: {}", path.display(), e)))?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: R = result
            .map_err(|e| TrackerError::storage(store, format!("{}: {}", path.display(), e)))?;
        rows.push(row);
    }

    debug!(store = %store, path = %path.display(), rows = rows.len(), "loaded store file");
    Ok(Some(rows))
}

/// Rewrite a store file: header row, then every row
fn write_rows<R: Serialize>(path: &Path, store: StoreKind, rows: &[R]) -> Result<()> {
    let wrap = |e: csv::Error| TrackerError::storage(store, format!("{}: {}", path.display(), e));

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(wrap)?;

    wtr.write_record(store.columns()).map_err(wrap)?;
    for row in rows {
        wtr.serialize(row).map_err(wrap)?;
    }
    wtr.flush()
        .map_err(|e| TrackerError::storage(store, format!("{}: {}", path.display(), e)))?;

    debug!(store = %store, path = %path.display(), rows = rows.len(), "wrote store file");
    Ok(())
}

/// Convert raw rows, reporting the file line of the first bad one
fn convert<R, T>(
    rows: Vec<R>,
    store: StoreKind,
    path: &Path,
    into: impl Fn(R) -> std::result::Result<T, String>,
) -> Result<Vec<T>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            into(row).map_err(|reason| {
                // +2: header is line 1
                TrackerError::storage(
                    store,
                    format!("{} line {}: {}", path.display(), index + 2, reason),
                )
            })
        })
        .collect()
}

impl StoreBackend for CsvBackend {
    fn describe(&self) -> String {
        match self.log_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => format!("csv files in {}", dir.display()),
            _ => "csv files".to_string(),
        }
    }

    fn load_logs(&self) -> Result<Option<Vec<LogEntry>>> {
        let path = self.path(StoreKind::Logs);
        match read_rows::<LogRow>(path, StoreKind::Logs)? {
            Some(rows) => convert(rows, StoreKind::Logs, path, LogRow::into_entry).map(Some),
            None => Ok(None),
        }
    }

    fn save_logs(&mut self, entries: &[LogEntry]) -> Result<()> {
        let rows: Vec<LogRow> = entries.iter().map(LogRow::from).collect();
        write_rows(self.path(StoreKind::Logs), StoreKind::Logs, &rows)
    }

    fn load_users(&self) -> Result<Option<Vec<UserAccount>>> {
        let path = self.path(StoreKind::Users);
        match read_rows::<UserRow>(path, StoreKind::Users)? {
            Some(rows) => convert(rows, StoreKind::Users, path, UserRow::into_account).map(Some),
            None => Ok(None),
        }
    }

    fn save_users(&mut self, accounts: &[UserAccount]) -> Result<()> {
        let rows: Vec<UserRow> = accounts.iter().map(UserRow::from).collect();
        write_rows(self.path(StoreKind::Users), StoreKind::Users, &rows)
    }

    fn load_summaries(&self) -> Result<Option<Vec<ShipmentSummary>>> {
        let path = self.path(StoreKind::Summaries);
        match read_rows::<SummaryRow>(path, StoreKind::Summaries)? {
            Some(rows) => {
                convert(rows, StoreKind::Summaries, path, SummaryRow::into_summary).map(Some)
            }
            None => Ok(None),
        }
    }

    fn save_summaries(&mut self, rows: &[ShipmentSummary]) -> Result<()> {
        let rows: Vec<SummaryRow> = rows.iter().map(SummaryRow::from).collect();
        write_rows(self.path(StoreKind::Summaries), StoreKind::Summaries, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, ShipmentStatus};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn backend_in(dir: &TempDir) -> CsvBackend {
        CsvBackend::new(
            dir.path().join("shipment_logs.csv"),
            dir.path().join("users.csv"),
            dir.path().join("shipments.csv"),
        )
    }

    #[test]
    fn test_absent_files_load_as_none() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);

        assert!(backend.load_logs().unwrap().is_none());
        assert!(backend.load_users().unwrap().is_none());
        assert!(backend.load_summaries().unwrap().is_none());
    }

    #[test]
    fn test_empty_store_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let mut backend = backend_in(&dir);

        backend.save_logs(&[]).unwrap();

        let content = fs::read_to_string(dir.path().join("shipment_logs.csv")).unwrap();
        assert_eq!(content.trim_end(), "tracking_id,timestamp,location,status");
        assert_eq!(backend.load_logs().unwrap(), Some(vec![]));
    }

    #[test]
    fn test_zero_byte_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("users.csv"), "").unwrap();
        let backend = backend_in(&dir);

        assert_eq!(backend.load_users().unwrap(), Some(vec![]));
    }

    #[test]
    fn test_log_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut backend = backend_in(&dir);

        let ts = NaiveDate::from_ymd_opt(2025, 12, 15)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        let entries = vec![
            LogEntry::new("TR1", ts, "Istanbul, Kadikoy", ShipmentStatus::Accepted),
            LogEntry::new("TR1", ts, "Ankara", ShipmentStatus::InTransit),
        ];

        backend.save_logs(&entries).unwrap();
        assert_eq!(backend.load_logs().unwrap(), Some(entries));
    }

    #[test]
    fn test_legacy_files_load() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("shipment_logs.csv"),
            "takip_no,tarih,konum,durum\n\
             TR5,15.12.2025 18:30,Izmir,Teslim Edildi\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("users.csv"),
            "kullanici_adi,sifre,rol\nlojisfk,1234,Personel\nyonetici,4321,Yonetici\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("shipments.csv"),
            "takip_no,gonderici_ad,alici_ad,mevcut_durum\n\
             TR5,Ayse,Mehmet,Teslim Edildi\n",
        )
        .unwrap();
        let backend = backend_in(&dir);

        let logs = backend.load_logs().unwrap().unwrap();
        assert_eq!(logs[0].tracking_id, "TR5");
        assert_eq!(logs[0].status, ShipmentStatus::Delivered);
        assert_eq!(logs[0].location, "Izmir");
        assert_eq!(
            logs[0].timestamp,
            NaiveDate::from_ymd_opt(2025, 12, 15)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap()
        );

        let users = backend.load_users().unwrap().unwrap();
        assert_eq!(users[0].role, Role::Operator);
        assert_eq!(users[1].role, Role::Manager);

        let summaries = backend.load_summaries().unwrap().unwrap();
        assert_eq!(summaries[0].sender, "Ayse");
        assert_eq!(summaries[0].recipient, "Mehmet");
        assert_eq!(summaries[0].current_status, ShipmentStatus::Delivered);
    }

    #[test]
    fn test_legacy_file_is_rewritten_with_current_headers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shipment_logs.csv");
        fs::write(&path, "takip_no,tarih,konum,durum\nTR5,15.12.2025 18:30,Izmir,Teslim Edildi\n")
            .unwrap();
        let mut backend = backend_in(&dir);

        let logs = backend.load_logs().unwrap().unwrap();
        backend.save_logs(&logs).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("tracking_id,timestamp,location,status\n"));
        assert!(written.contains("TR5,2025-12-15 18:30,Izmir,Delivered"));
    }

    #[test]
    fn test_unparseable_file_reports_line() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("shipments.csv"),
            "tracking_id,sender,recipient,current_status\n\
             TR1,A,B,Accepted\n\
             TR2,A,B,Teleported\n",
        )
        .unwrap();
        let backend = backend_in(&dir);

        let err = backend.load_summaries().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 3"), "{}", message);
        assert!(message.contains("Teleported"), "{}", message);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("users.csv"),
            "username,role\nlojisfk,Operator\n",
        )
        .unwrap();
        let backend = backend_in(&dir);

        assert!(backend.load_users().is_err());
    }
}
