// Flat string rows shared by the CSV and SQLite backends.
// Both formats store every column as text; conversion to typed records
// happens here so lenient parsing behaves the same everywhere.

use crate::models::{LogEntry, Role, ShipmentStatus, ShipmentSummary, UserAccount};
use crate::timestamp::{format_timestamp, parse_timestamp};
use serde::{Deserialize, Serialize};

// Aliases accept the column names written by the legacy application

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRow {
    #[serde(alias = "takip_no")]
    pub tracking_id: String,
    #[serde(alias = "tarih")]
    pub timestamp: String,
    #[serde(alias = "konum")]
    pub location: String,
    #[serde(alias = "durum")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    #[serde(alias = "kullanici_adi")]
    pub username: String,
    #[serde(alias = "sifre")]
    pub password: String,
    #[serde(alias = "rol")]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(alias = "takip_no")]
    pub tracking_id: String,
    #[serde(alias = "gonderici_ad")]
    pub sender: String,
    #[serde(alias = "alici_ad")]
    pub recipient: String,
    #[serde(alias = "mevcut_durum")]
    pub current_status: String,
}

impl LogRow {
    pub fn into_entry(self) -> Result<LogEntry, String> {
        let timestamp = parse_timestamp(&self.timestamp).ok_or_else(|| {
            format!(
                "unrecognized timestamp \"{}\" for {}",
                self.timestamp, self.tracking_id
            )
        })?;
        let status: ShipmentStatus = self.status.parse()?;

        Ok(LogEntry::new(
            self.tracking_id.trim(),
            timestamp,
            self.location,
            status,
        ))
    }
}

impl From<&LogEntry> for LogRow {
    fn from(entry: &LogEntry) -> Self {
        LogRow {
            tracking_id: entry.tracking_id.clone(),
            timestamp: format_timestamp(&entry.timestamp),
            location: entry.location.clone(),
            status: entry.status.code().to_string(),
        }
    }
}

impl UserRow {
    pub fn into_account(self) -> Result<UserAccount, String> {
        let role: Role = self.role.parse()?;
        Ok(UserAccount::new(
            self.username.trim(),
            self.password.trim(),
            role,
        ))
    }
}

impl From<&UserAccount> for UserRow {
    fn from(account: &UserAccount) -> Self {
        UserRow {
            username: account.username.clone(),
            password: account.password.clone(),
            role: account.role.code().to_string(),
        }
    }
}

impl SummaryRow {
    pub fn into_summary(self) -> Result<ShipmentSummary, String> {
        let current_status: ShipmentStatus = self.current_status.parse()?;
        Ok(ShipmentSummary {
            tracking_id: self.tracking_id.trim().to_string(),
            sender: self.sender,
            recipient: self.recipient,
            current_status,
        })
    }
}

impl From<&ShipmentSummary> for SummaryRow {
    fn from(summary: &ShipmentSummary) -> Self {
        SummaryRow {
            tracking_id: summary.tracking_id.clone(),
            sender: summary.sender.clone(),
            recipient: summary.recipient.clone(),
            current_status: summary.current_status.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_log_row() {
        let row = LogRow {
            tracking_id: " TR100 ".to_string(),
            timestamp: "15.12.2025 18:30".to_string(),
            location: "Istanbul Hub".to_string(),
            status: "Merkeze Ulaştı".to_string(),
        };

        let entry = row.into_entry().unwrap();
        assert_eq!(entry.tracking_id, "TR100");
        assert_eq!(entry.status, ShipmentStatus::ArrivedAtHub);

        let back = LogRow::from(&entry);
        assert_eq!(back.timestamp, "2025-12-15 18:30");
        assert_eq!(back.status, "ArrivedAtHub");
    }

    #[test]
    fn test_bad_rows_are_rejected() {
        let bad_time = LogRow {
            tracking_id: "TR1".to_string(),
            timestamp: "soon".to_string(),
            location: "X".to_string(),
            status: "Accepted".to_string(),
        };
        assert!(bad_time.into_entry().unwrap_err().contains("soon"));

        let bad_role = UserRow {
            username: "a".to_string(),
            password: "b".to_string(),
            role: "Root".to_string(),
        };
        assert!(bad_role.into_account().is_err());
    }

    #[test]
    fn test_user_row_trims_credentials() {
        let row = UserRow {
            username: " lojisfk ".to_string(),
            password: "1234 ".to_string(),
            role: "Personel".to_string(),
        };

        let account = row.into_account().unwrap();
        assert!(account.matches("lojisfk", "1234"));
        assert_eq!(account.role, Role::Operator);
    }
}
