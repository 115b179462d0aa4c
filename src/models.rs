// 📦 Record Types - Log entries, accounts, shipment summaries
//
// Status and role labels are written in their canonical form but read
// leniently: display labels and the legacy labels of older data files are
// accepted too.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for sender/recipient on summaries created from a log append
pub const UNKNOWN_PARTY: &str = "Unknown";

// ============================================================================
// STORE KIND
// ============================================================================

/// The three record sets behind the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreKind {
    Logs,
    Users,
    Summaries,
}

impl StoreKind {
    pub fn name(&self) -> &'static str {
        match self {
            StoreKind::Logs => "shipment log",
            StoreKind::Users => "users",
            StoreKind::Summaries => "shipment summary",
        }
    }

    /// Column names in the order they are written
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            StoreKind::Logs => &["tracking_id", "timestamp", "location", "status"],
            StoreKind::Users => &["username", "password", "role"],
            StoreKind::Summaries => &["tracking_id", "sender", "recipient", "current_status"],
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase and drop separators so "In Transit", "in_transit" and
/// "InTransit" compare equal
fn normalize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

// ============================================================================
// SHIPMENT STATUS
// ============================================================================

/// Shipment status. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipmentStatus {
    Accepted,
    InTransit,
    ArrivedAtHub,
    OutForDelivery,
    Delivered,
    NotFoundAtAddress,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 6] = [
        ShipmentStatus::Accepted,
        ShipmentStatus::InTransit,
        ShipmentStatus::ArrivedAtHub,
        ShipmentStatus::OutForDelivery,
        ShipmentStatus::Delivered,
        ShipmentStatus::NotFoundAtAddress,
    ];

    /// Canonical name, as written to the stores
    pub fn code(&self) -> &'static str {
        match self {
            ShipmentStatus::Accepted => "Accepted",
            ShipmentStatus::InTransit => "InTransit",
            ShipmentStatus::ArrivedAtHub => "ArrivedAtHub",
            ShipmentStatus::OutForDelivery => "OutForDelivery",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::NotFoundAtAddress => "NotFoundAtAddress",
        }
    }

    /// Human-readable name for display
    pub fn label(&self) -> &'static str {
        match self {
            ShipmentStatus::Accepted => "Accepted",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::ArrivedAtHub => "Arrived at Hub",
            ShipmentStatus::OutForDelivery => "Out for Delivery",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::NotFoundAtAddress => "Not Found at Address",
        }
    }

    /// Label used by the legacy data files
    fn legacy_label(&self) -> &'static str {
        match self {
            ShipmentStatus::Accepted => "Kabul Edildi",
            ShipmentStatus::InTransit => "Transfer Sürecinde",
            ShipmentStatus::ArrivedAtHub => "Merkeze Ulaştı",
            ShipmentStatus::OutForDelivery => "Dağıtıma Çıktı",
            ShipmentStatus::Delivered => "Teslim Edildi",
            ShipmentStatus::NotFoundAtAddress => "Adreste Bulunamadı",
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, ShipmentStatus::Delivered)
    }
}

impl FromStr for ShipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        ShipmentStatus::ALL
            .iter()
            .copied()
            .find(|status| {
                normalize_label(status.code()) == wanted
                    || normalize_label(status.label()) == wanted
                    || normalize_label(status.legacy_label()) == wanted
            })
            .ok_or_else(|| format!("unknown shipment status \"{}\"", s.trim()))
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// ROLE
// ============================================================================

/// Role granted at authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Data entry only
    Operator,
    /// Read-only overview
    Manager,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Role::Operator => "Operator",
            Role::Manager => "Manager",
        }
    }

    fn legacy_label(&self) -> &'static str {
        match self {
            Role::Operator => "Personel",
            Role::Manager => "Yonetici",
        }
    }

    pub fn can_record_events(&self) -> bool {
        matches!(self, Role::Operator)
    }

    pub fn can_view_report(&self) -> bool {
        matches!(self, Role::Manager)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        [Role::Operator, Role::Manager]
            .into_iter()
            .find(|role| {
                normalize_label(role.code()) == wanted
                    || normalize_label(role.legacy_label()) == wanted
            })
            .ok_or_else(|| format!("unknown role \"{}\"", s.trim()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// One timestamped (location, status) observation for a shipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub tracking_id: String,
    /// Local wall-clock time, minute precision
    pub timestamp: NaiveDateTime,
    pub location: String,
    pub status: ShipmentStatus,
}

impl LogEntry {
    /// Build an entry. Seconds are dropped so the entry survives a
    /// write/reload cycle unchanged.
    pub fn new(
        tracking_id: impl Into<String>,
        timestamp: NaiveDateTime,
        location: impl Into<String>,
        status: ShipmentStatus,
    ) -> Self {
        let timestamp = timestamp
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(timestamp);

        LogEntry {
            tracking_id: tracking_id.into(),
            timestamp,
            location: location.into(),
            status,
        }
    }
}

/// Login record. The password is stored and compared in cleartext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl UserAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        UserAccount {
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    /// Exact, case-sensitive credential match
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Latest-known status projection, one row per tracking id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentSummary {
    pub tracking_id: String,
    pub sender: String,
    pub recipient: String,
    pub current_status: ShipmentStatus,
}

impl ShipmentSummary {
    /// Summary for a shipment first seen through a log append
    pub fn from_first_log(tracking_id: impl Into<String>, status: ShipmentStatus) -> Self {
        ShipmentSummary {
            tracking_id: tracking_id.into(),
            sender: UNKNOWN_PARTY.to_string(),
            recipient: UNKNOWN_PARTY.to_string(),
            current_status: status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_parses_every_label_form() {
        for status in ShipmentStatus::ALL {
            assert_eq!(status.code().parse::<ShipmentStatus>(), Ok(status));
            assert_eq!(status.label().parse::<ShipmentStatus>(), Ok(status));
            assert_eq!(status.legacy_label().parse::<ShipmentStatus>(), Ok(status));
        }

        assert_eq!("in_transit".parse(), Ok(ShipmentStatus::InTransit));
        assert_eq!("  OUT FOR DELIVERY ".parse(), Ok(ShipmentStatus::OutForDelivery));
        assert!("Lost".parse::<ShipmentStatus>().is_err());
    }

    #[test]
    fn test_role_parses_legacy_labels() {
        assert_eq!("Operator".parse(), Ok(Role::Operator));
        assert_eq!("Personel".parse(), Ok(Role::Operator));
        assert_eq!("Yonetici".parse(), Ok(Role::Manager));
        assert_eq!("manager".parse(), Ok(Role::Manager));
        assert!("Admin".parse::<Role>().is_err());

        assert!(Role::Operator.can_record_events());
        assert!(!Role::Operator.can_view_report());
        assert!(Role::Manager.can_view_report());
        assert!(!Role::Manager.can_record_events());
    }

    #[test]
    fn test_log_entry_drops_seconds() {
        let ts = NaiveDate::from_ymd_opt(2025, 12, 15)
            .unwrap()
            .and_hms_milli_opt(18, 30, 42, 500)
            .unwrap();
        let entry = LogEntry::new("TR1", ts, "Istanbul", ShipmentStatus::Accepted);

        assert_eq!(
            entry.timestamp,
            NaiveDate::from_ymd_opt(2025, 12, 15)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_credentials_are_case_sensitive() {
        let account = UserAccount::new("lojisfk", "1234", Role::Operator);

        assert!(account.matches("lojisfk", "1234"));
        assert!(!account.matches("LOJISFK", "1234"));
        assert!(!account.matches("lojisfk", "1234 "));
    }

    #[test]
    fn test_summary_from_first_log() {
        let summary = ShipmentSummary::from_first_log("TR9", ShipmentStatus::InTransit);

        assert_eq!(summary.sender, UNKNOWN_PARTY);
        assert_eq!(summary.recipient, UNKNOWN_PARTY);
        assert_eq!(summary.current_status, ShipmentStatus::InTransit);
    }
}
