// 📊 Views - Customer lookup, session, manager overview
//
// Plain data returned by the repository for each of the three views.
// Presentation is left to the CLI and the API server.

use crate::models::{LogEntry, Role, ShipmentStatus, ShipmentSummary, UserAccount};
use crate::timestamp::format_display;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Fixed offset added to the latest event. A placeholder, not a model.
pub const ESTIMATE_OFFSET_HOURS: i64 = 24;

// ============================================================================
// DELIVERY ESTIMATE
// ============================================================================

/// Naive ETA: latest event + 24h, or "-" with no history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum DeliveryEstimate {
    Unknown,
    At(NaiveDateTime),
}

impl fmt::Display for DeliveryEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryEstimate::Unknown => f.write_str("-"),
            DeliveryEstimate::At(ts) => f.write_str(&format_display(ts)),
        }
    }
}

impl From<DeliveryEstimate> for String {
    fn from(estimate: DeliveryEstimate) -> Self {
        estimate.to_string()
    }
}

pub fn estimate_delivery(history: &[LogEntry]) -> DeliveryEstimate {
    match history.iter().map(|entry| entry.timestamp).max() {
        Some(latest) => DeliveryEstimate::At(latest + Duration::hours(ESTIMATE_OFFSET_HOURS)),
        None => DeliveryEstimate::Unknown,
    }
}

// ============================================================================
// CUSTOMER LOOKUP
// ============================================================================

/// Everything the customer view shows for one shipment
#[derive(Debug, Clone, Serialize)]
pub struct TrackingReport {
    pub tracking_id: String,
    pub current_status: ShipmentStatus,
    pub current_location: String,
    pub delivered: bool,
    pub estimated_delivery: DeliveryEstimate,
    /// Oldest first
    pub history: Vec<LogEntry>,
}

impl TrackingReport {
    /// Build from a non-empty history; `None` if the history is empty
    pub fn from_history(tracking_id: &str, history: Vec<LogEntry>) -> Option<Self> {
        let latest = history.last()?.clone();

        Some(TrackingReport {
            tracking_id: tracking_id.to_string(),
            current_status: latest.status,
            current_location: latest.location,
            delivered: latest.status.is_delivered(),
            estimated_delivery: estimate_delivery(&history),
            history,
        })
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

// ============================================================================
// MANAGER OVERVIEW
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ManagerReport {
    pub accounts: Vec<UserAccount>,
    pub shipments: Vec<ShipmentSummary>,
    pub by_status: BTreeMap<ShipmentStatus, usize>,
    pub total_events: usize,
}

impl ManagerReport {
    pub fn shipment_count(&self) -> usize {
        self.shipments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_estimate_empty_history() {
        let estimate = estimate_delivery(&[]);

        assert_eq!(estimate, DeliveryEstimate::Unknown);
        assert_eq!(estimate.to_string(), "-");
    }

    #[test]
    fn test_estimate_is_latest_plus_one_day() {
        let history = vec![
            LogEntry::new("TR1", at(14, 9, 0), "Istanbul", ShipmentStatus::Accepted),
            LogEntry::new("TR1", at(15, 18, 30), "Ankara", ShipmentStatus::InTransit),
        ];

        let estimate = estimate_delivery(&history);
        assert_eq!(estimate, DeliveryEstimate::At(at(16, 18, 30)));
        assert_eq!(estimate.to_string(), "16/12/2025 18:30");
    }

    #[test]
    fn test_estimate_crosses_month_end() {
        let ts = NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let history = vec![LogEntry::new("TR1", ts, "Izmir", ShipmentStatus::OutForDelivery)];

        assert_eq!(estimate_delivery(&history).to_string(), "01/01/2026 23:59");
    }

    #[test]
    fn test_tracking_report_uses_latest_entry() {
        let history = vec![
            LogEntry::new("TR1", at(14, 9, 0), "Istanbul", ShipmentStatus::Accepted),
            LogEntry::new("TR1", at(15, 10, 0), "Kadikoy", ShipmentStatus::Delivered),
        ];

        let report = TrackingReport::from_history("TR1", history).unwrap();
        assert_eq!(report.current_status, ShipmentStatus::Delivered);
        assert_eq!(report.current_location, "Kadikoy");
        assert!(report.delivered);
        assert_eq!(report.history.len(), 2);

        assert!(TrackingReport::from_history("TR1", vec![]).is_none());
    }

    #[test]
    fn test_estimate_serializes_as_display_string() {
        let json = serde_json::to_string(&DeliveryEstimate::At(at(1, 8, 5))).unwrap();
        assert_eq!(json, "\"01/12/2025 08:05\"");

        let json = serde_json::to_string(&DeliveryEstimate::Unknown).unwrap();
        assert_eq!(json, "\"-\"");
    }
}
