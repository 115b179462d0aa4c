// 📜 Shipment Log - Append-only event history

use crate::models::LogEntry;

/// Ordered log of (tracking_id, timestamp, location, status) events
#[derive(Debug, Clone, Default)]
pub struct ShipmentLogStore {
    entries: Vec<LogEntry>,
}

impl ShipmentLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded rows, ordered by timestamp. Rows with equal
    /// timestamps keep their file order.
    pub fn from_entries(mut entries: Vec<LogEntry>) -> Self {
        entries.sort_by_key(|entry| entry.timestamp);
        ShipmentLogStore { entries }
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// All entries for a tracking id, oldest first. `None` when the id has
    /// never been logged.
    pub fn history(&self, tracking_id: &str) -> Option<Vec<LogEntry>> {
        let mut history: Vec<LogEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.tracking_id == tracking_id)
            .cloned()
            .collect();

        if history.is_empty() {
            return None;
        }

        history.sort_by_key(|entry| entry.timestamp);
        Some(history)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShipmentStatus;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 15)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_history_is_sorted_and_filtered() {
        let store = ShipmentLogStore::from_entries(vec![
            LogEntry::new("TR1", at(12, 0), "Ankara", ShipmentStatus::ArrivedAtHub),
            LogEntry::new("TR2", at(9, 0), "Izmir", ShipmentStatus::Accepted),
            LogEntry::new("TR1", at(8, 0), "Istanbul", ShipmentStatus::Accepted),
        ]);

        let history = store.history("TR1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].location, "Istanbul");
        assert_eq!(history[1].location, "Ankara");

        // Loaded rows are kept in timestamp order
        assert_eq!(store.entries()[0].tracking_id, "TR1");
        assert_eq!(store.entries()[1].tracking_id, "TR2");
    }

    #[test]
    fn test_history_unknown_id_is_none() {
        let mut store = ShipmentLogStore::new();
        assert!(store.history("TR1").is_none());

        store.append(LogEntry::new("TR1", at(8, 0), "Istanbul", ShipmentStatus::Accepted));
        assert!(store.history("tr1").is_none());
        assert!(store.history("TR1").is_some());
    }

    #[test]
    fn test_equal_timestamps_keep_append_order() {
        let mut store = ShipmentLogStore::new();
        store.append(LogEntry::new("TR1", at(8, 0), "Gate A", ShipmentStatus::Accepted));
        store.append(LogEntry::new("TR1", at(8, 0), "Gate B", ShipmentStatus::InTransit));

        let history = store.history("TR1").unwrap();
        assert_eq!(history.last().unwrap().location, "Gate B");
        assert_eq!(store.len(), 2);
    }
}
