// 📋 Shipment Summary - Latest known status per tracking id

use crate::models::{ShipmentStatus, ShipmentSummary};
use std::collections::BTreeMap;

/// What `record_status` did to the summary table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryChange {
    Created,
    Updated,
}

#[derive(Debug, Clone, Default)]
pub struct ShipmentSummaryStore {
    rows: Vec<ShipmentSummary>,
}

impl ShipmentSummaryStore {
    pub fn from_rows(rows: Vec<ShipmentSummary>) -> Self {
        ShipmentSummaryStore { rows }
    }

    /// Set the current status for a shipment, creating its row with
    /// unknown sender/recipient on first sight.
    pub fn record_status(&mut self, tracking_id: &str, status: ShipmentStatus) -> SummaryChange {
        // A hand-edited file may carry duplicate rows; all of them follow.
        let mut updated = false;
        for row in self.rows.iter_mut().filter(|row| row.tracking_id == tracking_id) {
            row.current_status = status;
            updated = true;
        }

        if updated {
            SummaryChange::Updated
        } else {
            self.rows
                .push(ShipmentSummary::from_first_log(tracking_id, status));
            SummaryChange::Created
        }
    }

    pub fn get(&self, tracking_id: &str) -> Option<&ShipmentSummary> {
        self.rows.iter().find(|row| row.tracking_id == tracking_id)
    }

    pub fn rows(&self) -> &[ShipmentSummary] {
        &self.rows
    }

    /// Number of shipments currently in each status
    pub fn count_by_status(&self) -> BTreeMap<ShipmentStatus, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.current_status).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_PARTY;

    #[test]
    fn test_record_status_creates_then_updates() {
        let mut store = ShipmentSummaryStore::default();

        assert_eq!(
            store.record_status("TR1", ShipmentStatus::Accepted),
            SummaryChange::Created
        );
        assert_eq!(
            store.record_status("TR1", ShipmentStatus::Delivered),
            SummaryChange::Updated
        );

        assert_eq!(store.len(), 1);
        let row = store.get("TR1").unwrap();
        assert_eq!(row.current_status, ShipmentStatus::Delivered);
        assert_eq!(row.sender, UNKNOWN_PARTY);
    }

    #[test]
    fn test_update_keeps_known_parties() {
        let mut store = ShipmentSummaryStore::from_rows(vec![ShipmentSummary {
            tracking_id: "TR7".to_string(),
            sender: "Ahmet".to_string(),
            recipient: "Zeynep".to_string(),
            current_status: ShipmentStatus::Accepted,
        }]);

        store.record_status("TR7", ShipmentStatus::OutForDelivery);

        let row = store.get("TR7").unwrap();
        assert_eq!(row.sender, "Ahmet");
        assert_eq!(row.recipient, "Zeynep");
        assert_eq!(row.current_status, ShipmentStatus::OutForDelivery);
    }

    #[test]
    fn test_backward_transitions_allowed() {
        let mut store = ShipmentSummaryStore::default();
        store.record_status("TR1", ShipmentStatus::Delivered);
        store.record_status("TR1", ShipmentStatus::Accepted);

        assert_eq!(store.get("TR1").unwrap().current_status, ShipmentStatus::Accepted);
    }

    #[test]
    fn test_count_by_status() {
        let mut store = ShipmentSummaryStore::default();
        store.record_status("TR1", ShipmentStatus::Delivered);
        store.record_status("TR2", ShipmentStatus::Delivered);
        store.record_status("TR3", ShipmentStatus::InTransit);

        let counts = store.count_by_status();
        assert_eq!(counts.get(&ShipmentStatus::Delivered), Some(&2));
        assert_eq!(counts.get(&ShipmentStatus::InTransit), Some(&1));
        assert_eq!(counts.get(&ShipmentStatus::Accepted), None);
    }
}
