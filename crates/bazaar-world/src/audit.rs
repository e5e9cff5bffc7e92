//! Append-only purchase audit log.
//!
//! Every completed purchase is recorded here and mirrored to the `audit`
//! tracing target as a JSON payload, so operators can follow sales without
//! attaching a debugger to the simulation.

use bazaar_types::{EntityId, PurchaseRecord};
use tracing::{info, warn};

use crate::services::AuditSink;

/// In-memory [`AuditSink`] keeping every record in arrival order.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    records: Vec<PurchaseRecord>,
}

impl AuditLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[PurchaseRecord] {
        &self.records
    }

    /// Records whose buyer is `buyer`.
    pub fn by_buyer(&self, buyer: EntityId) -> impl Iterator<Item = &PurchaseRecord> {
        self.records.iter().filter(move |record| record.buyer == buyer)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no purchase has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AuditSink for AuditLog {
    fn record(&mut self, record: PurchaseRecord) {
        match serde_json::to_string(&record) {
            Ok(payload) => info!(
                target: "audit",
                purchase_id = %record.id,
                buyer = %record.buyer,
                product = %record.product_id,
                payload = %payload,
                "Player purchase"
            ),
            Err(e) => warn!(error = %e, "failed to serialize purchase record"),
        }
        self.records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bazaar_types::{ProductId, PurchaseId, SimTime};
    use chrono::Utc;

    use super::*;

    fn record_for(buyer: EntityId) -> PurchaseRecord {
        PurchaseRecord {
            id: PurchaseId::new(),
            trader: EntityId::new(),
            buyer,
            product_id: ProductId::from("widget"),
            consumed: vec![EntityId::new()],
            granted: BTreeMap::new(),
            at: SimTime::ZERO,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn records_are_kept_in_order() {
        let mut log = AuditLog::new();
        let alice = EntityId::new();
        let bob = EntityId::new();
        log.record(record_for(alice));
        log.record(record_for(bob));
        log.record(record_for(alice));

        assert_eq!(log.len(), 3);
        assert_eq!(log.by_buyer(alice).count(), 2);
        assert_eq!(log.records().first().map(|r| r.buyer), Some(alice));
    }
}
