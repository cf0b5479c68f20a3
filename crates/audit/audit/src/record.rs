use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single audit record capturing one validation decision.
///
/// Records are append-only facts: created exactly once per decision, never
/// mutated. For a given `(entity_type, entity_id)` pair only the most recent
/// record by `recorded_at` is consulted by future comparisons; backends may
/// keep full history or coalesce to one row per key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier for this audit record (UUID v4).
    pub id: String,

    /// Logical type name of the validated entity.
    pub entity_type: String,
    /// Resolved identity of the entity, or [`crate::BATCH_ENTITY_ID`] for
    /// batch-level audits.
    pub entity_id: String,

    /// Which logical application wrote this record.
    pub application: String,

    /// The summarised metric value at save time.
    pub metric_value: f64,
    /// Number of items in the batch that produced this record; 1 for
    /// single-entity saves.
    pub batch_size: u32,
    /// Outcome recorded at write time.
    pub validated: bool,

    /// When the decision was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Build a record for a fresh decision, stamping a new id and the
    /// current time.
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        application: impl Into<String>,
        metric_value: f64,
        batch_size: u32,
        validated: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            application: application.into(),
            metric_value,
            batch_size,
            validated,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AuditRecord;

    #[test]
    fn new_stamps_id_and_timestamp() {
        let rec = AuditRecord::new("invoice", "INV-1", "billing", 42.0, 1, true);
        assert!(!rec.id.is_empty());
        assert_eq!(rec.entity_type, "invoice");
        assert_eq!(rec.batch_size, 1);
        assert!(rec.validated);
    }

    #[test]
    fn serialised_layout_keeps_field_names() {
        let rec = AuditRecord::new("invoice", "INV-1", "billing", 42.0, 1, false);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["entity_type"], "invoice");
        assert_eq!(json["metric_value"], 42.0);
        assert_eq!(json["validated"], false);
    }
}
