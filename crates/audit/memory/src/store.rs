use async_trait::async_trait;
use dashmap::DashMap;

use vigil_audit::error::AuditError;
use vigil_audit::record::AuditRecord;
use vigil_audit::store::AuditStore;

/// Storage key: one history per `(entity_type, entity_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AuditKey {
    entity_type: String,
    entity_id: String,
}

/// In-memory audit store using `DashMap`. Suitable for development and
/// testing.
///
/// Full history is appended per key; `get_last` scans the history for the
/// most recent record by `recorded_at`, which makes interleaved same-key
/// writers consistent with the last-write-wins-by-timestamp rule without
/// any locking beyond the per-shard map locks.
pub struct MemoryAuditStore {
    records: DashMap<AuditKey, Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    /// Create a new empty in-memory audit store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Total number of records across all keys.
    pub fn len(&self) -> usize {
        self.records.iter().map(|entry| entry.value().len()).sum()
    }

    /// Returns `true` if no record has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full history for a key, oldest first. Test/diagnostic helper.
    pub fn history(&self, entity_type: &str, entity_id: &str) -> Vec<AuditRecord> {
        let key = AuditKey {
            entity_type: entity_type.to_owned(),
            entity_id: entity_id.to_owned(),
        };
        self.records
            .get(&key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

impl Default for MemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn add(&self, record: AuditRecord) -> Result<(), AuditError> {
        let key = AuditKey {
            entity_type: record.entity_type.clone(),
            entity_id: record.entity_id.clone(),
        };
        self.records.entry(key).or_default().push(record);
        Ok(())
    }

    async fn get_last(
        &self,
        entity_type: &str,
        entity_id: &str,
        application: Option<&str>,
    ) -> Result<Option<AuditRecord>, AuditError> {
        let key = AuditKey {
            entity_type: entity_type.to_owned(),
            entity_id: entity_id.to_owned(),
        };
        let Some(history) = self.records.get(&key) else {
            return Ok(None);
        };

        // Return the most recent matching record for this key.
        let mut best: Option<&AuditRecord> = None;
        for rec in history.value() {
            if let Some(app) = application {
                if rec.application != app {
                    continue;
                }
            }
            // `>=` so that ties on recorded_at resolve to the later append.
            if best.is_none_or(|b| rec.recorded_at >= b.recorded_at) {
                best = Some(rec);
            }
        }
        Ok(best.cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use vigil_audit::record::AuditRecord;
    use vigil_audit::store::{AuditStore, BATCH_ENTITY_ID};

    use super::MemoryAuditStore;

    fn make_record(entity_type: &str, entity_id: &str) -> AuditRecord {
        AuditRecord::new(entity_type, entity_id, "app", 10.0, 1, true)
    }

    #[tokio::test]
    async fn add_and_get_last() {
        let store = MemoryAuditStore::new();
        store.add(make_record("invoice", "INV-1")).await.unwrap();

        let found = store.get_last("invoice", "INV-1", None).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().entity_id, "INV-1");
    }

    #[tokio::test]
    async fn get_last_returns_most_recent_by_timestamp() {
        let store = MemoryAuditStore::new();
        let now = Utc::now();

        let mut older = make_record("invoice", "INV-1");
        older.metric_value = 1.0;
        older.recorded_at = now - Duration::seconds(10);
        store.add(older).await.unwrap();

        let mut newer = make_record("invoice", "INV-1");
        newer.metric_value = 2.0;
        newer.recorded_at = now;
        store.add(newer).await.unwrap();

        // Insertion order must not matter, only recorded_at.
        let mut middle = make_record("invoice", "INV-1");
        middle.metric_value = 1.5;
        middle.recorded_at = now - Duration::seconds(5);
        store.add(middle).await.unwrap();

        let found = store.get_last("invoice", "INV-1", None).await.unwrap().unwrap();
        assert_eq!(found.metric_value, 2.0);
    }

    #[tokio::test]
    async fn get_last_filters_by_application() {
        let store = MemoryAuditStore::new();
        let now = Utc::now();

        let mut billing = make_record("invoice", "INV-1");
        billing.application = "billing".to_owned();
        billing.metric_value = 1.0;
        billing.recorded_at = now - Duration::seconds(10);
        store.add(billing).await.unwrap();

        let mut reporting = make_record("invoice", "INV-1");
        reporting.application = "reporting".to_owned();
        reporting.metric_value = 2.0;
        reporting.recorded_at = now;
        store.add(reporting).await.unwrap();

        let unfiltered = store.get_last("invoice", "INV-1", None).await.unwrap().unwrap();
        assert_eq!(unfiltered.metric_value, 2.0);

        let filtered = store
            .get_last("invoice", "INV-1", Some("billing"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(filtered.metric_value, 1.0);

        let missing = store
            .get_last("invoice", "INV-1", Some("unknown-app"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn keys_do_not_collide_across_types_or_ids() {
        let store = MemoryAuditStore::new();
        store.add(make_record("invoice", "X")).await.unwrap();
        store.add(make_record("order", "X")).await.unwrap();
        store.add(make_record("invoice", "Y")).await.unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.history("invoice", "X").len(), 1);
        assert_eq!(store.history("order", "X").len(), 1);
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let store = MemoryAuditStore::new();
        assert!(store.get_last("invoice", "nope", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn batch_records_use_reserved_key() {
        let store = MemoryAuditStore::new();
        store.add(make_record("invoice", "INV-1")).await.unwrap();
        store.add_batch(make_record("invoice", "ignored")).await.unwrap();

        let batch = store.get_last_batch("invoice", None).await.unwrap().unwrap();
        assert_eq!(batch.entity_id, BATCH_ENTITY_ID);

        // The per-entity record is untouched by the batch write.
        let single = store.get_last("invoice", "INV-1", None).await.unwrap().unwrap();
        assert_eq!(single.entity_id, "INV-1");
    }

    #[tokio::test]
    async fn history_preserves_append_order() {
        let store = MemoryAuditStore::new();
        for value in [1.0, 2.0, 3.0] {
            let mut rec = make_record("invoice", "INV-1");
            rec.metric_value = value;
            store.add(rec).await.unwrap();
        }
        let history = store.history("invoice", "INV-1");
        let values: Vec<f64> = history.iter().map(|r| r.metric_value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}
