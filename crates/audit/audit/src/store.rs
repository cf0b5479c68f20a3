use async_trait::async_trait;

use crate::error::AuditError;
use crate::record::AuditRecord;

/// Reserved entity id under which batch-level audits are stored.
///
/// Identity resolution skips blank values and never yields this constant, so
/// batch audits cannot collide with per-entity audits of the same type.
pub const BATCH_ENTITY_ID: &str = "__batch__";

/// Trait for audit record storage backends.
///
/// Implementations must be `Send + Sync` to be shared across async tasks.
/// Concurrent callers across different keys require no external
/// synchronization; writers racing on the identical key are ordered only by
/// the last-write-wins-by-timestamp rule of [`get_last`](Self::get_last).
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist an audit record.
    ///
    /// Backends may replace in place keyed by `(entity_type, entity_id)` or
    /// append full history; either satisfies the `get_last` contract.
    async fn add(&self, record: AuditRecord) -> Result<(), AuditError>;

    /// Retrieve the most recent record by `recorded_at` for the exact key,
    /// optionally restricted to records written by `application`.
    async fn get_last(
        &self,
        entity_type: &str,
        entity_id: &str,
        application: Option<&str>,
    ) -> Result<Option<AuditRecord>, AuditError>;

    /// Persist a batch-level audit record under the reserved batch key.
    ///
    /// The record's `entity_id` is overwritten with [`BATCH_ENTITY_ID`].
    async fn add_batch(&self, mut record: AuditRecord) -> Result<(), AuditError> {
        record.entity_id = BATCH_ENTITY_ID.to_owned();
        self.add(record).await
    }

    /// Retrieve the most recent batch-level record for an entity type.
    async fn get_last_batch(
        &self,
        entity_type: &str,
        application: Option<&str>,
    ) -> Result<Option<AuditRecord>, AuditError> {
        self.get_last(entity_type, BATCH_ENTITY_ID, application).await
    }
}
