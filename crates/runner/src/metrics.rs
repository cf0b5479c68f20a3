use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters tracking validation outcomes.
///
/// All counters use relaxed ordering for maximum throughput. For a
/// consistent point-in-time view, call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct RunnerMetrics {
    /// Total number of validation calls (single and batch).
    pub validations: AtomicU64,
    /// Calls whose overall result was valid.
    pub passed: AtomicU64,
    /// Calls whose overall result was invalid.
    pub failed: AtomicU64,
    /// Audit records written.
    pub audit_writes: AtomicU64,
    /// Sequence-validation steps that failed open on a collaborator error.
    pub sequence_fail_open: AtomicU64,
}

impl RunnerMetrics {
    /// Increment the validations counter.
    pub fn increment_validations(&self) {
        self.validations.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the passed counter.
    pub fn increment_passed(&self) {
        self.passed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the failed counter.
    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the audit-writes counter.
    pub fn increment_audit_writes(&self) {
        self.audit_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the sequence fail-open counter.
    pub fn increment_sequence_fail_open(&self) {
        self.sequence_fail_open.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            validations: self.validations.load(Ordering::Relaxed),
            passed: self.passed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            audit_writes: self.audit_writes.load(Ordering::Relaxed),
            sequence_fail_open: self.sequence_fail_open.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`RunnerMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub validations: u64,
    pub passed: u64,
    pub failed: u64,
    pub audit_writes: u64,
    pub sequence_fail_open: u64,
}

#[cfg(test)]
mod tests {
    use super::RunnerMetrics;

    #[test]
    fn counters_start_at_zero() {
        let metrics = RunnerMetrics::default();
        let snap = metrics.snapshot();
        assert_eq!(snap.validations, 0);
        assert_eq!(snap.audit_writes, 0);
    }

    #[test]
    fn increments_are_visible_in_snapshot() {
        let metrics = RunnerMetrics::default();
        metrics.increment_validations();
        metrics.increment_validations();
        metrics.increment_passed();
        metrics.increment_sequence_fail_open();

        let snap = metrics.snapshot();
        assert_eq!(snap.validations, 2);
        assert_eq!(snap.passed, 1);
        assert_eq!(snap.failed, 0);
        assert_eq!(snap.sequence_fail_open, 1);
    }
}
