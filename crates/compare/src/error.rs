use thiserror::Error;

/// Errors that can occur during comparator evaluation.
#[derive(Debug, Error)]
pub enum CompareError {
    /// A negative threshold bound was supplied; negative thresholds are
    /// meaningless and never silently defaulted.
    #[error("threshold must be non-negative, got {0}")]
    NegativeThreshold(f64),

    /// An unrecognised threshold kind reached the strict comparator.
    #[error("unsupported threshold kind")]
    UnsupportedKind,

    /// Identity resolution failed for an entity under comparison.
    #[error("identity error: {0}")]
    Identity(#[from] vigil_identity::IdentityError),

    /// The audit store failed during a history lookup.
    #[error("audit error: {0}")]
    Audit(#[from] vigil_audit::AuditError),

    /// The caller's cancellation signal fired.
    #[error("validation cancelled")]
    Cancelled,
}
