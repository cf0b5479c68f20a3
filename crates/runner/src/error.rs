use thiserror::Error;

use vigil_compare::CompareError;

/// Errors that can occur during validation runs.
///
/// Manual-rule and summarisation outcomes are ordinary booleans, never
/// errors; this type covers missing configuration, collaborator failures
/// on the non-fail-open path, and cancellation.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// No summarisation plan is registered for an entity type that reached
    /// the summarisation step.
    #[error("no summarisation plan registered for entity type '{0}'")]
    MissingPlan(&'static str),

    /// Identity resolution failed.
    #[error("identity error: {0}")]
    Identity(#[from] vigil_identity::IdentityError),

    /// The audit store failed on the summarisation path; the audit write in
    /// particular is never swallowed.
    #[error("audit error: {0}")]
    Audit(#[from] vigil_audit::AuditError),

    /// A comparator rejected its inputs (negative threshold, unknown kind).
    #[error("comparison error: {0}")]
    Compare(CompareError),

    /// The runner was misconfigured (e.g. missing required collaborators).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller's cancellation signal fired before a decision was made.
    #[error("validation cancelled")]
    Cancelled,
}

impl From<CompareError> for RunnerError {
    fn from(err: CompareError) -> Self {
        match err {
            CompareError::Identity(e) => Self::Identity(e),
            CompareError::Audit(e) => Self::Audit(e),
            CompareError::Cancelled => Self::Cancelled,
            other => Self::Compare(other),
        }
    }
}
