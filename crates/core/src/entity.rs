use std::fmt::Debug;

/// Implemented by every type that can pass through the validation pipeline.
///
/// The logical type name keys all per-type configuration (plans, manual
/// rules) and is recorded verbatim in audit records, so it must be stable
/// across releases — prefer a hand-picked name over anything derived from
/// the Rust path.
///
/// The `Debug` bound is what identity resolution falls back to when no
/// registered accessor yields a usable value.
pub trait AuditedEntity: Debug + Send + Sync + 'static {
    /// Stable logical type name, e.g. `"invoice"`.
    const ENTITY_TYPE: &'static str;
}
