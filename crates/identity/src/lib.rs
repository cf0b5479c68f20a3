pub mod error;
pub mod fields;
pub mod selector;

pub use error::IdentityError;
pub use fields::{FieldAccessor, FieldIdentityResolver, DEFAULT_FIELD_PRIORITY};
pub use selector::SelectorIdentityResolver;

use vigil_core::AuditedEntity;

/// Derives a stable string identity for an entity instance, used to
/// correlate it with its audit history.
///
/// Implementations are read-only configuration after startup and must be
/// shareable across concurrent validations.
pub trait ResolveIdentity: Send + Sync {
    /// Resolve the identity of `entity`.
    fn resolve<T: AuditedEntity>(&self, entity: &T) -> Result<String, IdentityError>;
}
