use std::any::{Any, TypeId};
use std::collections::HashMap;

use tracing::debug;

use vigil_core::AuditedEntity;

use crate::error::IdentityError;
use crate::ResolveIdentity;

/// Candidate field names probed when no explicit priority list is supplied,
/// in priority order.
pub const DEFAULT_FIELD_PRIORITY: [&str; 6] =
    ["Name", "Code", "Key", "Identifier", "Title", "Label"];

/// A named accessor exposing one identity-candidate field of `T`.
///
/// The accessor returns `None` when the field is absent for the instance;
/// blank and whitespace-only values are skipped by the resolver itself.
pub struct FieldAccessor<T> {
    name: &'static str,
    get: Box<dyn Fn(&T) -> Option<String> + Send + Sync>,
}

impl<T> FieldAccessor<T> {
    /// Create an accessor for the field called `name`. Matching against the
    /// priority list is exact and case-sensitive.
    pub fn new<F>(name: &'static str, get: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name,
            get: Box::new(get),
        }
    }
}

/// Identity resolver that probes registered field accessors in priority
/// order, falling back to the entity's `Debug` representation.
///
/// This is the typed rendition of field-name discovery: instead of runtime
/// introspection, each type registers named accessors once at startup. The
/// priority-ordered probe sequence for a type is computed at registration
/// and reused for every resolution.
pub struct FieldIdentityResolver {
    priority: Vec<String>,
    probes: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl FieldIdentityResolver {
    /// Create a resolver using [`DEFAULT_FIELD_PRIORITY`].
    pub fn new() -> Self {
        Self::with_priority(Vec::new())
    }

    /// Create a resolver with an explicit candidate-name priority list.
    /// An empty list falls back to [`DEFAULT_FIELD_PRIORITY`].
    pub fn with_priority(priority: Vec<String>) -> Self {
        let priority = if priority.is_empty() {
            DEFAULT_FIELD_PRIORITY.iter().map(|s| (*s).to_owned()).collect()
        } else {
            priority
        };
        Self {
            priority,
            probes: HashMap::new(),
        }
    }

    /// Register the candidate field accessors for `T`.
    ///
    /// Accessors are reordered into the resolver's priority order here, once
    /// per type; accessors whose name appears nowhere in the priority list
    /// are never probed. Registering again replaces the previous set.
    pub fn register<T: AuditedEntity>(&mut self, accessors: Vec<FieldAccessor<T>>) {
        let mut ordered: Vec<FieldAccessor<T>> = Vec::with_capacity(accessors.len());
        let mut remaining = accessors;
        for candidate in &self.priority {
            // Exact, case-sensitive name match.
            let mut i = 0;
            while i < remaining.len() {
                if remaining[i].name == candidate {
                    ordered.push(remaining.swap_remove(i));
                } else {
                    i += 1;
                }
            }
        }
        debug!(
            entity_type = T::ENTITY_TYPE,
            probes = ordered.len(),
            "field probe order cached"
        );
        self.probes.insert(TypeId::of::<T>(), Box::new(ordered));
    }

    /// Returns `true` if accessors are registered for `T`.
    pub fn is_registered<T: AuditedEntity>(&self) -> bool {
        self.probes.contains_key(&TypeId::of::<T>())
    }
}

impl Default for FieldIdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveIdentity for FieldIdentityResolver {
    fn resolve<T: AuditedEntity>(&self, entity: &T) -> Result<String, IdentityError> {
        if let Some(probes) = self
            .probes
            .get(&TypeId::of::<T>())
            .and_then(|any| any.downcast_ref::<Vec<FieldAccessor<T>>>())
        {
            for probe in probes {
                if let Some(value) = (probe.get)(entity) {
                    if !value.trim().is_empty() {
                        return Ok(value);
                    }
                }
            }
        }
        // No candidate yielded a usable value.
        Ok(format!("{entity:?}"))
    }
}
