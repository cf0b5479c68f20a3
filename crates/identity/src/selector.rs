use std::any::{Any, TypeId};
use std::collections::HashMap;

use vigil_core::AuditedEntity;

use crate::error::IdentityError;
use crate::ResolveIdentity;

type Selector<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Identity resolver backed by explicitly registered per-type selector
/// functions.
///
/// Resolution for a type with no registered selector is an error: this
/// resolver is for deployments where every audited type is known up front
/// and a silent fallback would hide a wiring mistake.
#[derive(Default)]
pub struct SelectorIdentityResolver {
    selectors: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl SelectorIdentityResolver {
    /// Create a resolver with no registered selectors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the identity selector for `T`. The selector must be pure.
    /// Registering again for the same type replaces the previous selector.
    pub fn register<T, F>(&mut self, selector: F)
    where
        T: AuditedEntity,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let boxed: Selector<T> = Box::new(selector);
        self.selectors.insert(TypeId::of::<T>(), Box::new(boxed));
    }

    /// Returns `true` if a selector is registered for `T`.
    pub fn is_registered<T: AuditedEntity>(&self) -> bool {
        self.selectors.contains_key(&TypeId::of::<T>())
    }
}

impl ResolveIdentity for SelectorIdentityResolver {
    fn resolve<T: AuditedEntity>(&self, entity: &T) -> Result<String, IdentityError> {
        let selector = self
            .selectors
            .get(&TypeId::of::<T>())
            .and_then(|any| any.downcast_ref::<Selector<T>>())
            .ok_or(IdentityError::Unregistered(T::ENTITY_TYPE))?;
        Ok(selector(entity))
    }
}

#[cfg(test)]
mod tests {
    use vigil_core::AuditedEntity;

    use super::SelectorIdentityResolver;
    use crate::error::IdentityError;
    use crate::ResolveIdentity;

    #[derive(Debug)]
    struct Invoice {
        number: String,
    }

    impl AuditedEntity for Invoice {
        const ENTITY_TYPE: &'static str = "invoice";
    }

    #[derive(Debug)]
    struct Order;

    impl AuditedEntity for Order {
        const ENTITY_TYPE: &'static str = "order";
    }

    #[test]
    fn registered_selector_resolves() {
        let mut resolver = SelectorIdentityResolver::new();
        resolver.register::<Invoice, _>(|inv| inv.number.clone());

        let invoice = Invoice {
            number: "INV-7".to_owned(),
        };
        assert_eq!(resolver.resolve(&invoice).unwrap(), "INV-7");
    }

    #[test]
    fn unregistered_type_is_an_error() {
        let mut resolver = SelectorIdentityResolver::new();
        resolver.register::<Invoice, _>(|inv| inv.number.clone());

        let err = resolver.resolve(&Order).unwrap_err();
        assert!(matches!(err, IdentityError::Unregistered("order")));
    }

    #[test]
    fn re_registration_replaces_selector() {
        let mut resolver = SelectorIdentityResolver::new();
        resolver.register::<Invoice, _>(|_| "first".to_owned());
        resolver.register::<Invoice, _>(|_| "second".to_owned());

        let invoice = Invoice {
            number: "INV-7".to_owned(),
        };
        assert_eq!(resolver.resolve(&invoice).unwrap(), "second");
        assert!(resolver.is_registered::<Invoice>());
        assert!(!resolver.is_registered::<Order>());
    }
}
