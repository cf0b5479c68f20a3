use std::any::{Any, TypeId};
use std::collections::HashMap;

use vigil_core::AuditedEntity;

type Rules<T> = Vec<Box<dyn Fn(&T) -> bool + Send + Sync>>;

/// Per-type ordered lists of manual validation predicates.
///
/// Registration is additive: later `add_rule` calls append, they never
/// replace. A type with no rules passes trivially. Built once at setup and
/// shared read-only afterwards.
#[derive(Default)]
pub struct ManualRuleSet {
    rules: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ManualRuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate for `T`.
    pub fn add_rule<T, F>(&mut self, rule: F)
    where
        T: AuditedEntity,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let entry = self
            .rules
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Rules::<T>::new()));
        if let Some(rules) = entry.downcast_mut::<Rules<T>>() {
            rules.push(Box::new(rule));
        }
    }

    /// Evaluate all predicates for `T` in registration order. Returns
    /// `false` on the first failing predicate, `true` when every predicate
    /// passes or none are registered.
    pub fn evaluate<T: AuditedEntity>(&self, entity: &T) -> bool {
        let Some(rules) = self
            .rules
            .get(&TypeId::of::<T>())
            .and_then(|any| any.downcast_ref::<Rules<T>>())
        else {
            return true;
        };
        rules.iter().all(|rule| rule(entity))
    }

    /// Number of predicates registered for `T`.
    pub fn rule_count<T: AuditedEntity>(&self) -> usize {
        self.rules
            .get(&TypeId::of::<T>())
            .and_then(|any| any.downcast_ref::<Rules<T>>())
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use vigil_core::AuditedEntity;

    use super::ManualRuleSet;

    #[derive(Debug)]
    struct Customer {
        name: String,
        age: i32,
    }

    impl AuditedEntity for Customer {
        const ENTITY_TYPE: &'static str = "customer";
    }

    fn customer(name: &str, age: i32) -> Customer {
        Customer {
            name: name.to_owned(),
            age,
        }
    }

    #[test]
    fn no_rules_passes_trivially() {
        let rules = ManualRuleSet::new();
        assert!(rules.evaluate(&customer("ada", 36)));
        assert_eq!(rules.rule_count::<Customer>(), 0);
    }

    #[test]
    fn all_rules_must_pass() {
        let mut rules = ManualRuleSet::new();
        rules.add_rule(|c: &Customer| !c.name.is_empty());
        rules.add_rule(|c: &Customer| c.age >= 0);

        assert_eq!(rules.rule_count::<Customer>(), 2);
        assert!(rules.evaluate(&customer("ada", 36)));
        assert!(!rules.evaluate(&customer("", 36)));
        assert!(!rules.evaluate(&customer("ada", -1)));
    }

    #[test]
    fn registration_is_additive() {
        let mut rules = ManualRuleSet::new();
        rules.add_rule(|c: &Customer| !c.name.is_empty());
        // A second registration appends rather than replacing.
        rules.add_rule(|c: &Customer| c.age < 150);

        assert_eq!(rules.rule_count::<Customer>(), 2);
        assert!(!rules.evaluate(&customer("ada", 200)));
    }
}
