use std::any::TypeId;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use vigil_core::{AggregationStrategy, AuditedEntity};

/// Per-entity-type sequence-validation configuration.
///
/// `threshold` is the maximum allowed absolute difference between an
/// entity's current metric and the last audited value; `strategy` labels how
/// the threshold was derived and is carried for backends and dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationPlan {
    /// Logical entity type this plan applies to.
    pub entity_type: String,
    /// Maximum allowed absolute difference against the last audited value.
    pub threshold: f64,
    /// How history is summarised.
    pub strategy: AggregationStrategy,
}

impl ValidationPlan {
    /// Create a plan for entity type `T`.
    pub fn for_entity<T: AuditedEntity>(threshold: f64, strategy: AggregationStrategy) -> Self {
        Self {
            entity_type: T::ENTITY_TYPE.to_owned(),
            threshold,
            strategy,
        }
    }
}

/// Registry of validation plans, one per entity type, last registration
/// wins. Populated at startup and shared read-only thereafter.
#[derive(Debug, Default)]
pub struct ValidationPlanStore {
    plans: HashMap<TypeId, ValidationPlan>,
}

impl ValidationPlanStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the plan for `T`. Last registration wins.
    pub fn register<T: AuditedEntity>(&mut self, plan: ValidationPlan) {
        self.plans.insert(TypeId::of::<T>(), plan);
    }

    /// The plan for `T`, if one was registered.
    pub fn get<T: AuditedEntity>(&self) -> Option<&ValidationPlan> {
        self.plans.get(&TypeId::of::<T>())
    }

    /// Returns `true` if a plan is registered for `T`.
    pub fn has_plan<T: AuditedEntity>(&self) -> bool {
        self.plans.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use vigil_core::{AggregationStrategy, AuditedEntity};

    use super::{ValidationPlan, ValidationPlanStore};

    #[derive(Debug)]
    struct Reading;

    impl AuditedEntity for Reading {
        const ENTITY_TYPE: &'static str = "reading";
    }

    #[test]
    fn for_entity_stamps_type_name() {
        let plan = ValidationPlan::for_entity::<Reading>(3.0, AggregationStrategy::Sum);
        assert_eq!(plan.entity_type, "reading");
        assert_eq!(plan.threshold, 3.0);
    }

    #[test]
    fn store_registration_and_override() {
        let mut store = ValidationPlanStore::new();
        assert!(!store.has_plan::<Reading>());

        store.register::<Reading>(ValidationPlan::for_entity::<Reading>(
            3.0,
            AggregationStrategy::Sum,
        ));
        store.register::<Reading>(ValidationPlan::for_entity::<Reading>(
            7.0,
            AggregationStrategy::Average,
        ));

        let plan = store.get::<Reading>().unwrap();
        assert_eq!(plan.threshold, 7.0);
        assert_eq!(plan.strategy, AggregationStrategy::Average);
    }
}
