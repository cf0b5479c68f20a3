use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use vigil_core::{AuditedEntity, ThresholdPolicy};

/// Per-entity-type summarisation configuration: how to reduce an entity to
/// one metric value, and what change bound that metric must respect between
/// saves.
///
/// The metric selector must be pure and deterministic; it is evaluated on
/// every validation. Plans are immutable once constructed.
pub struct SummarisationPlan<T> {
    metric: Arc<dyn Fn(&T) -> f64 + Send + Sync>,
    threshold: ThresholdPolicy,
}

impl<T> SummarisationPlan<T> {
    /// Create a plan from a metric selector and a threshold policy.
    pub fn new<F>(metric: F, threshold: ThresholdPolicy) -> Self
    where
        F: Fn(&T) -> f64 + Send + Sync + 'static,
    {
        Self {
            metric: Arc::new(metric),
            threshold,
        }
    }

    /// Evaluate the metric selector against an entity.
    pub fn metric(&self, entity: &T) -> f64 {
        (self.metric)(entity)
    }

    /// The configured threshold policy.
    pub fn threshold(&self) -> ThresholdPolicy {
        self.threshold
    }
}

impl<T> Clone for SummarisationPlan<T> {
    fn clone(&self) -> Self {
        Self {
            metric: Arc::clone(&self.metric),
            threshold: self.threshold,
        }
    }
}

impl<T> fmt::Debug for SummarisationPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarisationPlan")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

/// Registry of summarisation plans, one per entity type.
///
/// Populated at startup, then frozen behind an `Arc` and shared read-only.
/// Registering a second plan for the same type replaces the first.
#[derive(Default)]
pub struct SummarisationPlanStore {
    plans: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl SummarisationPlanStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the plan for `T`. Last registration wins.
    pub fn register<T: AuditedEntity>(&mut self, plan: SummarisationPlan<T>) {
        self.plans.insert(TypeId::of::<T>(), Box::new(plan));
    }

    /// The plan for `T`, if one was registered.
    pub fn get<T: AuditedEntity>(&self) -> Option<&SummarisationPlan<T>> {
        self.plans
            .get(&TypeId::of::<T>())
            .and_then(|any| any.downcast_ref::<SummarisationPlan<T>>())
    }

    /// Returns `true` if a plan is registered for `T`.
    pub fn has_plan<T: AuditedEntity>(&self) -> bool {
        self.plans.contains_key(&TypeId::of::<T>())
    }
}
