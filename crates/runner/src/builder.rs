use std::sync::Arc;

use vigil_audit::AuditStore;
use vigil_identity::ResolveIdentity;
use vigil_plans::{ManualRuleSet, SummarisationPlanStore, ValidationPlanStore};

use crate::error::RunnerError;
use crate::metrics::RunnerMetrics;
use crate::runner::ValidationRunner;

/// Fluent builder for constructing a [`ValidationRunner`].
///
/// An [`AuditStore`] and an identity resolver must be supplied. Plan stores
/// and manual rules default to empty (validation then reduces to the
/// summarisation step, which will report missing plans per type), and the
/// application name defaults to `"default"`.
pub struct RunnerBuilder<R> {
    audit: Option<Arc<dyn AuditStore>>,
    identity: Option<Arc<R>>,
    summarisation_plans: SummarisationPlanStore,
    validation_plans: ValidationPlanStore,
    rules: ManualRuleSet,
    application: String,
}

impl<R: ResolveIdentity> RunnerBuilder<R> {
    /// Create a new builder with all optional fields set to their defaults.
    pub fn new() -> Self {
        Self {
            audit: None,
            identity: None,
            summarisation_plans: SummarisationPlanStore::new(),
            validation_plans: ValidationPlanStore::new(),
            rules: ManualRuleSet::new(),
            application: "default".to_owned(),
        }
    }

    /// Set the audit store implementation.
    #[must_use]
    pub fn audit(mut self, store: Arc<dyn AuditStore>) -> Self {
        self.audit = Some(store);
        self
    }

    /// Set the identity resolver.
    #[must_use]
    pub fn identity(mut self, resolver: Arc<R>) -> Self {
        self.identity = Some(resolver);
        self
    }

    /// Set the summarisation plan store.
    #[must_use]
    pub fn summarisation_plans(mut self, plans: SummarisationPlanStore) -> Self {
        self.summarisation_plans = plans;
        self
    }

    /// Set the validation plan store.
    #[must_use]
    pub fn validation_plans(mut self, plans: ValidationPlanStore) -> Self {
        self.validation_plans = plans;
        self
    }

    /// Set the manual rule set.
    #[must_use]
    pub fn manual_rules(mut self, rules: ManualRuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Set the logical application name stamped on written audit records.
    #[must_use]
    pub fn application(mut self, name: impl Into<String>) -> Self {
        self.application = name.into();
        self
    }

    /// Consume the builder and produce a configured [`ValidationRunner`].
    ///
    /// Returns [`RunnerError::Configuration`] if the audit store or the
    /// identity resolver has not been set.
    pub fn build(self) -> Result<ValidationRunner<R>, RunnerError> {
        let audit = self
            .audit
            .ok_or_else(|| RunnerError::Configuration("audit store is required".into()))?;

        let identity = self
            .identity
            .ok_or_else(|| RunnerError::Configuration("identity resolver is required".into()))?;

        Ok(ValidationRunner {
            audit,
            identity,
            summarisation_plans: Arc::new(self.summarisation_plans),
            validation_plans: Arc::new(self.validation_plans),
            rules: Arc::new(self.rules),
            application: self.application,
            metrics: Arc::new(RunnerMetrics::default()),
        })
    }
}

impl<R: ResolveIdentity> Default for RunnerBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}
