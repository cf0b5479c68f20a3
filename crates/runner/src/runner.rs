use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use vigil_audit::{AuditRecord, AuditStore};
use vigil_compare::{validate_against_store_with_plan, validate_summary, CompareError};
use vigil_core::AuditedEntity;
use vigil_identity::ResolveIdentity;
use vigil_plans::{ManualRuleSet, SummarisationPlanStore, ValidationPlanStore};

use crate::error::RunnerError;
use crate::metrics::RunnerMetrics;

/// Orchestrates the validation pipeline for one entity or a batch.
///
/// The pipeline for each entity:
/// 1. Manual predicate rules for the entity's type.
/// 2. Sequence validation against audit history, only when a
///    [`vigil_plans::ValidationPlan`] is registered; collaborator failures
///    here are swallowed and treated as a pass.
/// 3. Summarisation validation under the type's
///    [`vigil_plans::SummarisationPlan`], which always writes a new audit
///    record carrying the computed outcome.
///
/// The boolean result is the AND of the three steps; the caller decides
/// independently whether to persist the entity.
pub struct ValidationRunner<R> {
    // Note: manual `Debug` impl below because trait objects lack `Debug`.
    pub(crate) audit: Arc<dyn AuditStore>,
    pub(crate) identity: Arc<R>,
    pub(crate) summarisation_plans: Arc<SummarisationPlanStore>,
    pub(crate) validation_plans: Arc<ValidationPlanStore>,
    pub(crate) rules: Arc<ManualRuleSet>,
    pub(crate) application: String,
    pub(crate) metrics: Arc<RunnerMetrics>,
}

impl<R> std::fmt::Debug for ValidationRunner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRunner")
            .field("application", &self.application)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl<R: ResolveIdentity> ValidationRunner<R> {
    /// Validate a single entity through the full pipeline.
    ///
    /// The summarisation step runs and writes its audit record even when an
    /// earlier step already failed, so the trail always reflects the
    /// attempted save.
    #[instrument(skip_all, fields(entity_type = T::ENTITY_TYPE))]
    pub async fn validate<T: AuditedEntity>(
        &self,
        entity: &T,
        cancel: &CancellationToken,
    ) -> Result<bool, RunnerError> {
        self.metrics.increment_validations();

        let manual_ok = self.rules.evaluate(entity);
        debug!(manual_ok, "manual rules evaluated");

        // A manual failure already decides the outcome; the sequence step
        // has no side effects, so its store reads are skipped.
        let sequence_ok = if manual_ok {
            self.sequence_step(std::slice::from_ref(entity), cancel)
                .await?
        } else {
            true
        };

        let summary_ok = self.summary_step(entity, 1, cancel).await?;

        let valid = manual_ok && sequence_ok && summary_ok;
        self.record_outcome(valid);
        info!(valid, manual_ok, sequence_ok, summary_ok, "validation complete");
        Ok(valid)
    }

    /// Validate a batch of entities as one unit.
    ///
    /// Manual rules run per entity first and short-circuit the whole batch:
    /// a batch that fails manual validation issues no audit writes at all.
    /// Sequence validation then runs once over the whole batch. Only when
    /// both phases pass does the per-entity summarisation phase run, writing
    /// one audit record per entity.
    #[instrument(skip_all, fields(entity_type = T::ENTITY_TYPE, batch = entities.len()))]
    pub async fn validate_many<T: AuditedEntity>(
        &self,
        entities: &[T],
        cancel: &CancellationToken,
    ) -> Result<bool, RunnerError> {
        if entities.is_empty() {
            return Ok(true);
        }
        self.metrics.increment_validations();

        for (index, entity) in entities.iter().enumerate() {
            if !self.rules.evaluate(entity) {
                info!(index, "batch rejected by manual rules, no audit records written");
                self.record_outcome(false);
                return Ok(false);
            }
        }

        if !self.sequence_step(entities, cancel).await? {
            info!("batch rejected by sequence validation");
            self.record_outcome(false);
            return Ok(false);
        }

        let batch_size = u32::try_from(entities.len()).unwrap_or(u32::MAX);
        let mut all_valid = true;
        for entity in entities {
            all_valid &= self.summary_step(entity, batch_size, cancel).await?;
        }

        self.record_outcome(all_valid);
        info!(valid = all_valid, "batch validation complete");
        Ok(all_valid)
    }

    /// Return a reference to the runner metrics.
    pub fn metrics(&self) -> &RunnerMetrics {
        &self.metrics
    }

    // -- Pipeline steps -------------------------------------------------------

    /// Sequence validation against audit history.
    ///
    /// Performed only when a validation plan is registered for `T`. Missing
    /// collaborators and collaborator failures are swallowed and treated as
    /// a pass: incomplete auxiliary configuration must never block saves.
    /// Cancellation is the one exception and propagates.
    async fn sequence_step<T: AuditedEntity>(
        &self,
        entities: &[T],
        cancel: &CancellationToken,
    ) -> Result<bool, RunnerError> {
        let Some(validation_plan) = self.validation_plans.get::<T>() else {
            return Ok(true);
        };
        let Some(plan) = self.summarisation_plans.get::<T>() else {
            warn!("sequence validation has no summarisation plan, treating as pass");
            self.metrics.increment_sequence_fail_open();
            return Ok(true);
        };

        let result = validate_against_store_with_plan(
            entities,
            self.identity.as_ref(),
            self.audit.as_ref(),
            |entity: &T| plan.metric(entity),
            validation_plan,
            None,
            cancel,
        )
        .await;

        match result {
            Ok(ok) => {
                debug!(ok, "sequence validation evaluated");
                Ok(ok)
            }
            Err(CompareError::Cancelled) => Err(RunnerError::Cancelled),
            Err(error) => {
                warn!(%error, "sequence validation failed open");
                self.metrics.increment_sequence_fail_open();
                Ok(true)
            }
        }
    }

    /// Summarisation validation plus the unconditional audit write.
    async fn summary_step<T: AuditedEntity>(
        &self,
        entity: &T,
        batch_size: u32,
        cancel: &CancellationToken,
    ) -> Result<bool, RunnerError> {
        let Some(plan) = self.summarisation_plans.get::<T>() else {
            return Err(RunnerError::MissingPlan(T::ENTITY_TYPE));
        };
        let entity_id = self.identity.resolve(entity)?;

        if cancel.is_cancelled() {
            return Err(RunnerError::Cancelled);
        }
        let previous = self.audit.get_last(T::ENTITY_TYPE, &entity_id, None).await?;
        let validated = validate_summary(entity, previous.as_ref(), plan)?;

        // Once issued, the write is never rolled back on cancellation; a
        // silently lost record would poison future comparisons, so write
        // errors propagate.
        if cancel.is_cancelled() {
            return Err(RunnerError::Cancelled);
        }
        let record = AuditRecord::new(
            T::ENTITY_TYPE,
            entity_id,
            self.application.clone(),
            plan.metric(entity),
            batch_size,
            validated,
        );
        self.audit.add(record).await?;
        self.metrics.increment_audit_writes();

        debug!(validated, "summarisation validated and audit record written");
        Ok(validated)
    }

    fn record_outcome(&self, valid: bool) {
        if valid {
            self.metrics.increment_passed();
        } else {
            self.metrics.increment_failed();
        }
    }
}
