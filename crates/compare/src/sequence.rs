use tokio_util::sync::CancellationToken;
use tracing::trace;

use vigil_audit::{AuditRecord, AuditStore};
use vigil_core::{AuditedEntity, ThresholdKind};
use vigil_identity::ResolveIdentity;
use vigil_plans::{SummarisationPlan, ValidationPlan};

use crate::error::CompareError;
use crate::threshold::within;

/// Validate an ordered sequence in memory.
///
/// Each item is compared against the most recent prior item whose
/// discriminator key differs from its own; items with no such prior pass
/// trivially, so empty and single-item sequences always pass. The walk
/// keeps full history and fails on the first failing item.
pub fn validate_sequence<T, K, V, FK, FV, C>(
    items: &[T],
    key_of: FK,
    value_of: FV,
    compare: C,
) -> bool
where
    K: PartialEq,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> V,
    C: Fn(&V, &V) -> bool,
{
    let mut history: Vec<(K, V)> = Vec::with_capacity(items.len());
    for item in items {
        let key = key_of(item);
        let value = value_of(item);
        let prior = history
            .iter()
            .rev()
            .find(|(prior_key, _)| *prior_key != key)
            .map(|(_, prior_value)| prior_value);
        if let Some(prior_value) = prior {
            if !compare(&value, prior_value) {
                return false;
            }
        }
        history.push((key, value));
    }
    true
}

/// [`validate_sequence`] with the default comparison: values must equal the
/// most recent prior value under a different key.
pub fn validate_sequence_eq<T, K, V, FK, FV>(items: &[T], key_of: FK, value_of: FV) -> bool
where
    K: PartialEq,
    V: PartialEq,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> V,
{
    validate_sequence(items, key_of, value_of, |current, prior| current == prior)
}

/// [`validate_sequence`] with the value selector and comparison derived from
/// a summarisation plan's metric and threshold policy.
///
/// An unrecognised policy kind means no constraint is configured and the
/// sequence passes; a negative bound is rejected up front.
pub fn validate_sequence_with_plan<T, K, FK>(
    items: &[T],
    key_of: FK,
    plan: &SummarisationPlan<T>,
) -> Result<bool, CompareError>
where
    K: PartialEq,
    FK: Fn(&T) -> K,
{
    let policy = plan.threshold();
    if policy.kind == ThresholdKind::Unknown {
        return Ok(true);
    }
    if policy.value < 0.0 {
        return Err(CompareError::NegativeThreshold(policy.value));
    }
    Ok(validate_sequence(
        items,
        key_of,
        |item: &T| plan.metric(item),
        |current: &f64, prior: &f64| within(policy.kind, policy.value, *current, *prior),
    ))
}

/// Validate a collection of entities against their audit history.
///
/// Each entity's identity is resolved, its most recent audit record fetched
/// (optionally restricted to one application), and the comparison applied
/// to the selected values. Entities with no history pass trivially. The
/// overall result is the AND across all entities; every entity is visited —
/// this path has no bulk-ordering side effects, so there is nothing to gain
/// from short-circuiting and visiting all entities keeps store access
/// patterns independent of data.
///
/// Resolver and store failures propagate; deciding whether a failure blocks
/// the save is the caller's policy, not this function's.
#[allow(clippy::too_many_arguments)]
pub async fn validate_against_store<T, R, FE, FA, C>(
    entities: &[T],
    resolver: &R,
    store: &dyn AuditStore,
    entity_value: FE,
    record_value: FA,
    compare: C,
    application: Option<&str>,
    cancel: &CancellationToken,
) -> Result<bool, CompareError>
where
    T: AuditedEntity,
    R: ResolveIdentity,
    FE: Fn(&T) -> f64,
    FA: Fn(&AuditRecord) -> f64,
    C: Fn(f64, f64) -> bool,
{
    let mut all_pass = true;
    for entity in entities {
        if cancel.is_cancelled() {
            return Err(CompareError::Cancelled);
        }
        let entity_id = resolver.resolve(entity)?;
        let last = store
            .get_last(T::ENTITY_TYPE, &entity_id, application)
            .await?;
        let Some(last) = last else {
            trace!(entity_type = T::ENTITY_TYPE, %entity_id, "no history, passes");
            continue;
        };
        if !compare(entity_value(entity), record_value(&last)) {
            all_pass = false;
        }
    }
    Ok(all_pass)
}

/// [`validate_against_store`] with the comparison fixed by a
/// [`ValidationPlan`]: absolute difference against the last recorded metric
/// value, at most `plan.threshold`.
pub async fn validate_against_store_with_plan<T, R, FE>(
    entities: &[T],
    resolver: &R,
    store: &dyn AuditStore,
    metric: FE,
    plan: &ValidationPlan,
    application: Option<&str>,
    cancel: &CancellationToken,
) -> Result<bool, CompareError>
where
    T: AuditedEntity,
    R: ResolveIdentity,
    FE: Fn(&T) -> f64,
{
    let threshold = plan.threshold;
    validate_against_store(
        entities,
        resolver,
        store,
        metric,
        |record: &AuditRecord| record.metric_value,
        move |current, previous| (current - previous).abs() <= threshold,
        application,
        cancel,
    )
    .await
}
