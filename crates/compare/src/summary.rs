use vigil_audit::AuditRecord;
use vigil_core::ThresholdKind;
use vigil_plans::SummarisationPlan;

use crate::error::CompareError;
use crate::threshold::is_within_threshold;

/// Validate an entity's summarised metric against the last audit record
/// under its plan.
///
/// No previous record means nothing to compare against: the first save for
/// an identity always passes.
///
/// Unlike [`is_within_threshold`], an unrecognised threshold kind here means
/// "no constraint configured" and passes. Plans come from configuration that
/// may have been written by a newer release; refusing to save over an
/// unknown policy kind would turn a config rollout into an outage. The
/// low-level comparator stays strict; do not unify the two.
pub fn validate_summary<T>(
    entity: &T,
    previous: Option<&AuditRecord>,
    plan: &SummarisationPlan<T>,
) -> Result<bool, CompareError> {
    let Some(previous) = previous else {
        return Ok(true);
    };
    let policy = plan.threshold();
    if policy.kind == ThresholdKind::Unknown {
        return Ok(true);
    }
    is_within_threshold(
        plan.metric(entity),
        previous.metric_value,
        policy.kind,
        policy.value,
        false,
    )
}
