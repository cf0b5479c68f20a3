use vigil_core::ThresholdKind;

use crate::error::CompareError;

/// Decide whether `current` is within the configured threshold of
/// `previous`.
///
/// This is the strict, reusable comparator: a negative bound or an
/// unrecognised kind is the caller's bug and fails fast. Pure and callable
/// concurrently without locks.
///
/// - `already_validated` short-circuits to `Ok(true)` — the escape hatch for
///   re-validating data that was already accepted.
/// - `RawDifference` passes iff `|current - previous| <= threshold`.
/// - `PercentChange` treats `threshold` as a percentage number (`25.0` means
///   25%), inclusive. With `previous == 0` the change is defined as 0 when
///   `current == 0` and undefined otherwise; undefined fails regardless of
///   the threshold magnitude.
pub fn is_within_threshold(
    current: f64,
    previous: f64,
    kind: ThresholdKind,
    threshold: f64,
    already_validated: bool,
) -> Result<bool, CompareError> {
    if already_validated {
        return Ok(true);
    }
    if threshold < 0.0 {
        return Err(CompareError::NegativeThreshold(threshold));
    }
    match kind {
        ThresholdKind::Unknown => Err(CompareError::UnsupportedKind),
        kind => Ok(within(kind, threshold, current, previous)),
    }
}

/// The comparison itself, after bounds were vetted. Callers dispatch
/// `Unknown` before reaching this point.
pub(crate) fn within(kind: ThresholdKind, threshold: f64, current: f64, previous: f64) -> bool {
    match kind {
        ThresholdKind::RawDifference => (current - previous).abs() <= threshold,
        ThresholdKind::PercentChange => {
            if previous == 0.0 {
                current == 0.0
            } else {
                let change = (current - previous).abs() / previous.abs() * 100.0;
                change <= threshold
            }
        }
        ThresholdKind::Unknown => true,
    }
}
