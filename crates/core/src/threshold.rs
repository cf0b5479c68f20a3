use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// How a current metric value is compared against the previously audited one.
///
/// The `Unknown` variant is produced when configuration written by a newer
/// version carries a kind this build does not recognise. The strict
/// comparator rejects it; the plan-driven summarisation comparator treats it
/// as "no constraint configured". That asymmetry is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    /// Percentage-of-change bound: `|current - previous| / |previous| * 100`.
    PercentChange,
    /// Absolute-difference bound: `|current - previous|`.
    RawDifference,
    /// A kind this build does not recognise.
    Unknown,
}

// Unknown kind strings must survive deserialisation rather than fail it, so
// configuration written by a newer release still loads.
impl<'de> Deserialize<'de> for ThresholdKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "percent_change" => Self::PercentChange,
            "raw_difference" => Self::RawDifference,
            _ => Self::Unknown,
        })
    }
}

/// A threshold kind together with its bound.
///
/// `value` is inclusive: a change landing exactly on the bound passes. For
/// [`ThresholdKind::PercentChange`] the value is a percentage number
/// (`25.0` means 25%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    /// The comparison kind.
    pub kind: ThresholdKind,
    /// The inclusive bound. Negative values are rejected at comparison time.
    pub value: f64,
}

impl ThresholdPolicy {
    /// Convenience constructor.
    pub fn new(kind: ThresholdKind, value: f64) -> Self {
        Self { kind, value }
    }

    /// An absolute-difference policy.
    pub fn raw_difference(value: f64) -> Self {
        Self::new(ThresholdKind::RawDifference, value)
    }

    /// A percent-change policy. `value` is a percentage number.
    pub fn percent_change(value: f64) -> Self {
        Self::new(ThresholdKind::PercentChange, value)
    }
}

/// How a sequence-validation plan summarises history.
///
/// Informational today: the core comparison always treats the plan threshold
/// as a maximum allowed absolute difference against the last relevant value.
/// Kept on the plan so backends and dashboards can label what the threshold
/// was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    /// Number of observed values.
    Count,
    /// Sum of observed values.
    Sum,
    /// Arithmetic mean of observed values.
    Average,
    /// Variance of observed values.
    Variance,
}

#[cfg(test)]
mod tests {
    use super::{AggregationStrategy, ThresholdKind, ThresholdPolicy};

    #[test]
    fn unrecognised_kind_deserialises_to_unknown() {
        let kind: ThresholdKind = serde_json::from_str("\"geometric_drift\"").unwrap();
        assert_eq!(kind, ThresholdKind::Unknown);
    }

    #[test]
    fn known_kinds_round_trip() {
        for kind in [ThresholdKind::PercentChange, ThresholdKind::RawDifference] {
            let json = serde_json::to_string(&kind).unwrap();
            let back: ThresholdKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn policy_constructors_set_kind() {
        assert_eq!(
            ThresholdPolicy::raw_difference(5.0).kind,
            ThresholdKind::RawDifference
        );
        assert_eq!(
            ThresholdPolicy::percent_change(25.0).kind,
            ThresholdKind::PercentChange
        );
    }

    #[test]
    fn strategy_serialises_snake_case() {
        let json = serde_json::to_string(&AggregationStrategy::Average).unwrap();
        assert_eq!(json, "\"average\"");
    }
}
