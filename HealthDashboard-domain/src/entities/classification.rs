use serde::{Deserialize, Serialize};
use std::fmt;

use super::reading::MetricKind;

/// Status bucket assigned to a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStatus {
    Normal,
    Elevated,
    High,
    Low,
    Critical,
    /// Value missing, malformed, or no rule applies
    Unknown,
}

impl ParameterStatus {
    /// Elevated, high and low count as abnormal; critical is tracked separately
    pub fn is_abnormal(&self) -> bool {
        matches!(self, ParameterStatus::Elevated | ParameterStatus::High | ParameterStatus::Low)
    }

    /// Badge label shown by the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            ParameterStatus::Normal => "Normal",
            ParameterStatus::Elevated => "Elevated",
            ParameterStatus::High => "High",
            ParameterStatus::Low => "Low",
            ParameterStatus::Critical => "Critical",
            ParameterStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ParameterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of change between the two most recent values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Inclusive normal range supplied with a lab parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalRange {
    pub min: f64,
    pub max: f64,
}

impl NormalRange {
    /// Build a range, rejecting non-finite or inverted bounds
    pub fn new(min: f64, max: f64) -> Option<Self> {
        (min.is_finite() && max.is_finite() && min <= max).then_some(Self { min, max })
    }

    /// Whether `value` lies within the range, bounds included
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for NormalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Classification of one named value, derived on every read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterClassification {
    pub name: String,
    pub metric: MetricKind,
    pub value: Option<f64>,
    pub unit: String,
    pub range: Option<NormalRange>,
    pub status: ParameterStatus,
    /// Change against the previous value of the same parameter, if known
    pub trend: Option<TrendDirection>,
}
