use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage model for a health metric reading
///
/// The `value` field is kept loose: older records hold a bare number, blood
/// pressure entries hold `{ "systolic": .., "diastolic": .. }`, and form input
/// sometimes arrives as a numeric string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReading {
    /// Unique identifier for the reading
    pub id: String,

    /// Family member the reading belongs to
    #[serde(default)]
    pub member_id: String,

    /// Metric name (e.g. "bloodPressure", "heartRate")
    pub metric: String,

    /// Raw value as persisted
    #[serde(default)]
    pub value: Value,

    /// Unit label shown next to the value
    #[serde(default)]
    pub unit: String,

    /// When the reading was taken (RFC 3339)
    pub timestamp: String,

    /// Optional free-text note
    #[serde(default)]
    pub notes: Option<String>,
}
