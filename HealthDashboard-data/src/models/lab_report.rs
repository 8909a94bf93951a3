use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage model for an uploaded lab report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLabReport {
    /// Unique identifier for the report
    pub id: String,

    /// Family member the report belongs to
    #[serde(default)]
    pub member_id: String,

    /// Report title (e.g. "Complete Blood Count")
    #[serde(default)]
    pub title: String,

    /// Date the sample was taken (YYYY-MM-DD or RFC 3339)
    pub report_date: String,

    /// Measured parameters
    #[serde(default)]
    pub parameters: Vec<StoredLabParameter>,
}

/// Storage model for a single lab parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLabParameter {
    pub name: String,

    #[serde(default)]
    pub value: Value,

    #[serde(default)]
    pub unit: String,

    #[serde(default)]
    pub normal_range_min: Value,

    #[serde(default)]
    pub normal_range_max: Value,
}
