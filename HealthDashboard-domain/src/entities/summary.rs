use serde::{Deserialize, Serialize};

/// Overall status of a report or check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Attention,
    Critical,
}

/// Risk level shown next to the overall status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Rollup of the classifications belonging to one report or check-in
///
/// `normal_count + abnormal_count + critical_count == total`. Values that
/// could not be classified are counted in `unclassified_count` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total: usize,
    pub normal_count: usize,
    pub abnormal_count: usize,
    pub critical_count: usize,
    pub unclassified_count: usize,
    pub overall_status: OverallStatus,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
}
