use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::classification::{NormalRange, ParameterClassification};
use super::summary::AnalysisSummary;

/// One measured parameter on a lab report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabParameter {
    pub name: String,
    pub value: Option<f64>,
    pub unit: String,
    pub normal_range_min: Option<f64>,
    pub normal_range_max: Option<f64>,
}

impl LabParameter {
    /// Normal range, when both bounds are present and well-formed
    pub fn range(&self) -> Option<NormalRange> {
        match (self.normal_range_min, self.normal_range_max) {
            (Some(min), Some(max)) => NormalRange::new(min, max),
            _ => None,
        }
    }
}

/// An uploaded lab report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabReport {
    pub id: String,
    pub member_id: String,
    pub title: String,
    pub report_date: NaiveDate,
    pub parameters: Vec<LabParameter>,
}

/// Classified parameters and summary for one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabAnalysis {
    pub report_id: String,
    pub member_id: String,
    pub report_date: NaiveDate,
    /// Report the trends were computed against
    pub previous_report_id: Option<String>,
    pub classifications: Vec<ParameterClassification>,
    pub summary: AnalysisSummary,
}
