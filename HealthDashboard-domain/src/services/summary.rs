use crate::entities::classification::{ParameterClassification, ParameterStatus};
use crate::entities::summary::{AnalysisSummary, OverallStatus, RiskLevel};

/// Abnormal values tolerated before a summary needs attention
pub const DEFAULT_ATTENTION_THRESHOLD: usize = 2;

pub const RECOMMEND_IMMEDIATE_ATTENTION: &str = "Immediate medical attention required";
pub const RECOMMEND_FOLLOW_UP: &str = "Follow up with healthcare provider";
pub const RECOMMEND_CONTINUE_MONITORING: &str = "Continue monitoring";

/// Summarize a set of statuses
///
/// Critical dominates: any critical value makes the summary critical with
/// high risk. Otherwise more than `attention_threshold` abnormal values
/// means attention with medium risk. Recommendations are appended in rule
/// order, not by severity.
pub fn summarize_statuses<I>(statuses: I, attention_threshold: usize) -> AnalysisSummary
where
    I: IntoIterator<Item = ParameterStatus>,
{
    let mut normal_count = 0;
    let mut abnormal_count = 0;
    let mut critical_count = 0;
    let mut unclassified_count = 0;

    for status in statuses {
        match status {
            ParameterStatus::Normal => normal_count += 1,
            ParameterStatus::Critical => critical_count += 1,
            ParameterStatus::Unknown => unclassified_count += 1,
            ParameterStatus::Elevated | ParameterStatus::High | ParameterStatus::Low => abnormal_count += 1,
        }
    }

    let (overall_status, risk_level) = if critical_count > 0 {
        (OverallStatus::Critical, RiskLevel::High)
    } else if abnormal_count > attention_threshold {
        (OverallStatus::Attention, RiskLevel::Medium)
    } else {
        (OverallStatus::Healthy, RiskLevel::Low)
    };

    let mut recommendations = Vec::new();
    if critical_count > 0 {
        recommendations.push(RECOMMEND_IMMEDIATE_ATTENTION.to_string());
    }
    if abnormal_count > 0 {
        recommendations.push(RECOMMEND_FOLLOW_UP.to_string());
    }
    if normal_count > 0 {
        recommendations.push(RECOMMEND_CONTINUE_MONITORING.to_string());
    }

    AnalysisSummary {
        total: normal_count + abnormal_count + critical_count,
        normal_count,
        abnormal_count,
        critical_count,
        unclassified_count,
        overall_status,
        risk_level,
        recommendations,
    }
}

/// Summarize classifications with a configurable attention threshold
pub fn summarize_with_threshold(
    classifications: &[ParameterClassification],
    attention_threshold: usize,
) -> AnalysisSummary {
    summarize_statuses(classifications.iter().map(|c| c.status), attention_threshold)
}

/// Summarize classifications with the default attention threshold
///
/// `Unknown` statuses go to `unclassified_count` and are not part of `total`,
/// so `total` can be smaller than `classifications.len()`.
pub fn summarize(classifications: &[ParameterClassification]) -> AnalysisSummary {
    summarize_with_threshold(classifications, DEFAULT_ATTENTION_THRESHOLD)
}
