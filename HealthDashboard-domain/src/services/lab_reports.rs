use tracing::{debug, info};

use health_dashboard_data::models::StoredLabReport;
use health_dashboard_data::repository::{collections, load_collection, load_collection_for_write, CollectionStore};

use crate::config::DashboardConfig;
use crate::entities::classification::ParameterClassification;
use crate::entities::conversions::{convert_to_data_lab_report, convert_to_domain_lab_report};
use crate::entities::lab_report::{LabAnalysis, LabParameter, LabReport};
use crate::services::classifier::classify_parameter;
use crate::services::errors::ServiceError;
use crate::services::summary::{summarize_with_threshold, DEFAULT_ATTENTION_THRESHOLD};
use crate::services::trend::compare;

fn same_parameter(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn previous_value(previous: Option<&LabReport>, parameter: &LabParameter) -> Option<f64> {
    previous?
        .parameters
        .iter()
        .find(|p| same_parameter(&p.name, &parameter.name))?
        .value
        .filter(|v| v.is_finite())
}

/// Classify every parameter of `report` and summarize
///
/// Trends are taken against the same-named parameter of `previous`, when
/// both values are present.
pub fn analyze_report(
    report: &LabReport,
    previous: Option<&LabReport>,
    attention_threshold: usize,
) -> LabAnalysis {
    let classifications: Vec<ParameterClassification> = report
        .parameters
        .iter()
        .map(|parameter| {
            let mut classification = classify_parameter(parameter);
            classification.trend = match (classification.value, previous_value(previous, parameter)) {
                (Some(current), Some(earlier)) => Some(compare(current, earlier)),
                _ => None,
            };
            classification
        })
        .collect();

    let summary = summarize_with_threshold(&classifications, attention_threshold);

    LabAnalysis {
        report_id: report.id.clone(),
        member_id: report.member_id.clone(),
        report_date: report.report_date,
        previous_report_id: previous.map(|p| p.id.clone()),
        classifications,
        summary,
    }
}

/// Stores lab reports and produces their analysis
pub struct LabReportService<S: CollectionStore> {
    store: S,
    attention_threshold: usize,
}

impl<S: CollectionStore> LabReportService<S> {
    /// Create a new lab report service
    pub fn new(store: S) -> Self {
        Self {
            store,
            attention_threshold: DEFAULT_ATTENTION_THRESHOLD,
        }
    }

    /// Create a lab report service using configured thresholds
    pub fn with_config(store: S, config: &DashboardConfig) -> Self {
        Self {
            store,
            attention_threshold: config.attention_threshold,
        }
    }

    fn load_reports(&self) -> Vec<LabReport> {
        load_collection::<StoredLabReport, _>(&self.store, collections::LAB_REPORTS)
            .into_iter()
            .filter_map(convert_to_domain_lab_report)
            .collect()
    }

    /// Insert or replace a report by id
    pub fn save_report(&self, report: &LabReport) -> Result<(), ServiceError> {
        if report.id.trim().is_empty() {
            return Err(ServiceError::Validation("Report id is required".to_string()));
        }
        if report.parameters.iter().any(|p| p.name.trim().is_empty()) {
            return Err(ServiceError::Validation("Every parameter needs a name".to_string()));
        }

        let mut stored = load_collection_for_write::<StoredLabReport, _>(&self.store, collections::LAB_REPORTS)?;
        stored.remove_id(&report.id, |r| r.id.as_str());
        stored.push(convert_to_data_lab_report(report));
        stored.save(&self.store)?;

        info!("Saved lab report {} with {} parameters", report.id, report.parameters.len());
        Ok(())
    }

    /// Reports for a member, most recent first
    pub fn reports_for(&self, member_id: &str) -> Vec<LabReport> {
        let mut reports: Vec<LabReport> = self
            .load_reports()
            .into_iter()
            .filter(|r| r.member_id == member_id)
            .collect();
        reports.sort_by(|a, b| b.report_date.cmp(&a.report_date));
        reports
    }

    /// Analyze a stored report against the member's previous report
    pub fn analyze(&self, report_id: &str) -> Result<LabAnalysis, ServiceError> {
        let reports = self.load_reports();
        let report = reports
            .iter()
            .find(|r| r.id == report_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Lab report with ID {} not found", report_id)))?;

        let previous = reports
            .iter()
            .filter(|r| r.member_id == report.member_id && r.report_date < report.report_date)
            .max_by_key(|r| r.report_date);

        debug!(
            "Analyzing lab report {} against {:?}",
            report.id,
            previous.map(|p| p.id.as_str())
        );
        Ok(analyze_report(report, previous, self.attention_threshold))
    }
}
