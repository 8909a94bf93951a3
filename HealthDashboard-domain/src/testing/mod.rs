// Testing fixtures for the domain layer
// This module is only available in tests or when the "mock" feature is enabled

// Re-export the failing store from the data layer
pub use health_dashboard_data::repository::tests::UnavailableStore;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::entities::{LabParameter, LabReport, Medication, MetricKind, Reading, ReadingValue};

/// Build a reading for `member_id`
pub fn reading(member_id: &str, metric: MetricKind, value: ReadingValue, timestamp: DateTime<Utc>) -> Reading {
    Reading {
        id: uuid::Uuid::new_v4().to_string(),
        member_id: member_id.to_string(),
        unit: metric.default_unit().to_string(),
        metric,
        value: Some(value),
        timestamp,
        notes: None,
    }
}

/// Build a lab parameter with both range bounds
pub fn lab_parameter(name: &str, value: f64, unit: &str, min: f64, max: f64) -> LabParameter {
    LabParameter {
        name: name.to_string(),
        value: Some(value),
        unit: unit.to_string(),
        normal_range_min: Some(min),
        normal_range_max: Some(max),
    }
}

/// Build a lab report
pub fn lab_report(id: &str, member_id: &str, report_date: NaiveDate, parameters: Vec<LabParameter>) -> LabReport {
    LabReport {
        id: id.to_string(),
        member_id: member_id.to_string(),
        title: "Blood Panel".to_string(),
        report_date,
        parameters,
    }
}

/// Build an active, open-ended medication
///
/// Invalid `(hour, minute)` pairs are skipped.
pub fn medication(id: &str, member_id: &str, name: &str, times: &[(u32, u32)], start_date: NaiveDate) -> Medication {
    Medication {
        id: id.to_string(),
        member_id: member_id.to_string(),
        name: name.to_string(),
        dosage: "1 tablet".to_string(),
        times: times
            .iter()
            .filter_map(|(h, m)| NaiveTime::from_hms_opt(*h, *m, 0))
            .collect(),
        start_date,
        end_date: None,
        active: true,
    }
}
