use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Arc;

use health_dashboard_domain::config::DashboardConfig;
use health_dashboard_domain::entities::{
    DoseStatus, LabParameter, LabReport, Medication, MetricKind, OverallStatus, ParameterStatus, RiskLevel,
    TrendDirection,
};
use health_dashboard_domain::services::validation::CreateReadingRequest;
use health_dashboard_domain::services::{DoseService, LabReportService, ServiceError, VitalsService};
use health_dashboard_domain::telemetry::init_tracing;
use health_dashboard_domain::{CollectionStore, JsonFileStore};

fn file_config(dir: &std::path::Path) -> DashboardConfig {
    DashboardConfig {
        store_dir: Some(dir.to_path_buf()),
        ..DashboardConfig::default()
    }
}

fn heart_rate(member_id: &str, value: f64, timestamp: &str) -> CreateReadingRequest {
    CreateReadingRequest {
        member_id: member_id.to_string(),
        metric: "heartRate".to_string(),
        value: Some(value),
        systolic: None,
        diastolic: None,
        unit: None,
        timestamp: Some(timestamp.to_string()),
        notes: None,
    }
}

fn blood_pressure(member_id: &str, systolic: f64, diastolic: f64, timestamp: &str) -> CreateReadingRequest {
    CreateReadingRequest {
        member_id: member_id.to_string(),
        metric: "bloodPressure".to_string(),
        value: None,
        systolic: Some(systolic),
        diastolic: Some(diastolic),
        unit: None,
        timestamp: Some(timestamp.to_string()),
        notes: Some("after walk".to_string()),
    }
}

fn parameter(name: &str, value: f64, min: f64, max: f64) -> LabParameter {
    LabParameter {
        name: name.to_string(),
        value: Some(value),
        unit: "mg/dL".to_string(),
        normal_range_min: Some(min),
        normal_range_max: Some(max),
    }
}

#[test]
fn vitals_survive_reopening_the_store() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(dir.path());

    {
        let vitals = VitalsService::with_config(config.open_store(), &config);
        vitals.record(heart_rate("m-1", 72.0, "2024-03-01T08:00:00Z")).unwrap();
        vitals.record(heart_rate("m-1", 104.0, "2024-03-02T08:00:00Z")).unwrap();
        vitals.record(blood_pressure("m-1", 118.0, 76.0, "2024-03-02T08:05:00Z")).unwrap();
        vitals.record(heart_rate("m-2", 55.0, "2024-03-02T09:00:00Z")).unwrap();
    }

    assert!(dir.path().join("readings.json").exists());

    let vitals = VitalsService::with_config(config.open_store(), &config);
    let overview = vitals.overview("m-1");
    assert_eq!(overview.metrics.len(), 2);

    let heart = overview
        .metrics
        .iter()
        .find(|m| m.metric == MetricKind::HeartRate)
        .unwrap();
    assert_eq!(heart.status, ParameterStatus::High);
    assert_eq!(heart.trend, TrendDirection::Up);
    assert_eq!(heart.reading_count, 2);

    let pressure = overview
        .metrics
        .iter()
        .find(|m| m.metric == MetricKind::BloodPressure)
        .unwrap();
    assert_eq!(pressure.status, ParameterStatus::Normal);
    assert_eq!(pressure.trend, TrendDirection::Stable);

    assert_eq!(overview.summary.total, 2);
    assert_eq!(overview.summary.abnormal_count, 1);
    assert_eq!(overview.summary.overall_status, OverallStatus::Healthy);
}

#[test]
fn invalid_reading_is_rejected_and_not_stored() {
    let store: Arc<dyn CollectionStore> = DashboardConfig::default().open_store();
    let vitals = VitalsService::new(store.clone());

    let result = vitals.record(blood_pressure("m-1", 80.0, 90.0, "2024-03-01T08:00:00Z"));
    assert!(matches!(result, Err(ServiceError::Validation(_))));
    assert!(store.read_raw("readings").unwrap().is_none());
}

#[test]
fn lab_reports_compare_against_previous_report() {
    let dir = tempfile::tempdir().unwrap();
    let labs = LabReportService::new(JsonFileStore::new(dir.path()));

    labs.save_report(&LabReport {
        id: "lab-1".to_string(),
        member_id: "m-1".to_string(),
        title: "Lipid Panel".to_string(),
        report_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        parameters: vec![parameter("LDL", 120.0, 0.0, 100.0), parameter("HDL", 55.0, 40.0, 90.0)],
    })
    .unwrap();
    labs.save_report(&LabReport {
        id: "lab-2".to_string(),
        member_id: "m-1".to_string(),
        title: "Lipid Panel".to_string(),
        report_date: NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
        parameters: vec![
            parameter("LDL", 160.0, 0.0, 100.0),
            parameter("HDL", 50.0, 40.0, 90.0),
            parameter("Triglycerides", 260.0, 0.0, 150.0),
        ],
    })
    .unwrap();

    let analysis = labs.analyze("lab-2").unwrap();
    assert_eq!(analysis.previous_report_id.as_deref(), Some("lab-1"));

    let ldl = &analysis.classifications[0];
    assert_eq!(ldl.status, ParameterStatus::Critical);
    assert_eq!(ldl.trend, Some(TrendDirection::Up));
    assert_eq!(analysis.classifications[1].trend, Some(TrendDirection::Down));

    assert_eq!(analysis.summary.critical_count, 2);
    assert_eq!(analysis.summary.overall_status, OverallStatus::Critical);
    assert_eq!(analysis.summary.risk_level, RiskLevel::High);
    assert_eq!(analysis.summary.recommendations[0], "Immediate medical attention required");

    assert!(matches!(labs.analyze("lab-9"), Err(ServiceError::NotFound(_))));
}

#[test]
fn daily_doses_track_adherence() {
    let dir = tempfile::tempdir().unwrap();
    let doses = DoseService::new(JsonFileStore::new(dir.path()));
    let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

    doses
        .save_medication(&Medication {
            id: "med-1".to_string(),
            member_id: "m-1".to_string(),
            name: "Lisinopril".to_string(),
            dosage: "10mg".to_string(),
            times: vec![
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            ],
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: None,
            active: true,
        })
        .unwrap();

    let scheduled = doses.ensure_schedule(day).unwrap();
    assert_eq!(scheduled.len(), 2);
    assert!(scheduled.iter().all(|d| d.status == DoseStatus::Pending));

    let morning = Utc.with_ymd_and_hms(2024, 3, 10, 8, 20, 0).unwrap();
    let report = doses.today(morning);
    assert_eq!(report.current_dose.as_ref().map(|d| d.id.as_str()), Some("med-1-20240310-0800"));
    assert_eq!(report.next_dose.as_ref().map(|d| d.id.as_str()), Some("med-1-20240310-2000"));
    assert_eq!(report.overdue.len(), 1);

    doses.mark_taken("med-1-20240310-0800", morning).unwrap();
    let report = doses.today(Utc.with_ymd_and_hms(2024, 3, 10, 21, 0, 0).unwrap());
    assert_eq!(report.percent_taken, 50);
    assert!(report.current_dose.is_none());
    assert!(report.next_dose.is_none());
    assert_eq!(report.overdue.len(), 1);
    assert_eq!(report.overdue[0].id, "med-1-20240310-2000");

    // Regenerating the day keeps the recorded status
    let again = doses.ensure_schedule(day).unwrap();
    assert_eq!(again[0].status, DoseStatus::Taken);
}
