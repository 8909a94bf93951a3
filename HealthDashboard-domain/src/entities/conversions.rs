use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;
use tracing::warn;

use health_dashboard_data::models::{
    StoredDoseRecord, StoredLabParameter, StoredLabReport, StoredMedication, StoredReading,
};

use crate::entities::dose::{DoseRecord, DoseStatus};
use crate::entities::lab_report::{LabParameter, LabReport};
use crate::entities::medication::Medication;
use crate::entities::reading::{MetricKind, Reading, ReadingValue};

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Read a finite number out of a loose JSON value
///
/// Accepts JSON numbers and numeric strings, since form input was often
/// stored without conversion.
pub fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Interpret a stored reading value for the given metric
///
/// Blood pressure may be an object with `systolic`/`diastolic` or a
/// "120/80" string; everything else is a single number.
pub fn reading_value_from_json(metric: &MetricKind, value: &Value) -> Option<ReadingValue> {
    if *metric == MetricKind::BloodPressure {
        return match value {
            Value::Object(map) => {
                let systolic = map.get("systolic").and_then(numeric_value)?;
                let diastolic = map.get("diastolic").and_then(numeric_value)?;
                Some(ReadingValue::BloodPressure { systolic, diastolic })
            }
            Value::String(s) => {
                let (systolic, diastolic) = s.split_once('/')?;
                Some(ReadingValue::BloodPressure {
                    systolic: numeric_value(&Value::String(systolic.to_string()))?,
                    diastolic: numeric_value(&Value::String(diastolic.to_string()))?,
                })
            }
            _ => None,
        };
    }

    numeric_value(value).map(ReadingValue::Scalar)
}

/// Encode a reading value the way the dashboard stores it
pub fn reading_value_to_json(value: &ReadingValue) -> Value {
    match value {
        ReadingValue::Scalar(v) => serde_json::json!(v),
        ReadingValue::BloodPressure { systolic, diastolic } => serde_json::json!({
            "systolic": systolic,
            "diastolic": diastolic,
        }),
    }
}

/// Parse an RFC 3339 timestamp
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a `YYYY-MM-DD` date, also accepting a full RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|dt| dt.date_naive()))
}

/// Parse a stored dose status; the legacy "overdue" value reads as pending
pub fn parse_dose_status(raw: &str) -> DoseStatus {
    match raw.trim().to_lowercase().as_str() {
        "taken" => DoseStatus::Taken,
        "skipped" => DoseStatus::Skipped,
        "pending" | "overdue" => DoseStatus::Pending,
        other => {
            warn!("Unrecognised dose status '{}', treating as pending", other);
            DoseStatus::Pending
        }
    }
}

/// Convert from data model to domain entity for a reading
///
/// Returns `None` when the timestamp cannot be parsed. A missing or
/// malformed value is kept as `None` so the reading still renders.
pub fn convert_to_domain_reading(data_reading: StoredReading) -> Option<Reading> {
    let Some(timestamp) = parse_timestamp(&data_reading.timestamp) else {
        warn!("Dropping reading {} with invalid timestamp '{}'", data_reading.id, data_reading.timestamp);
        return None;
    };

    let metric = MetricKind::parse(&data_reading.metric);
    let value = reading_value_from_json(&metric, &data_reading.value);
    let unit = if data_reading.unit.trim().is_empty() {
        metric.default_unit().to_string()
    } else {
        data_reading.unit
    };

    Some(Reading {
        id: data_reading.id,
        member_id: data_reading.member_id,
        metric,
        value,
        unit,
        timestamp,
        notes: data_reading.notes,
    })
}

/// Convert from domain entity to data model for a reading
pub fn convert_to_data_reading(reading: &Reading) -> StoredReading {
    StoredReading {
        id: reading.id.clone(),
        member_id: reading.member_id.clone(),
        metric: reading.metric.as_key().to_string(),
        value: reading.value.as_ref().map_or(Value::Null, reading_value_to_json),
        unit: reading.unit.clone(),
        timestamp: reading.timestamp.to_rfc3339(),
        notes: reading.notes.clone(),
    }
}

/// Convert from data model to domain entity for a dose
pub fn convert_to_domain_dose(data_dose: StoredDoseRecord) -> Option<DoseRecord> {
    let Some(scheduled_at) = parse_timestamp(&data_dose.scheduled_time) else {
        warn!("Dropping dose {} with invalid scheduled time '{}'", data_dose.id, data_dose.scheduled_time);
        return None;
    };

    Some(DoseRecord {
        status: parse_dose_status(&data_dose.status),
        taken_at: data_dose.taken_time.as_deref().and_then(parse_timestamp),
        id: data_dose.id,
        medication_id: data_dose.medication_id,
        member_id: data_dose.member_id,
        medication_name: data_dose.medication_name,
        dosage: data_dose.dosage,
        scheduled_at,
        notes: data_dose.notes,
    })
}

/// Convert from domain entity to data model for a dose
pub fn convert_to_data_dose(dose: &DoseRecord) -> StoredDoseRecord {
    StoredDoseRecord {
        id: dose.id.clone(),
        medication_id: dose.medication_id.clone(),
        member_id: dose.member_id.clone(),
        medication_name: dose.medication_name.clone(),
        dosage: dose.dosage.clone(),
        scheduled_time: dose.scheduled_at.to_rfc3339(),
        status: dose.status.as_str().to_string(),
        taken_time: dose.taken_at.map(|t| t.to_rfc3339()),
        notes: dose.notes.clone(),
    }
}

/// Convert from data model to domain entity for a medication
///
/// Unparsable times are skipped; an unparsable start date drops the record.
pub fn convert_to_domain_medication(data_medication: StoredMedication) -> Option<Medication> {
    let Some(start_date) = parse_date(&data_medication.start_date) else {
        warn!("Dropping medication {} with invalid start date '{}'", data_medication.id, data_medication.start_date);
        return None;
    };

    let mut times: Vec<NaiveTime> = data_medication
        .times
        .iter()
        .filter_map(|raw| {
            let parsed = NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok();
            if parsed.is_none() {
                warn!("Ignoring invalid time '{}' on medication {}", raw, data_medication.id);
            }
            parsed
        })
        .collect();
    times.sort();
    times.dedup();

    Some(Medication {
        end_date: data_medication.end_date.as_deref().and_then(parse_date),
        id: data_medication.id,
        member_id: data_medication.member_id,
        name: data_medication.name,
        dosage: data_medication.dosage,
        times,
        start_date,
        active: data_medication.active,
    })
}

/// Convert from domain entity to data model for a medication
pub fn convert_to_data_medication(medication: &Medication) -> StoredMedication {
    StoredMedication {
        id: medication.id.clone(),
        member_id: medication.member_id.clone(),
        name: medication.name.clone(),
        dosage: medication.dosage.clone(),
        times: medication.times.iter().map(|t| t.format("%H:%M").to_string()).collect(),
        start_date: medication.start_date.format("%Y-%m-%d").to_string(),
        end_date: medication.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
        active: medication.active,
    }
}

fn convert_to_domain_lab_parameter(data_parameter: StoredLabParameter) -> LabParameter {
    LabParameter {
        value: numeric_value(&data_parameter.value),
        normal_range_min: numeric_value(&data_parameter.normal_range_min),
        normal_range_max: numeric_value(&data_parameter.normal_range_max),
        name: data_parameter.name,
        unit: data_parameter.unit,
    }
}

fn optional_number(value: Option<f64>) -> Value {
    value.map_or(Value::Null, |v| serde_json::json!(v))
}

/// Convert from data model to domain entity for a lab report
pub fn convert_to_domain_lab_report(data_report: StoredLabReport) -> Option<LabReport> {
    let Some(report_date) = parse_date(&data_report.report_date) else {
        warn!("Dropping lab report {} with invalid date '{}'", data_report.id, data_report.report_date);
        return None;
    };

    Some(LabReport {
        id: data_report.id,
        member_id: data_report.member_id,
        title: data_report.title,
        report_date,
        parameters: data_report
            .parameters
            .into_iter()
            .map(convert_to_domain_lab_parameter)
            .collect(),
    })
}

/// Convert from domain entity to data model for a lab report
pub fn convert_to_data_lab_report(report: &LabReport) -> StoredLabReport {
    StoredLabReport {
        id: report.id.clone(),
        member_id: report.member_id.clone(),
        title: report.title.clone(),
        report_date: report.report_date.format("%Y-%m-%d").to_string(),
        parameters: report
            .parameters
            .iter()
            .map(|p| StoredLabParameter {
                name: p.name.clone(),
                value: optional_number(p.value),
                unit: p.unit.clone(),
                normal_range_min: optional_number(p.normal_range_min),
                normal_range_max: optional_number(p.normal_range_max),
            })
            .collect(),
    }
}
