use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health metric a reading belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    /// Systolic/diastolic pair in mmHg
    BloodPressure,
    /// Beats per minute
    HeartRate,
    /// Fasting glucose in mg/dL
    BloodSugar,
    /// Body temperature in °F
    Temperature,
    /// Body weight in kg
    Weight,
    /// Any other named metric
    Other(String),
}

impl MetricKind {
    /// Parse a stored metric name, tolerating the spellings the dashboard used
    pub fn parse(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "bloodpressure" | "bp" => MetricKind::BloodPressure,
            "heartrate" | "pulse" | "hr" => MetricKind::HeartRate,
            "bloodsugar" | "bloodglucose" | "glucose" | "sugar" => MetricKind::BloodSugar,
            "temperature" | "temp" | "bodytemperature" => MetricKind::Temperature,
            "weight" | "bodyweight" => MetricKind::Weight,
            _ => MetricKind::Other(name.trim().to_string()),
        }
    }

    /// Key used when persisting the metric
    pub fn as_key(&self) -> &str {
        match self {
            MetricKind::BloodPressure => "bloodPressure",
            MetricKind::HeartRate => "heartRate",
            MetricKind::BloodSugar => "bloodSugar",
            MetricKind::Temperature => "temperature",
            MetricKind::Weight => "weight",
            MetricKind::Other(name) => name,
        }
    }

    /// Unit assumed when a reading carries none
    pub fn default_unit(&self) -> &'static str {
        match self {
            MetricKind::BloodPressure => "mmHg",
            MetricKind::HeartRate => "bpm",
            MetricKind::BloodSugar => "mg/dL",
            MetricKind::Temperature => "°F",
            MetricKind::Weight => "kg",
            MetricKind::Other(_) => "",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::BloodPressure => write!(f, "Blood Pressure"),
            MetricKind::HeartRate => write!(f, "Heart Rate"),
            MetricKind::BloodSugar => write!(f, "Blood Sugar"),
            MetricKind::Temperature => write!(f, "Temperature"),
            MetricKind::Weight => write!(f, "Weight"),
            MetricKind::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Which scalar to read out of a reading value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarProjection {
    /// The value of a scalar reading
    Value,
    /// Systolic component of a blood pressure reading
    Systolic,
    /// Diastolic component of a blood pressure reading
    Diastolic,
}

impl ScalarProjection {
    /// Projection used when the caller does not pick one
    pub fn default_for(metric: &MetricKind) -> Self {
        match metric {
            MetricKind::BloodPressure => ScalarProjection::Systolic,
            _ => ScalarProjection::Value,
        }
    }
}

/// Value carried by a reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadingValue {
    /// Single number (heart rate, sugar, temperature, weight, ...)
    Scalar(f64),
    /// Blood pressure pair
    BloodPressure { systolic: f64, diastolic: f64 },
}

impl ReadingValue {
    /// Extract a finite scalar under the given projection
    ///
    /// Returns `None` when the projection does not apply to this shape.
    pub fn project(&self, projection: ScalarProjection) -> Option<f64> {
        let value = match (self, projection) {
            (ReadingValue::Scalar(v), ScalarProjection::Value) => *v,
            (ReadingValue::BloodPressure { systolic, .. }, ScalarProjection::Systolic) => *systolic,
            (ReadingValue::BloodPressure { diastolic, .. }, ScalarProjection::Diastolic) => *diastolic,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingValue::Scalar(v) => write!(f, "{}", v),
            ReadingValue::BloodPressure { systolic, diastolic } => write!(f, "{}/{}", systolic, diastolic),
        }
    }
}

/// One timestamped observation of a health metric
///
/// Readings are never edited; a correction is recorded as a new reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: String,
    pub member_id: String,
    pub metric: MetricKind,
    /// `None` when the stored value was missing or malformed
    pub value: Option<ReadingValue>,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}
