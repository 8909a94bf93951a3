use crate::entities::classification::{NormalRange, ParameterClassification, ParameterStatus};
use crate::entities::lab_report::LabParameter;
use crate::entities::reading::{MetricKind, Reading, ReadingValue};

/// Above `max * CRITICAL_HIGH_FACTOR` a high value becomes critical
pub const CRITICAL_HIGH_FACTOR: f64 = 1.5;

/// Below `min * CRITICAL_LOW_FACTOR` a low value becomes critical
pub const CRITICAL_LOW_FACTOR: f64 = 0.5;

/// Categorize heart rate in beats per minute
pub fn classify_heart_rate(bpm: f64) -> ParameterStatus {
    if !bpm.is_finite() {
        ParameterStatus::Unknown
    } else if bpm < 60.0 {
        ParameterStatus::Low
    } else if bpm > 100.0 {
        ParameterStatus::High
    } else {
        ParameterStatus::Normal
    }
}

/// Categorize fasting blood sugar in mg/dL
pub fn classify_blood_sugar(mg_dl: f64) -> ParameterStatus {
    if !mg_dl.is_finite() {
        ParameterStatus::Unknown
    } else if mg_dl < 100.0 {
        ParameterStatus::Normal
    } else if mg_dl < 126.0 {
        // Pre-diabetic range
        ParameterStatus::Elevated
    } else {
        ParameterStatus::High
    }
}

/// Categorize body temperature in °F
pub fn classify_temperature(fahrenheit: f64) -> ParameterStatus {
    if !fahrenheit.is_finite() {
        ParameterStatus::Unknown
    } else if fahrenheit < 97.0 {
        ParameterStatus::Low
    } else if fahrenheit > 99.0 {
        ParameterStatus::Elevated
    } else {
        ParameterStatus::Normal
    }
}

/// Categorize blood pressure based on measurements
pub fn classify_blood_pressure(systolic: f64, diastolic: f64) -> ParameterStatus {
    if !systolic.is_finite() || !diastolic.is_finite() {
        ParameterStatus::Unknown
    } else if systolic < 120.0 && diastolic < 80.0 {
        ParameterStatus::Normal
    } else if systolic < 130.0 && diastolic < 80.0 {
        ParameterStatus::Elevated
    } else {
        ParameterStatus::High
    }
}

/// Categorize a value against an explicit normal range
///
/// Bounds are inclusive. Beyond 1.5x the upper bound or under 0.5x the
/// lower bound the value is critical; the multipliers are a display
/// heuristic, not a clinical rule.
pub fn classify_against_range(value: f64, range: &NormalRange) -> ParameterStatus {
    if !value.is_finite() {
        ParameterStatus::Unknown
    } else if value > range.max {
        if value > range.max * CRITICAL_HIGH_FACTOR {
            ParameterStatus::Critical
        } else {
            ParameterStatus::High
        }
    } else if value < range.min {
        if value < range.min * CRITICAL_LOW_FACTOR {
            ParameterStatus::Critical
        } else {
            ParameterStatus::Low
        }
    } else {
        ParameterStatus::Normal
    }
}

/// Classify a value for a metric
///
/// An explicit range wins over the fixed thresholds of known metrics. A
/// missing value, a value of the wrong shape, or a metric with no rule
/// yields `Unknown`.
pub fn classify(
    metric: &MetricKind,
    value: Option<&ReadingValue>,
    explicit_range: Option<&NormalRange>,
) -> ParameterStatus {
    let Some(value) = value else {
        return ParameterStatus::Unknown;
    };

    match (value, explicit_range) {
        (ReadingValue::Scalar(v), Some(range)) => classify_against_range(*v, range),
        (ReadingValue::BloodPressure { systolic, diastolic }, _) => match metric {
            MetricKind::BloodPressure => classify_blood_pressure(*systolic, *diastolic),
            _ => ParameterStatus::Unknown,
        },
        (ReadingValue::Scalar(v), None) => match metric {
            MetricKind::HeartRate => classify_heart_rate(*v),
            MetricKind::BloodSugar => classify_blood_sugar(*v),
            MetricKind::Temperature => classify_temperature(*v),
            _ => ParameterStatus::Unknown,
        },
    }
}

/// Classify a recorded reading with the fixed thresholds of its metric
pub fn classify_reading(reading: &Reading) -> ParameterStatus {
    classify(&reading.metric, reading.value.as_ref(), None)
}

/// Classify a lab parameter, using its own range when one is given
///
/// The returned classification carries no trend; see the lab report service
/// for trends against a previous report.
pub fn classify_parameter(parameter: &LabParameter) -> ParameterClassification {
    let metric = MetricKind::parse(&parameter.name);
    let range = parameter.range();
    let value = parameter.value.filter(|v| v.is_finite());
    let status = classify(&metric, value.map(ReadingValue::Scalar).as_ref(), range.as_ref());

    ParameterClassification {
        name: parameter.name.clone(),
        metric,
        value,
        unit: parameter.unit.clone(),
        range,
        status,
        trend: None,
    }
}

/// Body mass index from weight in kg and height in cm
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !weight_kg.is_finite() || !height_cm.is_finite() || weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

/// Categorize a BMI value
pub fn classify_bmi(bmi: f64) -> ParameterStatus {
    if !bmi.is_finite() || bmi <= 0.0 {
        ParameterStatus::Unknown
    } else if bmi < 18.5 {
        ParameterStatus::Low
    } else if bmi < 25.0 {
        ParameterStatus::Normal
    } else if bmi < 30.0 {
        // Overweight
        ParameterStatus::Elevated
    } else {
        ParameterStatus::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: f64, max: f64) -> NormalRange {
        NormalRange::new(min, max).unwrap()
    }

    fn lab(name: &str, value: Option<f64>, min: Option<f64>, max: Option<f64>) -> LabParameter {
        LabParameter {
            name: name.to_string(),
            value,
            unit: String::new(),
            normal_range_min: min,
            normal_range_max: max,
        }
    }

    #[test]
    fn test_heart_rate_boundaries() {
        assert_eq!(classify_heart_rate(60.0), ParameterStatus::Normal);
        assert_eq!(classify_heart_rate(100.0), ParameterStatus::Normal);
        assert_eq!(classify_heart_rate(59.9), ParameterStatus::Low);
        assert_eq!(classify_heart_rate(100.1), ParameterStatus::High);
        for bpm in 60..=100 {
            assert_eq!(classify_heart_rate(bpm as f64), ParameterStatus::Normal);
        }
    }

    #[test]
    fn test_blood_sugar_boundaries() {
        assert_eq!(classify_blood_sugar(99.9), ParameterStatus::Normal);
        assert_eq!(classify_blood_sugar(100.0), ParameterStatus::Elevated);
        assert_eq!(classify_blood_sugar(125.9), ParameterStatus::Elevated);
        assert_eq!(classify_blood_sugar(126.0), ParameterStatus::High);
    }

    #[test]
    fn test_temperature_scenarios() {
        assert_eq!(classify_temperature(101.0), ParameterStatus::Elevated);
        assert_eq!(classify_temperature(98.2), ParameterStatus::Normal);
        assert_eq!(classify_temperature(96.0), ParameterStatus::Low);
        assert_eq!(classify_temperature(97.0), ParameterStatus::Normal);
        assert_eq!(classify_temperature(99.0), ParameterStatus::Normal);
    }

    #[test]
    fn test_blood_pressure_scenarios() {
        assert_eq!(classify_blood_pressure(118.0, 78.0), ParameterStatus::Normal);
        assert_eq!(classify_blood_pressure(125.0, 78.0), ParameterStatus::Elevated);
        assert_eq!(classify_blood_pressure(135.0, 85.0), ParameterStatus::High);
        // Diastolic alone pushes into high
        assert_eq!(classify_blood_pressure(115.0, 82.0), ParameterStatus::High);
        assert_eq!(classify_blood_pressure(130.0, 70.0), ParameterStatus::High);
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let r = range(70.0, 100.0);
        assert_eq!(classify_against_range(70.0, &r), ParameterStatus::Normal);
        assert_eq!(classify_against_range(100.0, &r), ParameterStatus::Normal);
        assert_eq!(classify_against_range(101.0, &r), ParameterStatus::High);
        assert_eq!(classify_against_range(69.0, &r), ParameterStatus::Low);
    }

    #[test]
    fn test_range_critical_boundaries() {
        let r = range(40.0, 100.0);
        let eps = 1e-6;
        assert_eq!(classify_against_range(150.0 - eps, &r), ParameterStatus::High);
        assert_eq!(classify_against_range(150.0, &r), ParameterStatus::High);
        assert_eq!(classify_against_range(150.0 + eps, &r), ParameterStatus::Critical);
        assert_eq!(classify_against_range(20.0 + eps, &r), ParameterStatus::Low);
        assert_eq!(classify_against_range(20.0, &r), ParameterStatus::Low);
        assert_eq!(classify_against_range(20.0 - eps, &r), ParameterStatus::Critical);
    }

    #[test]
    fn test_classify_dispatch() {
        let hr = ReadingValue::Scalar(72.0);
        let bp = ReadingValue::BloodPressure { systolic: 135.0, diastolic: 85.0 };

        assert_eq!(classify(&MetricKind::HeartRate, Some(&hr), None), ParameterStatus::Normal);
        assert_eq!(classify(&MetricKind::BloodPressure, Some(&bp), None), ParameterStatus::High);
        assert_eq!(classify(&MetricKind::BloodSugar, Some(&ReadingValue::Scalar(130.0)), None), ParameterStatus::High);
        assert_eq!(classify(&MetricKind::Temperature, Some(&ReadingValue::Scalar(96.0)), None), ParameterStatus::Low);
    }

    #[test]
    fn test_explicit_range_overrides_fixed_thresholds() {
        let glucose = ReadingValue::Scalar(105.0);
        let lab_range = range(70.0, 110.0);
        assert_eq!(classify(&MetricKind::BloodSugar, Some(&glucose), None), ParameterStatus::Elevated);
        assert_eq!(classify(&MetricKind::BloodSugar, Some(&glucose), Some(&lab_range)), ParameterStatus::Normal);
    }

    #[test]
    fn test_unknown_never_panics() {
        assert_eq!(classify(&MetricKind::HeartRate, None, None), ParameterStatus::Unknown);
        assert_eq!(
            classify(&MetricKind::HeartRate, Some(&ReadingValue::Scalar(f64::NAN)), None),
            ParameterStatus::Unknown
        );
        assert_eq!(
            classify(&MetricKind::Weight, Some(&ReadingValue::Scalar(70.0)), None),
            ParameterStatus::Unknown
        );
        assert_eq!(
            classify(&MetricKind::Other("Ferritin".into()), Some(&ReadingValue::Scalar(70.0)), None),
            ParameterStatus::Unknown
        );
        // Scalar value on the pair-valued metric
        assert_eq!(
            classify(&MetricKind::BloodPressure, Some(&ReadingValue::Scalar(120.0)), None),
            ParameterStatus::Unknown
        );
        // Pair value on a scalar metric
        let bp = ReadingValue::BloodPressure { systolic: 120.0, diastolic: 80.0 };
        assert_eq!(classify(&MetricKind::HeartRate, Some(&bp), None), ParameterStatus::Unknown);
        assert_eq!(classify_against_range(f64::INFINITY, &range(0.0, 1.0)), ParameterStatus::Unknown);
    }

    #[test]
    fn test_classify_parameter() {
        let hemoglobin = classify_parameter(&lab("Hemoglobin", Some(11.0), Some(12.0), Some(16.0)));
        assert_eq!(hemoglobin.status, ParameterStatus::Low);
        assert_eq!(hemoglobin.range, Some(range(12.0, 16.0)));
        assert_eq!(hemoglobin.trend, None);

        let ldl = classify_parameter(&lab("LDL", Some(190.0), Some(0.0), Some(100.0)));
        assert_eq!(ldl.status, ParameterStatus::Critical);

        let missing = classify_parameter(&lab("TSH", None, Some(0.4), Some(4.0)));
        assert_eq!(missing.status, ParameterStatus::Unknown);

        let no_range = classify_parameter(&lab("Ferritin", Some(50.0), None, Some(300.0)));
        assert_eq!(no_range.status, ParameterStatus::Unknown);

        // Known metric name without a range falls back to fixed thresholds
        let sugar = classify_parameter(&lab("Blood Sugar", Some(110.0), None, None));
        assert_eq!(sugar.status, ParameterStatus::Elevated);
    }

    #[test]
    fn test_bmi() {
        let value = bmi(70.0, 175.0).unwrap();
        assert!((value - 22.857).abs() < 0.01);
        assert_eq!(classify_bmi(value), ParameterStatus::Normal);
        assert_eq!(classify_bmi(17.0), ParameterStatus::Low);
        assert_eq!(classify_bmi(27.5), ParameterStatus::Elevated);
        assert_eq!(classify_bmi(30.0), ParameterStatus::High);
        assert_eq!(bmi(70.0, 0.0), None);
        assert_eq!(classify_bmi(f64::NAN), ParameterStatus::Unknown);
    }
}
