use chrono::{Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::entities::conversions::parse_timestamp;
use crate::entities::reading::{MetricKind, ReadingValue};
use crate::services::classifier;
use crate::services::errors::ServiceError;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9 ()\-]{7,20}$").expect("phone pattern is valid")
});

/// Clock skew tolerated on reading timestamps
const FUTURE_TOLERANCE_MINUTES: i64 = 5;

fn schema_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().map_or(false, |s| !s.trim().is_empty())
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if PHONE_RE.is_match(phone.trim()) && digits >= 7 {
        Ok(())
    } else {
        Err(schema_error("phone", "Phone number must contain 7-20 digits"))
    }
}

/// Collapse validator errors into one message, fields in name order
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| {
                    if let Some(msg) = &err.message {
                        msg.to_string()
                    } else {
                        format!("Invalid {}", field)
                    }
                })
                .collect();
            if field == "__all__" {
                error_msgs.join(", ")
            } else {
                format!("{}: {}", field, error_msgs.join(", "))
            }
        })
        .collect::<Vec<String>>()
        .join("; ")
}

fn run_validation<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|errors| ServiceError::Validation(format_validation_errors(&errors)))
}

/// Form payload for recording a reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_reading_shape"))]
pub struct CreateReadingRequest {
    #[validate(length(min = 1, message = "Member is required"))]
    pub member_id: String,

    #[validate(length(min = 1, message = "Metric is required"))]
    pub metric: String,

    /// Value for scalar metrics
    pub value: Option<f64>,

    #[validate(range(min = 40.0, max = 300.0, message = "Systolic must be between 40 and 300"))]
    pub systolic: Option<f64>,

    #[validate(range(min = 20.0, max = 200.0, message = "Diastolic must be between 20 and 200"))]
    pub diastolic: Option<f64>,

    #[validate(length(max = 20, message = "Unit cannot exceed 20 characters"))]
    pub unit: Option<String>,

    /// When the reading was taken (RFC 3339); defaults to now
    pub timestamp: Option<String>,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

impl CreateReadingRequest {
    /// Value in domain form, once the request has validated
    pub fn reading_value(&self) -> Option<ReadingValue> {
        match MetricKind::parse(&self.metric) {
            MetricKind::BloodPressure => Some(ReadingValue::BloodPressure {
                systolic: self.systolic?,
                diastolic: self.diastolic?,
            }),
            _ => self.value.map(ReadingValue::Scalar),
        }
    }
}

fn scalar_bounds(metric: &MetricKind) -> Option<(f64, f64, &'static str)> {
    match metric {
        MetricKind::HeartRate => Some((20.0, 250.0, "Heart rate must be between 20 and 250")),
        MetricKind::BloodSugar => Some((10.0, 1000.0, "Blood sugar must be between 10 and 1000")),
        MetricKind::Temperature => Some((85.0, 115.0, "Temperature must be between 85 and 115")),
        MetricKind::Weight => Some((0.5, 700.0, "Weight must be between 0.5 and 700")),
        _ => None,
    }
}

fn validate_reading_shape(request: &CreateReadingRequest) -> Result<(), ValidationError> {
    let metric = MetricKind::parse(&request.metric);

    if metric == MetricKind::BloodPressure {
        let (Some(systolic), Some(diastolic)) = (request.systolic, request.diastolic) else {
            return Err(schema_error("blood_pressure", "Systolic and diastolic are both required"));
        };
        if systolic <= diastolic {
            return Err(schema_error(
                "blood_pressure",
                "Systolic pressure must be greater than diastolic pressure",
            ));
        }
    } else {
        if request.systolic.is_some() || request.diastolic.is_some() {
            return Err(schema_error(
                "value_shape",
                format!("Systolic/diastolic do not apply to {}", metric),
            ));
        }
        let Some(value) = request.value.filter(|v| v.is_finite()) else {
            return Err(schema_error("value", format!("A numeric value is required for {}", metric)));
        };
        if let Some((min, max, message)) = scalar_bounds(&metric) {
            if value < min || value > max {
                return Err(schema_error("value_range", message));
            }
        }
    }

    if let Some(raw) = &request.timestamp {
        let Some(timestamp) = parse_timestamp(raw) else {
            return Err(schema_error("timestamp", "Invalid timestamp format, expected RFC 3339"));
        };
        if timestamp > Utc::now() + Duration::minutes(FUTURE_TOLERANCE_MINUTES) {
            return Err(schema_error("timestamp", "Timestamp cannot be in the future"));
        }
    }

    Ok(())
}

/// Validate a reading form
pub fn validate_reading_request(request: &CreateReadingRequest) -> Result<(), ServiceError> {
    run_validation(request)
}

/// Family member form, including emergency contact and insurance
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_member_cross_fields"))]
pub struct FamilyMemberForm {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    pub relationship: Option<String>,

    pub date_of_birth: Option<NaiveDate>,

    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    pub emergency_contact_name: Option<String>,

    #[validate(custom = "validate_phone")]
    pub emergency_contact_phone: Option<String>,

    pub insurance_provider: Option<String>,

    pub insurance_policy_number: Option<String>,

    #[validate(range(min = 30.0, max = 250.0, message = "Height must be between 30 and 250 cm"))]
    pub height_cm: Option<f64>,

    #[validate(range(min = 0.5, max = 700.0, message = "Weight must be between 0.5 and 700 kg"))]
    pub weight_kg: Option<f64>,
}

impl FamilyMemberForm {
    /// BMI when both height and weight are filled in
    pub fn bmi(&self) -> Option<f64> {
        classifier::bmi(self.weight_kg?, self.height_cm?)
    }
}

fn digits_only(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

fn validate_member_cross_fields(form: &FamilyMemberForm) -> Result<(), ValidationError> {
    if present(&form.emergency_contact_name) != present(&form.emergency_contact_phone) {
        return Err(schema_error(
            "emergency_contact",
            "Emergency contact needs both a name and a phone number",
        ));
    }

    if let (Some(own), Some(contact)) = (&form.phone, &form.emergency_contact_phone) {
        if !own.trim().is_empty() && digits_only(own) == digits_only(contact) {
            return Err(schema_error(
                "emergency_contact",
                "Emergency contact phone must differ from the member's phone",
            ));
        }
    }

    if present(&form.insurance_provider) != present(&form.insurance_policy_number) {
        return Err(schema_error(
            "insurance",
            "Insurance needs both a provider and a policy number",
        ));
    }

    if let Some(dob) = form.date_of_birth {
        if dob > Utc::now().date_naive() {
            return Err(schema_error("date_of_birth", "Date of birth cannot be in the future"));
        }
    }

    Ok(())
}

/// Validate a family member form
pub fn validate_family_member(form: &FamilyMemberForm) -> Result<(), ServiceError> {
    run_validation(form)
}
