use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

/// Storage model for a prescribed medication and its daily schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMedication {
    /// Unique identifier for the medication
    pub id: String,

    /// Family member taking the medication
    #[serde(default)]
    pub member_id: String,

    /// Medication name
    pub name: String,

    /// Dosage label (e.g. "500mg")
    #[serde(default)]
    pub dosage: String,

    /// Times of day as "HH:MM"
    #[serde(default)]
    pub times: Vec<String>,

    /// First day of the course (YYYY-MM-DD)
    pub start_date: String,

    /// Last day of the course, if bounded
    #[serde(default)]
    pub end_date: Option<String>,

    /// Whether the medication is currently active
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Storage model for a scheduled dose
///
/// `status` is one of "pending", "taken", "skipped". Older records may also
/// carry "overdue", which is read back as pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDoseRecord {
    pub id: String,

    pub medication_id: String,

    #[serde(default)]
    pub member_id: String,

    #[serde(default)]
    pub medication_name: String,

    #[serde(default)]
    pub dosage: String,

    /// Scheduled administration time (RFC 3339)
    pub scheduled_time: String,

    pub status: String,

    /// When the dose was actually taken (RFC 3339)
    #[serde(default)]
    pub taken_time: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}
