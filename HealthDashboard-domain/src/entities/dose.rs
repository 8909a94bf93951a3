use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Persisted status of a dose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseStatus {
    Pending,
    Taken,
    Skipped,
}

impl DoseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoseStatus::Pending => "pending",
            DoseStatus::Taken => "taken",
            DoseStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status shown to the user; `Overdue` is derived from a stale pending dose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseDisplayStatus {
    Pending,
    Taken,
    Skipped,
    Overdue,
}

/// Rejected status change on a dose
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DoseTransitionError {
    /// Only pending doses can be taken or skipped
    #[error("Dose {id} is already {status}")]
    AlreadyResolved { id: String, status: DoseStatus },
}

/// One scheduled administration of a medication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseRecord {
    pub id: String,
    pub medication_id: String,
    pub member_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: DoseStatus,
    pub taken_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl DoseRecord {
    pub fn is_pending(&self) -> bool {
        self.status == DoseStatus::Pending
    }

    fn ensure_pending(&self) -> Result<(), DoseTransitionError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(DoseTransitionError::AlreadyResolved {
                id: self.id.clone(),
                status: self.status,
            })
        }
    }

    /// pending -> taken, recording when it was taken
    pub fn mark_taken(&mut self, at: DateTime<Utc>) -> Result<(), DoseTransitionError> {
        self.ensure_pending()?;
        self.status = DoseStatus::Taken;
        self.taken_at = Some(at);
        Ok(())
    }

    /// pending -> skipped
    pub fn mark_skipped(&mut self) -> Result<(), DoseTransitionError> {
        self.ensure_pending()?;
        self.status = DoseStatus::Skipped;
        Ok(())
    }

    /// Attach a note; allowed in any status, blank notes clear it
    pub fn annotate(&mut self, note: &str) {
        let note = note.trim();
        self.notes = if note.is_empty() { None } else { Some(note.to_string()) };
    }
}

/// Adherence figures for one day's doses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherenceReport {
    pub total: usize,
    pub taken: usize,
    /// Rounded percentage of doses taken, 0 when nothing is scheduled
    pub percent_taken: u32,
    pub current_dose: Option<DoseRecord>,
    pub next_dose: Option<DoseRecord>,
    pub overdue: Vec<DoseRecord>,
}

/// Adherence for a single medication over a set of doses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationAdherence {
    pub medication_id: String,
    pub medication_name: String,
    pub taken: usize,
    pub skipped: usize,
    pub total: usize,
    pub percent_taken: u32,
}
