use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use crate::entities::dose::{
    AdherenceReport, DoseDisplayStatus, DoseRecord, DoseStatus, MedicationAdherence,
};

/// Minutes either side of a scheduled time during which a dose is "current"
pub const DEFAULT_DOSE_WINDOW_MINUTES: i64 = 30;

/// A pending dose whose scheduled time has passed
pub fn is_overdue(dose: &DoseRecord, now: DateTime<Utc>) -> bool {
    dose.is_pending() && dose.scheduled_at < now
}

/// Status to display for a dose at `now`
pub fn display_status(dose: &DoseRecord, now: DateTime<Utc>) -> DoseDisplayStatus {
    match dose.status {
        DoseStatus::Taken => DoseDisplayStatus::Taken,
        DoseStatus::Skipped => DoseDisplayStatus::Skipped,
        DoseStatus::Pending if is_overdue(dose, now) => DoseDisplayStatus::Overdue,
        DoseStatus::Pending => DoseDisplayStatus::Pending,
    }
}

/// Rounded percentage of `taken` over `total`, 0 when `total` is 0
pub fn percentage(taken: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (taken as f64 / total as f64 * 100.0).round() as u32
}

/// Adherence for a day's doses at `now`, using the default dose window
pub fn adherence(doses: &[DoseRecord], now: DateTime<Utc>) -> AdherenceReport {
    adherence_with_window(doses, now, Duration::minutes(DEFAULT_DOSE_WINDOW_MINUTES))
}

/// Adherence for a day's doses at `now`
///
/// The current dose is the first pending dose, in the given order, scheduled
/// within `window` of `now` on either side. The next dose is the pending dose
/// with the soonest scheduled time after `now`.
pub fn adherence_with_window(doses: &[DoseRecord], now: DateTime<Utc>, window: Duration) -> AdherenceReport {
    let total = doses.len();
    let taken = doses.iter().filter(|d| d.status == DoseStatus::Taken).count();

    let current_dose = doses
        .iter()
        .filter(|d| d.is_pending())
        .find(|d| {
            let offset = d.scheduled_at - now;
            offset <= window && offset >= -window
        })
        .cloned();

    let next_dose = doses
        .iter()
        .filter(|d| d.is_pending() && d.scheduled_at > now)
        .min_by_key(|d| d.scheduled_at)
        .cloned();

    let overdue = doses
        .iter()
        .filter(|d| is_overdue(d, now))
        .cloned()
        .collect();

    AdherenceReport {
        total,
        taken,
        percent_taken: percentage(taken, total),
        current_dose,
        next_dose,
        overdue,
    }
}

/// Per-medication adherence, ordered by medication name
pub fn adherence_by_medication(doses: &[DoseRecord]) -> Vec<MedicationAdherence> {
    let mut by_medication: BTreeMap<(&str, &str), (usize, usize, usize)> = BTreeMap::new();

    for dose in doses {
        let entry = by_medication
            .entry((dose.medication_name.as_str(), dose.medication_id.as_str()))
            .or_default();
        entry.2 += 1;
        match dose.status {
            DoseStatus::Taken => entry.0 += 1,
            DoseStatus::Skipped => entry.1 += 1,
            DoseStatus::Pending => {}
        }
    }

    by_medication
        .into_iter()
        .map(|((name, id), (taken, skipped, total))| MedicationAdherence {
            medication_id: id.to_string(),
            medication_name: name.to_string(),
            taken,
            skipped,
            total,
            percent_taken: percentage(taken, total),
        })
        .collect()
}
