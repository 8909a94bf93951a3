use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::HashSet;

use crate::entities::dose::{DoseRecord, DoseStatus};
use crate::entities::medication::Medication;

/// Deterministic id for a medication's dose at a date and time
pub fn dose_id(medication_id: &str, date: NaiveDate, time: chrono::NaiveTime) -> String {
    format!("{}-{}-{}", medication_id, date.format("%Y%m%d"), time.format("%H%M"))
}

/// Pending doses for every active medication scheduled on `date`
///
/// Times are taken as UTC. The result is ordered by scheduled time, then by
/// medication name, and ids are stable so a day can be regenerated safely.
pub fn generate_daily_schedule(medications: &[Medication], date: NaiveDate) -> Vec<DoseRecord> {
    let mut seen = HashSet::new();
    let mut doses: Vec<DoseRecord> = medications
        .iter()
        .filter(|medication| medication.is_scheduled_on(date))
        .flat_map(|medication| {
            medication.times.iter().map(move |time| DoseRecord {
                id: dose_id(&medication.id, date, *time),
                medication_id: medication.id.clone(),
                member_id: medication.member_id.clone(),
                medication_name: medication.name.clone(),
                dosage: medication.dosage.clone(),
                scheduled_at: Utc.from_utc_datetime(&date.and_time(*time)),
                status: DoseStatus::Pending,
                taken_at: None,
                notes: None,
            })
        })
        .filter(|dose| seen.insert(dose.id.clone()))
        .collect();

    doses.sort_by(|a, b| {
        a.scheduled_at
            .cmp(&b.scheduled_at)
            .then_with(|| a.medication_name.cmp(&b.medication_name))
    });
    doses
}
