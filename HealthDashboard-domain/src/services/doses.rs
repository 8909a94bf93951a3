use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use std::collections::HashSet;
use tracing::{info, warn};

use health_dashboard_data::models::{StoredDoseRecord, StoredMedication};
use health_dashboard_data::repository::{collections, load_collection, load_collection_for_write, CollectionStore};

use crate::config::DashboardConfig;
use crate::entities::conversions::{
    convert_to_data_dose, convert_to_data_medication, convert_to_domain_dose, convert_to_domain_medication,
};
use crate::entities::dose::{AdherenceReport, DoseRecord, DoseTransitionError, MedicationAdherence};
use crate::entities::medication::Medication;
use crate::services::adherence::{adherence_by_medication, adherence_with_window, DEFAULT_DOSE_WINDOW_MINUTES};
use crate::services::errors::ServiceError;
use crate::services::schedule::generate_daily_schedule;

/// Dose tracking over the medications and doses collections
pub struct DoseService<S: CollectionStore> {
    store: S,
    window: Duration,
}

impl<S: CollectionStore> DoseService<S> {
    /// Create a new dose service
    pub fn new(store: S) -> Self {
        Self {
            store,
            window: Duration::minutes(DEFAULT_DOSE_WINDOW_MINUTES),
        }
    }

    /// Create a dose service using the configured dose window
    pub fn with_config(store: S, config: &DashboardConfig) -> Self {
        Self {
            store,
            window: config.dose_window(),
        }
    }

    fn load_medications(&self) -> Vec<Medication> {
        load_collection::<StoredMedication, _>(&self.store, collections::MEDICATIONS)
            .into_iter()
            .filter_map(convert_to_domain_medication)
            .collect()
    }

    fn load_doses(&self) -> Vec<DoseRecord> {
        load_collection::<StoredDoseRecord, _>(&self.store, collections::DOSES)
            .into_iter()
            .filter_map(convert_to_domain_dose)
            .collect()
    }

    /// Insert or replace a medication by id
    pub fn save_medication(&self, medication: &Medication) -> Result<(), ServiceError> {
        if medication.name.trim().is_empty() {
            return Err(ServiceError::Validation("Medication name is required".to_string()));
        }
        if medication.times.is_empty() {
            return Err(ServiceError::Validation("At least one dose time is required".to_string()));
        }
        if medication.times.iter().any(|t| t.second() != 0 || t.nanosecond() != 0) {
            return Err(ServiceError::Validation("Dose times must be whole minutes".to_string()));
        }
        if medication.end_date.map_or(false, |end| end < medication.start_date) {
            return Err(ServiceError::Validation("End date cannot be before start date".to_string()));
        }

        let mut stored = load_collection_for_write::<StoredMedication, _>(&self.store, collections::MEDICATIONS)?;
        stored.remove_id(&medication.id, |m| m.id.as_str());
        stored.push(convert_to_data_medication(medication));
        stored.save(&self.store)?;
        Ok(())
    }

    /// Generate and persist the doses for `date` that do not exist yet
    ///
    /// Returns all doses scheduled on `date`.
    pub fn ensure_schedule(&self, date: NaiveDate) -> Result<Vec<DoseRecord>, ServiceError> {
        let mut stored = load_collection_for_write::<StoredDoseRecord, _>(&self.store, collections::DOSES)?;
        let existing: HashSet<String> = stored
            .iter()
            .map(|d| d.id.as_str())
            .chain(stored.raw_ids())
            .map(str::to_string)
            .collect();

        let new_doses: Vec<DoseRecord> = generate_daily_schedule(&self.load_medications(), date)
            .into_iter()
            .filter(|dose| !existing.contains(&dose.id))
            .collect();

        if !new_doses.is_empty() {
            for dose in &new_doses {
                stored.push(convert_to_data_dose(dose));
            }
            stored.save(&self.store)?;
            info!("Generated {} doses for {}", new_doses.len(), date);
        }

        Ok(self.doses_on(date))
    }

    /// Doses scheduled on `date`, in scheduled order
    pub fn doses_on(&self, date: NaiveDate) -> Vec<DoseRecord> {
        let mut doses: Vec<DoseRecord> = self
            .load_doses()
            .into_iter()
            .filter(|d| d.scheduled_at.date_naive() == date)
            .collect();
        doses.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        doses
    }

    /// Load one dose, apply a change, and write the collection back
    fn update<F>(&self, dose_id: &str, apply: F) -> Result<DoseRecord, ServiceError>
    where
        F: FnOnce(&mut DoseRecord) -> Result<(), DoseTransitionError>,
    {
        let mut stored = load_collection_for_write::<StoredDoseRecord, _>(&self.store, collections::DOSES)?;
        let entry = stored
            .find_mut(|d| d.id == dose_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Dose with ID {} not found", dose_id)))?;

        let mut dose = convert_to_domain_dose(entry.clone()).ok_or_else(|| {
            warn!("Dose {} is stored with an unreadable schedule", dose_id);
            ServiceError::Validation(format!("Dose {} has an invalid scheduled time", dose_id))
        })?;

        apply(&mut dose)?;

        *entry = convert_to_data_dose(&dose);
        stored.save(&self.store)?;
        Ok(dose)
    }

    /// Mark a pending dose as taken at `at`
    pub fn mark_taken(&self, dose_id: &str, at: DateTime<Utc>) -> Result<DoseRecord, ServiceError> {
        let dose = self.update(dose_id, |dose| dose.mark_taken(at))?;
        info!("Dose {} of {} marked taken", dose.id, dose.medication_name);
        Ok(dose)
    }

    /// Mark a pending dose as skipped
    pub fn mark_skipped(&self, dose_id: &str) -> Result<DoseRecord, ServiceError> {
        let dose = self.update(dose_id, |dose| dose.mark_skipped())?;
        info!("Dose {} of {} marked skipped", dose.id, dose.medication_name);
        Ok(dose)
    }

    /// Set or clear the note on a dose
    pub fn annotate(&self, dose_id: &str, note: &str) -> Result<DoseRecord, ServiceError> {
        self.update(dose_id, |dose| {
            dose.annotate(note);
            Ok(())
        })
    }

    /// Adherence for the day containing `now`
    pub fn today(&self, now: DateTime<Utc>) -> AdherenceReport {
        adherence_with_window(&self.doses_on(now.date_naive()), now, self.window)
    }

    /// Per-medication adherence between two dates, inclusive
    pub fn medication_adherence(&self, from: NaiveDate, to: NaiveDate) -> Vec<MedicationAdherence> {
        let doses: Vec<DoseRecord> = self
            .load_doses()
            .into_iter()
            .filter(|d| {
                let day = d.scheduled_at.date_naive();
                day >= from && day <= to
            })
            .collect();
        adherence_by_medication(&doses)
    }
}
