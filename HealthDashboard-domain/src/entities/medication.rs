use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A prescribed medication and the times of day it is taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub member_id: String,
    pub name: String,
    pub dosage: String,
    pub times: Vec<NaiveTime>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

impl Medication {
    /// Whether doses should be generated for `date`
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.active
            && date >= self.start_date
            && self.end_date.map_or(true, |end| date <= end)
    }
}
