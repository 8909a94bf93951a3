// Storage models, shaped like the documents the dashboard persisted
pub mod lab_report;
pub mod medication;
pub mod reading;

pub use lab_report::{StoredLabParameter, StoredLabReport};
pub use medication::{StoredDoseRecord, StoredMedication};
pub use reading::StoredReading;
