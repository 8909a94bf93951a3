// Domain entities and value objects
pub mod classification;
pub mod conversions;
pub mod dose;
pub mod lab_report;
pub mod medication;
pub mod reading;
pub mod summary;

// Re-export common types for easier imports
pub use classification::{NormalRange, ParameterClassification, ParameterStatus, TrendDirection};
pub use dose::{
    AdherenceReport, DoseDisplayStatus, DoseRecord, DoseStatus, DoseTransitionError, MedicationAdherence,
};
pub use lab_report::{LabAnalysis, LabParameter, LabReport};
pub use medication::Medication;
pub use reading::{MetricKind, Reading, ReadingValue, ScalarProjection};
pub use summary::{AnalysisSummary, OverallStatus, RiskLevel};
