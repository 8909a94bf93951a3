// Domain services
// Pure classification and aggregation logic, plus the services that run it
// over the collection store.
pub mod adherence;
pub mod classifier;
pub mod doses;
pub mod errors;
pub mod lab_reports;
pub mod schedule;
pub mod summary;
pub mod trend;
pub mod validation;
pub mod vitals;

// Re-export service types and the most used functions
pub use adherence::{adherence, adherence_by_medication, adherence_with_window, display_status, is_overdue};
pub use classifier::{classify, classify_parameter, classify_reading};
pub use doses::DoseService;
pub use errors::ServiceError;
pub use lab_reports::{analyze_report, LabReportService};
pub use schedule::generate_daily_schedule;
pub use summary::{summarize, summarize_with_threshold};
pub use trend::{compare, trend, trend_for};
pub use vitals::{MetricOverview, MetricsOverview, VitalsService};
