// HealthDashboard Domain
// This crate contains the dashboard logic: classification, trends,
// summaries and dose adherence.

// Environment configuration
pub mod config;

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Logging setup
pub mod telemetry;

// Re-export the store types from health_dashboard_data for convenience
pub use health_dashboard_data::repository::{CollectionStore, InMemoryStore, JsonFileStore, RepositoryError};

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
