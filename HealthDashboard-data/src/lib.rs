// HealthDashboard Data
// This crate handles persistence of the dashboard's entity collections

// Collection store implementations
pub mod repository;

// Data storage models
pub mod models;
