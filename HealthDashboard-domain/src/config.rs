//! Runtime configuration for the dashboard logic layer
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file. Anything missing or unparsable falls back to the default.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;
use dotenv::dotenv;
use tracing::{debug, info, warn};

use health_dashboard_data::repository::{CollectionStore, InMemoryStore, JsonFileStore};

use crate::services::adherence::DEFAULT_DOSE_WINDOW_MINUTES;
use crate::services::summary::DEFAULT_ATTENTION_THRESHOLD;

/// Directory for the JSON collection files; unset means in-memory only
pub const ENV_STORE_DIR: &str = "HEALTH_STORE_DIR";
/// Abnormal values tolerated before a summary needs attention
pub const ENV_ATTENTION_THRESHOLD: &str = "HEALTH_ATTENTION_THRESHOLD";
/// Minutes either side of a scheduled dose that count as "now"
pub const ENV_DOSE_WINDOW_MINUTES: &str = "HEALTH_DOSE_WINDOW_MINUTES";

/// Largest accepted dose window, one day either side
pub const MAX_DOSE_WINDOW_MINUTES: i64 = 24 * 60;

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub store_dir: Option<PathBuf>,
    pub attention_threshold: usize,
    pub dose_window_minutes: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            attention_threshold: DEFAULT_ATTENTION_THRESHOLD,
            dose_window_minutes: DEFAULT_DOSE_WINDOW_MINUTES,
        }
    }
}

fn parse_or_default<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid value '{}' for {}, using default {}", raw, key, default);
                default
            }
        },
        None => default,
    }
}

impl DashboardConfig {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> Self {
        if dotenv().is_err() {
            debug!(".env file not found or unreadable, using process environment");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let store_dir = lookup(ENV_STORE_DIR)
            .map(|dir| dir.trim().to_string())
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        let attention_threshold = parse_or_default(
            ENV_ATTENTION_THRESHOLD,
            lookup(ENV_ATTENTION_THRESHOLD),
            defaults.attention_threshold,
        );

        let mut dose_window_minutes = parse_or_default(
            ENV_DOSE_WINDOW_MINUTES,
            lookup(ENV_DOSE_WINDOW_MINUTES),
            defaults.dose_window_minutes,
        );
        if !(0..=MAX_DOSE_WINDOW_MINUTES).contains(&dose_window_minutes) {
            warn!(
                "{} must be between 0 and {}, using default {}",
                ENV_DOSE_WINDOW_MINUTES, MAX_DOSE_WINDOW_MINUTES, defaults.dose_window_minutes
            );
            dose_window_minutes = defaults.dose_window_minutes;
        }

        Self {
            store_dir,
            attention_threshold,
            dose_window_minutes,
        }
    }

    /// Window around a scheduled dose, clamped to the accepted range
    pub fn dose_window(&self) -> Duration {
        Duration::minutes(self.dose_window_minutes.clamp(0, MAX_DOSE_WINDOW_MINUTES))
    }

    /// Open the configured collection store
    pub fn open_store(&self) -> Arc<dyn CollectionStore> {
        match &self.store_dir {
            Some(dir) => {
                info!("Using JSON file store at {}", dir.display());
                Arc::new(JsonFileStore::new(dir.clone()))
            }
            None => {
                info!("No {} set, using in-memory store", ENV_STORE_DIR);
                Arc::new(InMemoryStore::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DashboardConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.attention_threshold, 2);
        assert_eq!(config.dose_window(), Duration::minutes(30));
    }

    #[test]
    fn test_values_are_read() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (ENV_STORE_DIR, "/tmp/health"),
            (ENV_ATTENTION_THRESHOLD, " 4 "),
            (ENV_DOSE_WINDOW_MINUTES, "15"),
        ]));
        assert_eq!(config.store_dir, Some(PathBuf::from("/tmp/health")));
        assert_eq!(config.attention_threshold, 4);
        assert_eq!(config.dose_window_minutes, 15);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (ENV_STORE_DIR, "   "),
            (ENV_ATTENTION_THRESHOLD, "many"),
            (ENV_DOSE_WINDOW_MINUTES, "-5"),
        ]));
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_oversized_window_falls_back() {
        let config = DashboardConfig::from_lookup(lookup_from(&[(ENV_DOSE_WINDOW_MINUTES, "9223372036854775807")]));
        assert_eq!(config.dose_window_minutes, DEFAULT_DOSE_WINDOW_MINUTES);
        assert_eq!(config.dose_window(), Duration::minutes(30));

        let config = DashboardConfig::from_lookup(lookup_from(&[(ENV_DOSE_WINDOW_MINUTES, "1440")]));
        assert_eq!(config.dose_window(), Duration::minutes(1440));

        let config = DashboardConfig {
            dose_window_minutes: i64::MAX,
            ..DashboardConfig::default()
        };
        assert_eq!(config.dose_window(), Duration::minutes(MAX_DOSE_WINDOW_MINUTES));
    }

    #[test]
    fn test_in_memory_store_when_no_dir() {
        let store = DashboardConfig::default().open_store();
        store.write_raw("doses", "[]").unwrap();
        assert_eq!(store.read_raw("doses").unwrap().as_deref(), Some("[]"));
    }
}
