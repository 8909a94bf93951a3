use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

use health_dashboard_data::models::StoredReading;
use health_dashboard_data::repository::{collections, load_collection, load_collection_for_write, CollectionStore};

use crate::config::DashboardConfig;
use crate::entities::classification::{ParameterStatus, TrendDirection};
use crate::entities::conversions::{convert_to_data_reading, convert_to_domain_reading, parse_timestamp};
use crate::entities::reading::{MetricKind, Reading};
use crate::entities::summary::AnalysisSummary;
use crate::services::classifier::classify_reading;
use crate::services::errors::ServiceError;
use crate::services::summary::{summarize_statuses, DEFAULT_ATTENTION_THRESHOLD};
use crate::services::trend::trend_for;
use crate::services::validation::{validate_reading_request, CreateReadingRequest};

/// Latest status and trend of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricOverview {
    pub metric: MetricKind,
    pub latest: Reading,
    pub status: ParameterStatus,
    pub trend: TrendDirection,
    pub reading_count: usize,
}

/// Health metrics card for one family member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsOverview {
    pub member_id: String,
    pub metrics: Vec<MetricOverview>,
    pub summary: AnalysisSummary,
}

/// Records vitals and derives the metrics overview
pub struct VitalsService<S: CollectionStore> {
    store: S,
    attention_threshold: usize,
}

impl<S: CollectionStore> VitalsService<S> {
    /// Create a new vitals service
    pub fn new(store: S) -> Self {
        Self {
            store,
            attention_threshold: DEFAULT_ATTENTION_THRESHOLD,
        }
    }

    /// Create a vitals service using configured thresholds
    pub fn with_config(store: S, config: &DashboardConfig) -> Self {
        Self {
            store,
            attention_threshold: config.attention_threshold,
        }
    }

    fn load_readings(&self) -> Vec<Reading> {
        load_collection::<StoredReading, _>(&self.store, collections::READINGS)
            .into_iter()
            .filter_map(convert_to_domain_reading)
            .collect()
    }

    /// Validate and append a new reading
    pub fn record(&self, request: CreateReadingRequest) -> Result<Reading, ServiceError> {
        validate_reading_request(&request)?;

        let metric = MetricKind::parse(&request.metric);
        let value = request.reading_value();
        let timestamp = request
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);
        let unit = request
            .unit
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| metric.default_unit().to_string());

        let reading = Reading {
            id: Uuid::new_v4().to_string(),
            member_id: request.member_id,
            metric,
            value,
            unit,
            timestamp,
            notes: request.notes,
        };

        let mut stored = load_collection_for_write::<StoredReading, _>(&self.store, collections::READINGS)?;
        stored.push(convert_to_data_reading(&reading));
        stored.save(&self.store)?;

        info!("Recorded {} reading {} for member {}", reading.metric, reading.id, reading.member_id);
        Ok(reading)
    }

    /// Readings of one metric for a member, most recent first
    pub fn readings_for(&self, member_id: &str, metric: &MetricKind) -> Vec<Reading> {
        let mut readings: Vec<Reading> = self
            .load_readings()
            .into_iter()
            .filter(|r| r.member_id == member_id && &r.metric == metric)
            .collect();
        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        readings
    }

    /// Latest status and trend of every metric recorded for a member
    pub fn overview(&self, member_id: &str) -> MetricsOverview {
        let mut readings: Vec<Reading> = self
            .load_readings()
            .into_iter()
            .filter(|r| r.member_id == member_id)
            .collect();
        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut by_metric: BTreeMap<MetricKind, Vec<Reading>> = BTreeMap::new();
        for reading in readings {
            by_metric.entry(reading.metric.clone()).or_default().push(reading);
        }

        let metrics: Vec<MetricOverview> = by_metric
            .into_iter()
            .filter_map(|(metric, group)| {
                let latest = group.first()?.clone();
                Some(MetricOverview {
                    status: classify_reading(&latest),
                    trend: trend_for(&metric, &group),
                    reading_count: group.len(),
                    metric,
                    latest,
                })
            })
            .collect();

        let summary = summarize_statuses(metrics.iter().map(|m| m.status), self.attention_threshold);

        MetricsOverview {
            member_id: member_id.to_string(),
            metrics,
            summary,
        }
    }
}
