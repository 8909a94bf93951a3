use crate::entities::classification::TrendDirection;
use crate::entities::reading::{MetricKind, Reading, ScalarProjection};

/// Direction of `current` relative to `previous`
pub fn compare(current: f64, previous: f64) -> TrendDirection {
    if current > previous {
        TrendDirection::Up
    } else if current < previous {
        TrendDirection::Down
    } else {
        // Equal, or either side NaN
        TrendDirection::Stable
    }
}

/// Trend of `metric` over readings ordered most-recent-first
///
/// Only readings of `metric` whose value yields a number under `projection`
/// take part; the first two such readings are compared. Fewer than two gives
/// `Stable`.
pub fn trend(metric: &MetricKind, ordered_readings: &[Reading], projection: ScalarProjection) -> TrendDirection {
    let mut values = ordered_readings
        .iter()
        .filter(|reading| &reading.metric == metric)
        .filter_map(|reading| reading.value.as_ref()?.project(projection));

    match (values.next(), values.next()) {
        (Some(current), Some(previous)) => compare(current, previous),
        _ => TrendDirection::Stable,
    }
}

/// Trend using the metric's default projection (systolic for blood pressure)
pub fn trend_for(metric: &MetricKind, ordered_readings: &[Reading]) -> TrendDirection {
    trend(metric, ordered_readings, ScalarProjection::default_for(metric))
}
