use chrono::Timelike;
use std::collections::HashMap;

use super::format::hour_label;
use super::time::parse_local_timestamp;
use crate::types::{CategoryTally, SeriesPoint, TripRecord, TripSummary, XyPoint};

pub const HOURS_PER_DAY: usize = 24;

/// Count records per local hour of day.
///
/// Always returns 24 points labelled `00:00`..`23:00` in hour order. Records
/// whose timestamp is missing or unparsable are skipped.
pub fn bucket_by_hour<T, F>(records: &[T], timestamp: F) -> Vec<SeriesPoint>
where
    F: Fn(&T) -> Option<&str>,
{
    let mut counts = [0usize; HOURS_PER_DAY];

    for record in records {
        if let Some(parsed) = timestamp(record).and_then(parse_local_timestamp) {
            counts[parsed.hour() as usize] += 1;
        }
    }

    counts
        .iter()
        .enumerate()
        .map(|(hour, count)| SeriesPoint::new(hour_label(hour as u32), *count as f64))
        .collect()
}

/// Tally records by category in first-seen order.
///
/// Records without a category (or with an empty one) are counted under
/// `fallback`.
pub fn group_by_category<T, F>(records: &[T], category: F, fallback: &str) -> CategoryTally
where
    F: Fn(&T) -> Option<&str>,
{
    let mut tally = CategoryTally::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in records {
        let label = category(record)
            .filter(|value| !value.is_empty())
            .unwrap_or(fallback);

        match positions.get(label) {
            Some(&idx) => tally.counts[idx] += 1,
            None => {
                positions.insert(label.to_string(), tally.labels.len());
                tally.labels.push(label.to_string());
                tally.counts.push(1);
            }
        }
    }

    tally
}

/// Keep the first `n` entries of an already ranked list.
pub fn top_n<T>(ranked: &[T], n: usize) -> &[T] {
    &ranked[..n.min(ranked.len())]
}

/// Hour with the most trips. Ties go to the later hour; `None` when every
/// bucket is empty.
pub fn peak_hour(hourly: &[SeriesPoint]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (hour, point) in hourly.iter().enumerate() {
        if point.value <= 0.0 {
            continue;
        }
        match best {
            Some((_, value)) if point.value < value => {}
            _ => best = Some((hour, point.value)),
        }
    }
    best.map(|(hour, _)| hour)
}

/// Distance/fare pairs for trips that report both values.
pub fn fare_scatter(trips: &[TripRecord]) -> Vec<XyPoint> {
    trips
        .iter()
        .filter_map(|trip| match (trip.trip_miles, trip.base_passenger_fare) {
            (Some(x), Some(y)) if x != 0.0 && y != 0.0 => Some(XyPoint { x, y }),
            _ => None,
        })
        .collect()
}

/// Average revenue per trip, or `None` without trips or revenue.
pub fn revenue_per_trip(summary: &TripSummary) -> Option<f64> {
    match (summary.total_revenue, summary.total_trips) {
        (Some(revenue), trips) if trips > 0 => Some(revenue / trips as f64),
        _ => None,
    }
}
