//! # Common Types
//!
//! This module contains the records returned by the mobility API and the
//! small shapes that flow between the aggregators and the chart renderers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single trip as returned by `GET /trips`.
///
/// Timestamps are kept as the raw server strings so aggregators can skip
/// values they cannot parse instead of failing the whole response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// Unique trip identifier
    pub trip_id: i64,
    /// Identifier of the vendor that served the trip
    pub vendor_id: String,
    /// Pickup zone identifier
    #[serde(default)]
    pub pickup_id: Option<i64>,
    /// Dropoff zone identifier
    #[serde(default)]
    pub dropoff_id: Option<i64>,
    #[serde(default)]
    pub pickup_datetime: Option<String>,
    #[serde(default)]
    pub dropoff_datetime: Option<String>,
    /// Distance in miles
    #[serde(default)]
    pub trip_miles: Option<f64>,
    #[serde(default)]
    pub trip_duration_hours: Option<f64>,
    #[serde(default)]
    pub average_speed_mph: Option<f64>,
    /// Base fare in USD
    #[serde(default)]
    pub base_passenger_fare: Option<f64>,
    #[serde(default)]
    pub driver_pay: Option<f64>,
}

impl TripRecord {
    /// Trip duration in minutes, if the server reported one.
    pub fn duration_minutes(&self) -> Option<f64> {
        self.trip_duration_hours.map(|hours| hours * 60.0)
    }
}

/// An entry of the vendor directory (`GET /vendors`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub vendor_id: String,
    #[serde(default)]
    pub vendor_name: Option<String>,
}

/// Ranked vendor performance (`GET /insights/top-vendors`).
///
/// Ranking is computed by the server; the client only maps ids to names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorPerformance {
    pub vendor_id: String,
    #[serde(default)]
    pub trip_count: u64,
    #[serde(default)]
    pub avg_base_fare: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
}

/// A taxi zone (`GET /locations`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub location_id: i64,
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub service_zone: Option<String>,
}

/// Aggregate trip statistics (`GET /trips/summary`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    #[serde(default)]
    pub total_trips: u64,
    #[serde(default)]
    pub avg_trip_miles: Option<f64>,
    #[serde(default)]
    pub avg_trip_duration_minutes: Option<f64>,
    #[serde(default)]
    pub avg_speed_mph: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub total_driver_pay: Option<f64>,
}

/// Global counts (`GET /insights/overview`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightOverview {
    #[serde(default)]
    pub total_trips: u64,
    #[serde(default)]
    pub unique_vendors: u64,
    #[serde(default)]
    pub unique_locations: u64,
    #[serde(default)]
    pub avg_base_fare: Option<f64>,
    #[serde(default)]
    pub avg_extra_charges: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FareStatistics {
    #[serde(default)]
    pub min_fare: f64,
    #[serde(default)]
    pub max_fare: f64,
    #[serde(default)]
    pub avg_fare: f64,
    #[serde(default)]
    pub total_with_fares: u64,
}

/// Server-computed outlier detection statistics
/// (`GET /insights/algorithm-performance`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmPerformance {
    #[serde(default)]
    pub algorithm_status: String,
    #[serde(default)]
    pub total_trips_analyzed: u64,
    #[serde(default)]
    pub outliers_detected: u64,
    #[serde(default)]
    pub outlier_percentage: f64,
    #[serde(default)]
    pub fare_statistics: FareStatistics,
    #[serde(default)]
    pub algorithm_complexity: String,
    #[serde(default)]
    pub data_quality_score: f64,
}

/// One labelled value of a chart series.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A point with a numeric x coordinate, used by scatter plots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XyPoint {
    pub x: f64,
    pub y: f64,
}

/// Result of a group-by tally. `labels[i]` was counted `counts[i]` times.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryTally {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

impl CategoryTally {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn to_series(&self) -> Vec<SeriesPoint> {
        self.labels
            .iter()
            .zip(&self.counts)
            .map(|(label, count)| SeriesPoint::new(label.clone(), *count as f64))
            .collect()
    }
}

/// Maps vendor identifiers to display names.
#[derive(Clone, Debug, Default)]
pub struct VendorDirectory {
    names: HashMap<String, String>,
}

impl VendorDirectory {
    /// Record every vendor of a `/vendors` response, replacing earlier names.
    pub fn extend(&mut self, vendors: &[VendorRecord]) {
        for vendor in vendors {
            let name = vendor
                .vendor_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| vendor.vendor_id.clone());
            self.names.insert(vendor.vendor_id.clone(), name);
        }
    }

    /// Display name for a vendor id, or the id itself when unknown.
    pub fn name_for<'a>(&'a self, vendor_id: &'a str) -> &'a str {
        self.names
            .get(vendor_id)
            .map(String::as_str)
            .unwrap_or(vendor_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trip_record_tolerates_missing_fields() {
        let trip: TripRecord = serde_json::from_str(
            r#"{"trip_id": 7, "vendor_id": "HV0003", "trip_miles": 2.5}"#,
        )
        .unwrap();
        assert_eq!(trip.trip_id, 7);
        assert_eq!(trip.trip_miles, Some(2.5));
        assert!(trip.pickup_datetime.is_none());
        assert!(trip.duration_minutes().is_none());
    }

    #[test]
    fn vendor_directory_falls_back_to_id() {
        let mut directory = VendorDirectory::default();
        directory.extend(&[
            VendorRecord {
                vendor_id: "HV0003".to_string(),
                vendor_name: Some("Uber".to_string()),
            },
            VendorRecord {
                vendor_id: "HV0005".to_string(),
                vendor_name: None,
            },
        ]);

        assert_eq!(directory.name_for("HV0003"), "Uber");
        assert_eq!(directory.name_for("HV0005"), "HV0005");
        assert_eq!(directory.name_for("HV9999"), "HV9999");
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn tally_converts_to_series() {
        let tally = CategoryTally {
            labels: vec!["Queens".to_string(), "Bronx".to_string()],
            counts: vec![3, 1],
        };
        assert_eq!(tally.total(), 4);
        assert_eq!(
            tally.to_series(),
            vec![SeriesPoint::new("Queens", 3.0), SeriesPoint::new("Bronx", 1.0)]
        );
    }
}
