//! Display rows and cards. Every string is formatted here so the egui layer
//! only lays things out.

use crate::types::{
    AlgorithmPerformance, InsightOverview, LocationRecord, TripRecord, TripSummary,
    VendorDirectory, VendorPerformance, VendorRecord,
};
use crate::utils::format::{
    format_count, format_currency, format_currency_opt, format_datetime, format_distance,
    format_duration, format_percentage, format_speed, hour_label, MISSING,
};
use crate::utils::revenue_per_trip;

const UNKNOWN: &str = "Unknown";

/// One line of the trips table.
#[derive(Clone, Debug, PartialEq)]
pub struct TripRow {
    pub trip_id: String,
    pub vendor: String,
    pub pickup: String,
    pub dropoff: String,
    pub distance: String,
    pub duration: String,
    pub fare: String,
    pub speed: String,
}

impl TripRow {
    pub fn from_trip(trip: &TripRecord) -> Self {
        Self {
            trip_id: trip.trip_id.to_string(),
            vendor: trip.vendor_id.clone(),
            pickup: format_datetime(trip.pickup_datetime.as_deref()),
            dropoff: format_datetime(trip.dropoff_datetime.as_deref()),
            distance: format_distance(trip.trip_miles),
            duration: format_duration(trip.duration_minutes()),
            fare: format_currency_opt(trip.base_passenger_fare),
            speed: format_speed(trip.average_speed_mph),
        }
    }

    pub fn rows(trips: &[TripRecord]) -> Vec<TripRow> {
        trips.iter().map(Self::from_trip).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VendorCard {
    pub rank: usize,
    pub vendor_id: String,
    pub name: String,
    pub id_label: String,
}

impl VendorCard {
    pub fn cards(vendors: &[VendorRecord]) -> Vec<VendorCard> {
        vendors
            .iter()
            .enumerate()
            .map(|(index, vendor)| VendorCard {
                rank: index + 1,
                vendor_id: vendor.vendor_id.clone(),
                name: vendor
                    .vendor_name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| vendor.vendor_id.clone()),
                id_label: format!("ID: {}", vendor.vendor_id),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocationCard {
    pub location_id: i64,
    pub title: String,
    pub borough: String,
    pub zone: String,
}

impl LocationCard {
    pub fn from_location(location: &LocationRecord) -> Self {
        Self {
            location_id: location.location_id,
            title: format!("Zone {}", location.location_id),
            borough: non_empty(location.borough.as_deref()).unwrap_or(UNKNOWN).to_string(),
            zone: non_empty(location.zone.as_deref()).unwrap_or(UNKNOWN).to_string(),
        }
    }

    /// Entry of the location filter drop-down: `"132 - JFK Airport"`.
    pub fn option_label(location: &LocationRecord) -> String {
        let name = non_empty(location.zone.as_deref())
            .or_else(|| non_empty(location.borough.as_deref()))
            .unwrap_or(UNKNOWN);
        format!("{} - {}", location.location_id, name)
    }
}

/// A labelled headline number.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricTile {
    pub label: &'static str,
    pub value: String,
}

impl MetricTile {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }

    /// Headline tiles of the dashboard section.
    pub fn dashboard(overview: &InsightOverview, summary: &TripSummary) -> Vec<MetricTile> {
        vec![
            Self::new("Total Trips", format_count(overview.total_trips)),
            Self::new("Active Vendors", format_count(overview.unique_vendors)),
            Self::new("Total Revenue", format_currency_opt(summary.total_revenue)),
            Self::new("Avg Duration", format_duration(summary.avg_trip_duration_minutes)),
        ]
    }

    /// System overview tiles of the insights section.
    pub fn overview(overview: &InsightOverview) -> Vec<MetricTile> {
        vec![
            Self::new("Total Trips", format_count(overview.total_trips)),
            Self::new("Unique Vendors", format_count(overview.unique_vendors)),
            Self::new("Unique Locations", format_count(overview.unique_locations)),
            Self::new("Avg Base Fare", format_currency_opt(overview.avg_base_fare)),
        ]
    }

    pub fn analytics(summary: &TripSummary, peak_hour: Option<usize>) -> Vec<MetricTile> {
        vec![
            Self::new("Avg Distance", format_distance(summary.avg_trip_miles)),
            Self::new("Avg Speed", format_speed(summary.avg_speed_mph)),
            Self::new(
                "Revenue per Trip",
                format_currency_opt(revenue_per_trip(summary)),
            ),
            Self::new(
                "Peak Hour",
                peak_hour
                    .map(|hour| hour_label(hour as u32))
                    .unwrap_or_else(|| MISSING.to_string()),
            ),
        ]
    }
}

/// Entry of the "Top Performing Vendors" list.
#[derive(Clone, Debug, PartialEq)]
pub struct VendorRankRow {
    pub rank: usize,
    pub name: String,
    pub trips: String,
    pub revenue: String,
    /// The podium (first three) is highlighted.
    pub highlighted: bool,
}

impl VendorRankRow {
    /// Rows in server order; the ranking itself is never recomputed.
    pub fn ranked(vendors: &[VendorPerformance], directory: &VendorDirectory) -> Vec<VendorRankRow> {
        vendors
            .iter()
            .enumerate()
            .map(|(index, vendor)| VendorRankRow {
                rank: index + 1,
                name: directory.name_for(&vendor.vendor_id).to_string(),
                trips: format!("{} trips", format_count(vendor.trip_count)),
                revenue: format_currency_opt(vendor.total_revenue),
                highlighted: index < 3,
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AlgorithmCard {
    pub status: String,
    pub complexity: String,
    pub trips_analyzed: String,
    pub outliers_detected: String,
    pub outlier_rate: String,
    pub quality_score: String,
    pub min_fare: String,
    pub max_fare: String,
    pub avg_fare: String,
}

impl AlgorithmCard {
    pub fn from_performance(stats: &AlgorithmPerformance) -> Self {
        Self {
            status: non_empty(Some(&stats.algorithm_status))
                .unwrap_or("Custom IQR Detection")
                .to_string(),
            complexity: non_empty(Some(&stats.algorithm_complexity))
                .unwrap_or("O(n log n)")
                .to_string(),
            trips_analyzed: format_count(stats.total_trips_analyzed),
            outliers_detected: format_count(stats.outliers_detected),
            outlier_rate: format_percentage(stats.outlier_percentage, 2),
            quality_score: format_percentage(stats.data_quality_score, 1),
            min_fare: format_currency(stats.fare_statistics.min_fare),
            max_fare: format_currency(stats.fare_statistics.max_fare),
            avg_fare: format_currency(stats.fare_statistics.avg_fare),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trip_row_formatting() {
        let trip = TripRecord {
            trip_id: 42,
            vendor_id: "HV0003".to_string(),
            pickup_datetime: Some("2024-01-01T08:15:00".to_string()),
            trip_miles: Some(2.345),
            trip_duration_hours: Some(1.5),
            base_passenger_fare: Some(1234.5),
            ..Default::default()
        };
        let row = TripRow::from_trip(&trip);
        assert_eq!(row.trip_id, "42");
        assert_eq!(row.pickup, "Jan 1, 08:15 AM");
        assert_eq!(row.dropoff, "-");
        assert_eq!(row.distance, "2.35 mi");
        assert_eq!(row.duration, "1h 30m");
        assert_eq!(row.fare, "$1,234.50");
        assert_eq!(row.speed, "-");
    }

    #[test]
    fn test_location_labels_fall_back() {
        let location = LocationRecord {
            location_id: 264,
            borough: Some("".to_string()),
            ..Default::default()
        };
        let card = LocationCard::from_location(&location);
        assert_eq!(card.title, "Zone 264");
        assert_eq!(card.borough, "Unknown");
        assert_eq!(LocationCard::option_label(&location), "264 - Unknown");

        let airport = LocationRecord {
            location_id: 132,
            borough: Some("Queens".to_string()),
            zone: Some("JFK Airport".to_string()),
            ..Default::default()
        };
        assert_eq!(LocationCard::option_label(&airport), "132 - JFK Airport");
    }

    #[test]
    fn test_vendor_ranking_uses_directory_names() {
        let mut directory = VendorDirectory::default();
        directory.extend(&[VendorRecord {
            vendor_id: "HV0003".to_string(),
            vendor_name: Some("Uber".to_string()),
        }]);
        let ranked = VendorRankRow::ranked(
            &[
                VendorPerformance {
                    vendor_id: "HV0003".to_string(),
                    trip_count: 12_345,
                    total_revenue: Some(250_000.0),
                    ..Default::default()
                },
                VendorPerformance {
                    vendor_id: "HV0005".to_string(),
                    trip_count: 10,
                    ..Default::default()
                },
            ],
            &directory,
        );

        assert_eq!(ranked[0].name, "Uber");
        assert_eq!(ranked[0].trips, "12,345 trips");
        assert_eq!(ranked[0].revenue, "$250,000.00");
        assert_eq!(ranked[1].name, "HV0005");
        assert_eq!(ranked[1].revenue, "-");
        assert!(ranked.iter().all(|row| row.highlighted));
    }

    #[test]
    fn test_analytics_tiles() {
        let summary = TripSummary {
            total_trips: 4,
            avg_trip_miles: Some(3.5),
            total_revenue: Some(100.0),
            ..Default::default()
        };
        let tiles = MetricTile::analytics(&summary, Some(8));
        let values: Vec<&str> = tiles.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["3.50 mi", "-", "$25.00", "08:00"]);
    }

    #[test]
    fn test_algorithm_card_defaults() {
        let card = AlgorithmCard::from_performance(&AlgorithmPerformance {
            outlier_percentage: 3.456,
            data_quality_score: 96.544,
            ..Default::default()
        });
        assert_eq!(card.status, "Custom IQR Detection");
        assert_eq!(card.complexity, "O(n log n)");
        assert_eq!(card.outlier_rate, "3.46%");
        assert_eq!(card.quality_score, "96.5%");
        assert_eq!(card.min_fare, "$0.00");
    }
}
