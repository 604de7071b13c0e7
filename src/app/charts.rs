//! Builders turning fetched records into the five dashboard charts.

use crate::plotting::{Chart, ChartKind, Mark, Series, ValueAxis, ValueFormat};
use crate::types::{LocationRecord, SeriesPoint, TripRecord, VendorDirectory, VendorPerformance};
use crate::utils::{bucket_by_hour, fare_scatter, group_by_category};

/// Hourly pickups of a trip sample as a line chart.
pub fn trip_volume(trips: &[TripRecord]) -> Chart {
    let hourly = if trips.is_empty() {
        Vec::new()
    } else {
        bucket_by_hour(trips, |trip| trip.pickup_datetime.as_deref())
    };
    Chart::categories(
        "Trip Volume by Hour",
        ChartKind::Line,
        vec![Series::new("Number of Trips", hourly, Mark::Line).with_unit("trips")],
    )
    .with_axis_titles(Some("Hour of Day"), Some("Trips"), None)
}

/// Trip counts of the ranked vendors, named through `directory`.
pub fn vendor_performance(vendors: &[VendorPerformance], directory: &VendorDirectory) -> Chart {
    let points = vendors
        .iter()
        .map(|v| SeriesPoint::new(directory.name_for(&v.vendor_id), v.trip_count as f64))
        .collect();
    Chart::categories(
        "Vendor Performance",
        ChartKind::Bar,
        vec![Series::new("Trip Count", points, Mark::Bar).with_unit("trips")],
    )
}

pub fn distance_fare(trips: &[TripRecord]) -> Chart {
    Chart::scatter("Trip Distance vs Fare", fare_scatter(trips)).with_axis_titles(
        Some("Trip Distance (miles)"),
        Some("Base Passenger Fare ($)"),
        None,
    )
}

/// Share of zones per borough. Zones without a borough count as `Unknown`.
pub fn borough_share(locations: &[LocationRecord]) -> Chart {
    let tally = group_by_category(locations, |l| l.borough.as_deref(), "Unknown");
    Chart::categories(
        "Zones by Borough",
        ChartKind::Doughnut,
        vec![Series::new("Zones", tally.to_series(), Mark::Bar).with_unit("zones")],
    )
}

/// Total revenue bars with the average base fare on a second axis.
pub fn revenue_analysis(vendors: &[VendorPerformance], directory: &VendorDirectory) -> Chart {
    let named = |value: fn(&VendorPerformance) -> f64| -> Vec<SeriesPoint> {
        vendors
            .iter()
            .map(|v| SeriesPoint::new(directory.name_for(&v.vendor_id), value(v)))
            .collect()
    };
    let revenue = Series::new(
        "Total Revenue",
        named(|v| v.total_revenue.unwrap_or(0.0)),
        Mark::Bar,
    )
    .formatted(ValueFormat::CompactCurrency);
    let fare = Series::new(
        "Avg Base Fare",
        named(|v| v.avg_base_fare.unwrap_or(0.0)),
        Mark::Line,
    )
    .on_axis(ValueAxis::Secondary)
    .formatted(ValueFormat::Currency);

    Chart::categories("Revenue Analysis", ChartKind::Combo, vec![revenue, fare])
        .with_axis_titles(None, Some("Total Revenue ($)"), Some("Avg Fare ($)"))
}
