//! Request paths for every endpoint the dashboard reads.
//!
//! Parameters are appended in a fixed order and empty filters are omitted, so
//! the same filter set always produces the same path (and cache key).

use chrono::NaiveDate;

/// Column the trip table is sorted by. The wire names match the API's trip
/// fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortField {
    TripId,
    Pickup,
    Dropoff,
    Distance,
    Duration,
    Fare,
    Speed,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::TripId,
        SortField::Pickup,
        SortField::Dropoff,
        SortField::Distance,
        SortField::Duration,
        SortField::Fare,
        SortField::Speed,
    ];

    pub fn api_name(self) -> &'static str {
        match self {
            SortField::TripId => "trip_id",
            SortField::Pickup => "pickup_datetime",
            SortField::Dropoff => "dropoff_datetime",
            SortField::Distance => "trip_miles",
            SortField::Duration => "trip_duration_hours",
            SortField::Fare => "base_passenger_fare",
            SortField::Speed => "average_speed_mph",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SortField::TripId => "Trip ID",
            SortField::Pickup => "Pickup",
            SortField::Dropoff => "Dropoff",
            SortField::Distance => "Distance",
            SortField::Duration => "Duration",
            SortField::Fare => "Fare",
            SortField::Speed => "Speed",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn api_name(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Inclusive pickup date range shared by every date-filtered endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    fn append_to(&self, params: &mut QueryParams) {
        params.push_opt("start_date", self.start.map(|d| d.format("%Y-%m-%d").to_string()));
        params.push_opt("end_date", self.end.map(|d| d.format("%Y-%m-%d").to_string()));
    }
}

/// Parameters of a `GET /trips` page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripQuery {
    pub limit: usize,
    pub offset: usize,
    pub vendor_id: Option<String>,
    pub search: Option<String>,
    pub range: DateRange,
    pub sort: Option<(SortField, SortDirection)>,
}

#[derive(Default)]
struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    fn push(&mut self, key: &'static str, value: impl ToString) {
        self.0.push((key, value.to_string()));
    }

    fn push_opt(&mut self, key: &'static str, value: Option<String>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.0.push((key, value));
        }
    }

    fn to_path(&self, path: &str) -> String {
        if self.0.is_empty() {
            return path.to_string();
        }
        let query: Vec<String> = self
            .0
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();
        format!("{}?{}", path, query.join("&"))
    }
}

pub fn trips(query: &TripQuery) -> String {
    let mut params = QueryParams::default();
    params.push("limit", query.limit);
    params.push("offset", query.offset);
    params.push_opt("vendor_id", query.vendor_id.clone());
    params.push_opt("search", query.search.clone());
    query.range.append_to(&mut params);
    if let Some((field, direction)) = query.sort {
        params.push("sort_by", field.api_name());
        params.push("sort_order", direction.api_name());
    }
    params.to_path("/trips")
}

/// A large unpaginated trip sample used for charts and analytics.
pub fn trip_sample(limit: usize, range: &DateRange) -> String {
    let mut params = QueryParams::default();
    params.push("limit", limit);
    range.append_to(&mut params);
    params.to_path("/trips")
}

pub fn trip_summary(range: &DateRange) -> String {
    let mut params = QueryParams::default();
    range.append_to(&mut params);
    params.to_path("/trips/summary")
}

pub fn vendors() -> String {
    "/vendors".to_string()
}

pub fn locations(limit: usize, offset: usize) -> String {
    let mut params = QueryParams::default();
    params.push("limit", limit);
    params.push("offset", offset);
    params.to_path("/locations")
}

/// Trips that start or end in `location_id`, newest first. The endpoint
/// takes no other trip filters.
pub fn location_trips(location_id: i64, limit: usize, offset: usize) -> String {
    let mut params = QueryParams::default();
    params.push("role", "both");
    params.push("limit", limit);
    params.push("offset", offset);
    params.to_path(&format!("/locations/{}/trips", location_id))
}

pub fn insights_overview(range: &DateRange) -> String {
    let mut params = QueryParams::default();
    range.append_to(&mut params);
    params.to_path("/insights/overview")
}

pub fn top_vendors(limit: usize, range: &DateRange) -> String {
    let mut params = QueryParams::default();
    params.push("limit", limit);
    range.append_to(&mut params);
    params.to_path("/insights/top-vendors")
}

pub fn algorithm_performance() -> String {
    "/insights/algorithm-performance".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_trips_path_minimal() {
        let query = TripQuery {
            limit: 10,
            offset: 0,
            ..Default::default()
        };
        assert_eq!(trips(&query), "/trips?limit=10&offset=0");
    }

    #[test]
    fn test_trips_path_full() {
        let query = TripQuery {
            limit: 25,
            offset: 50,
            vendor_id: Some("HV0003".to_string()),
            search: Some("air port&co".to_string()),
            range: DateRange {
                start: Some(date("2024-01-01")),
                end: Some(date("2024-01-31")),
            },
            sort: Some((SortField::Fare, SortDirection::Asc)),
        };
        assert_eq!(
            trips(&query),
            "/trips?limit=25&offset=50&vendor_id=HV0003&search=air%20port%26co\
             &start_date=2024-01-01&end_date=2024-01-31\
             &sort_by=base_passenger_fare&sort_order=asc"
        );
    }

    #[test]
    fn test_search_is_percent_encoded() {
        let query = TripQuery {
            limit: 10,
            offset: 0,
            search: Some("JFK/LGA ~ café".to_string()),
            ..Default::default()
        };
        assert_eq!(
            trips(&query),
            "/trips?limit=10&offset=0&search=JFK%2FLGA%20~%20caf%C3%A9"
        );
    }

    #[test]
    fn test_empty_filters_are_omitted() {
        let query = TripQuery {
            limit: 10,
            offset: 10,
            vendor_id: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(trips(&query), "/trips?limit=10&offset=10");
    }

    #[test]
    fn test_date_filtered_endpoints() {
        let range = DateRange {
            start: Some(date("2024-02-01")),
            end: None,
        };
        assert_eq!(trip_summary(&DateRange::default()), "/trips/summary");
        assert_eq!(trip_summary(&range), "/trips/summary?start_date=2024-02-01");
        assert_eq!(
            insights_overview(&range),
            "/insights/overview?start_date=2024-02-01"
        );
        assert_eq!(
            top_vendors(8, &range),
            "/insights/top-vendors?limit=8&start_date=2024-02-01"
        );
        assert_eq!(
            trip_sample(1000, &range),
            "/trips?limit=1000&start_date=2024-02-01"
        );
    }

    #[test]
    fn test_static_endpoints() {
        assert_eq!(vendors(), "/vendors");
        assert_eq!(locations(12, 24), "/locations?limit=12&offset=24");
        assert_eq!(
            location_trips(132, 10, 20),
            "/locations/132/trips?role=both&limit=10&offset=20"
        );
        assert_eq!(algorithm_performance(), "/insights/algorithm-performance");
    }

    #[test]
    fn test_sort_direction_toggle() {
        assert_eq!(SortDirection::default(), SortDirection::Desc);
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(SortField::Pickup.api_name(), "pickup_datetime");
    }
}
