use chrono::NaiveDate;
use std::time::{Duration, Instant};

use crate::api::{DateRange, SortDirection, SortField};
use crate::config::{DashboardConfig, Theme};

/// How long a toast stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// User-selected trip filters
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filters {
    pub vendor: Option<String>,
    pub location: Option<i64>,
    /// Applied search text; the text box content lives in the controller
    /// until the debounce window closes
    pub search: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Filters {
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn is_active(&self) -> bool {
        *self != Filters::default()
    }
}

/// Trip table ordering. No field means server default order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl Sort {
    /// Column-header click: the same field flips direction, a new field
    /// starts ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == Some(field) {
            self.direction = self.direction.toggled();
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn as_query(&self) -> Option<(SortField, SortDirection)> {
        self.field.map(|field| (field, self.direction))
    }
}

/// 1-based page cursor over an endpoint without a total count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
    last_count: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            last_count: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    /// Move by `delta` pages. Returns `false` (and stays put) when the move
    /// would go below page 1.
    pub fn step(&mut self, delta: i64) -> bool {
        let target = self.page as i64 + delta;
        if target < 1 || delta == 0 {
            return false;
        }
        self.page = target as usize;
        true
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Remember how many rows the last page returned.
    pub fn record(&mut self, count: usize) {
        self.last_count = count;
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// A full page suggests there may be more.
    pub fn has_next(&self) -> bool {
        self.last_count >= self.page_size
    }

    /// `"Showing 11-20"`
    pub fn range_label(&self) -> String {
        if self.last_count == 0 {
            return "No results".to_string();
        }
        let start = self.offset() + 1;
        format!("Showing {}-{}", start, start + self.last_count - 1)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    Dashboard,
    Trips,
    Vendors,
    Locations,
    Insights,
    Analytics,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Dashboard,
        Section::Trips,
        Section::Vendors,
        Section::Locations,
        Section::Insights,
        Section::Analytics,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Trips => "Trips",
            Section::Vendors => "Vendors",
            Section::Locations => "Locations",
            Section::Insights => "Insights",
            Section::Analytics => "Analytics",
        }
    }
}

/// Load state of one panel.
#[derive(Clone, Debug, PartialEq)]
pub enum Loadable<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    raised_at: Instant,
}

/// Transient notifications, newest last.
#[derive(Clone, Debug)]
pub struct Toasts {
    items: Vec<Toast>,
    ttl: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        self.items.push(Toast {
            kind,
            message: message.into(),
            raised_at: now,
        });
    }

    /// Drop toasts older than the time-to-live.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|toast| now.saturating_duration_since(toast.raised_at) < ttl);
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn last(&self) -> Option<&Toast> {
        self.items.last()
    }
}

/// Everything the user has selected. Owned by the controller on the UI thread.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub filters: Filters,
    pub sort: Sort,
    pub trips_page: Pagination,
    pub locations_page: Pagination,
    pub section: Section,
    pub theme: Theme,
}

impl ViewState {
    pub fn new(config: &DashboardConfig, theme: Theme) -> Self {
        Self {
            filters: Filters::default(),
            sort: Sort::default(),
            trips_page: Pagination::new(config.trips_page_size),
            locations_page: Pagination::new(config.locations_page_size),
            section: Section::default(),
            theme,
        }
    }

    /// Whether anything "Clear filters" would reset is set, the sort included.
    pub fn has_active_filters(&self) -> bool {
        self.filters.is_active() || self.sort.field.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sort_toggle() {
        let mut sort = Sort::default();
        assert_eq!(sort.as_query(), None);
        assert_eq!(sort.direction, SortDirection::Desc);

        sort.toggle(SortField::Fare);
        assert_eq!(sort.as_query(), Some((SortField::Fare, SortDirection::Asc)));
        sort.toggle(SortField::Fare);
        assert_eq!(sort.as_query(), Some((SortField::Fare, SortDirection::Desc)));
        sort.toggle(SortField::Distance);
        assert_eq!(sort.as_query(), Some((SortField::Distance, SortDirection::Asc)));
    }

    #[test]
    fn test_page_never_below_one() {
        let mut pages = Pagination::new(10);
        assert!(!pages.step(-1));
        assert_eq!(pages.page(), 1);
        assert!(pages.step(1));
        assert!(pages.step(1));
        assert_eq!(pages.offset(), 20);
        assert!(!pages.step(-5));
        assert_eq!(pages.page(), 3);
        pages.reset();
        assert_eq!(pages.offset(), 0);
    }

    #[test]
    fn test_pagination_labels() {
        let mut pages = Pagination::new(10);
        assert_eq!(pages.range_label(), "No results");
        pages.step(1);
        pages.record(10);
        assert_eq!(pages.range_label(), "Showing 11-20");
        assert!(pages.has_next());
        assert!(pages.has_previous());
        pages.record(4);
        assert!(!pages.has_next());

        pages.set_page_size(25);
        assert_eq!(pages.page(), 1);
    }

    #[test]
    fn test_filters_activity() {
        let mut filters = Filters::default();
        assert!(!filters.is_active());
        assert!(filters.date_range().is_empty());
        filters.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert!(filters.is_active());
        assert!(!filters.date_range().is_empty());
    }

    #[test]
    fn test_sort_counts_as_active_filter() {
        let mut state = ViewState::new(&DashboardConfig::default(), Theme::Dark);
        assert!(!state.has_active_filters());

        state.sort.toggle(SortField::Speed);
        assert!(state.has_active_filters());

        state.sort = Sort::default();
        state.filters.search = "airport".to_string();
        assert!(state.has_active_filters());
        state.filters = Filters::default();
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_toasts_expire() {
        let mut toasts = Toasts::new(Duration::from_secs(4));
        let start = Instant::now();
        toasts.push_at(ToastKind::Info, "Refreshing data...", start);
        toasts.push_at(ToastKind::Success, "Data refreshed", start + Duration::from_secs(3));

        toasts.prune(start + Duration::from_secs(2));
        assert_eq!(toasts.items().len(), 2);
        toasts.prune(start + Duration::from_secs(5));
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.last().unwrap().kind, ToastKind::Success);
        toasts.dismiss(0);
        assert!(toasts.items().is_empty());
    }

    #[test]
    fn test_loadable_accessors() {
        let ready: Loadable<u32> = Loadable::Ready(3);
        assert_eq!(ready.ready(), Some(&3));
        assert!(!ready.is_loading());
        let failed: Loadable<u32> = Loadable::Failed("HTTP 500".to_string());
        assert_eq!(failed.error(), Some("HTTP 500"));
        assert!(Loadable::<u32>::Loading.is_loading());
    }
}
