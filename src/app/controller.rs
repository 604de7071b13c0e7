//! The dashboard controller.
//!
//! [`Dashboard`] lives on the UI thread and owns every piece of mutable view
//! state. Fetches run as tokio tasks and report back over an unbounded mpsc
//! channel which [`Dashboard::poll`] drains once per frame, so no state is
//! ever shared with a task except the client's response cache.
//!
//! Every panel load is tagged with a per-panel sequence number. A response
//! whose number is not the latest issued for its panel is discarded, so a
//! slow page-1 response can never overwrite page 2.

use chrono::NaiveDate;
use futures::future::try_join;
use log::{debug, error, info, warn};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::charts;
use super::debounce::Debouncer;
use super::state::{Loadable, Section, ToastKind, Toasts, ViewState};
use crate::api::{query, ApiClient, RequestError, SortField, TripQuery};
use crate::config::{DashboardConfig, Preferences, Theme};
use crate::plotting::{Chart, ChartRenderer, ChartTarget, ChartTheme, RendererKind, Surface, Surfaces};
use crate::types::{
    AlgorithmPerformance, InsightOverview, LocationRecord, TripRecord, TripSummary,
    VendorDirectory, VendorPerformance, VendorRecord,
};
use crate::utils::{bucket_by_hour, peak_hour};

/// Trips fetched for the hourly, scatter and peak-hour views.
const TRIP_SAMPLE: usize = 1000;
/// Locations fetched for the borough doughnut.
const BOROUGH_SAMPLE: usize = 300;
const VENDOR_CHART_LIMIT: usize = 8;
const RANKING_LIMIT: usize = 10;

/// An independently loading (and independently failing) part of the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    Metrics,
    Vendors,
    Locations,
    Trips,
    Overview,
    TopVendors,
    Algorithm,
    Analytics,
    Chart(ChartTarget),
}

/// Loaded at startup; the page is revealed once all of them settle.
pub const INITIAL_PANELS: [Panel; 6] = [
    Panel::Metrics,
    Panel::Vendors,
    Panel::Locations,
    Panel::Trips,
    Panel::Chart(ChartTarget::TripVolume),
    Panel::Chart(ChartTarget::VendorPerformance),
];

const DASHBOARD_PANELS: [Panel; 3] = [
    Panel::Metrics,
    Panel::Chart(ChartTarget::TripVolume),
    Panel::Chart(ChartTarget::VendorPerformance),
];

const INSIGHT_PANELS: [Panel; 3] = [Panel::Overview, Panel::TopVendors, Panel::Algorithm];

const ANALYTICS_PANELS: [Panel; 4] = [
    Panel::Analytics,
    Panel::Chart(ChartTarget::DistanceFare),
    Panel::Chart(ChartTarget::BoroughShare),
    Panel::Chart(ChartTarget::RevenueAnalysis),
];

/// Panels a section needs when it becomes active.
pub fn section_panels(section: Section) -> &'static [Panel] {
    match section {
        Section::Dashboard => &DASHBOARD_PANELS,
        Section::Trips => &[Panel::Trips],
        Section::Vendors => &[Panel::Vendors],
        Section::Locations => &[Panel::Locations],
        Section::Insights => &INSIGHT_PANELS,
        Section::Analytics => &ANALYTICS_PANELS,
    }
}

/// Overview counts and trip summary shown as the dashboard's headline tiles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardMetrics {
    pub overview: InsightOverview,
    pub summary: TripSummary,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalyticsSummary {
    pub summary: TripSummary,
    pub peak_hour: Option<usize>,
}

enum Payload {
    Metrics(DashboardMetrics),
    Vendors(Vec<VendorRecord>),
    Locations(Vec<LocationRecord>),
    Trips(Vec<TripRecord>),
    Overview(InsightOverview),
    TopVendors(Vec<VendorPerformance>),
    Algorithm(AlgorithmPerformance),
    Analytics(AnalyticsSummary),
    Chart(Chart),
}

enum Event {
    Loaded {
        panel: Panel,
        seq: u64,
        outcome: Result<Payload, RequestError>,
    },
    /// Debounce window closed for the search armed with this generation.
    SearchSettled(u64),
}

/// Panels whose completion is awaited together.
#[derive(Debug)]
struct LoadGroup {
    pending: HashSet<Panel>,
    failed: bool,
}

impl LoadGroup {
    fn new(panels: impl IntoIterator<Item = Panel>) -> Self {
        Self {
            pending: panels.into_iter().collect(),
            failed: false,
        }
    }

    /// Record a settled panel. Returns `true` once nothing is pending.
    fn settle(&mut self, panel: Panel, ok: bool) -> bool {
        if self.pending.remove(&panel) && !ok {
            self.failed = true;
        }
        self.pending.is_empty()
    }
}

pub struct Dashboard {
    client: ApiClient,
    runtime: Handle,
    preferences_path: Option<PathBuf>,
    renderer: Box<dyn ChartRenderer>,
    surfaces: Surfaces,
    state: ViewState,
    toasts: Toasts,
    directory: VendorDirectory,
    search_input: String,
    search: Debouncer,
    search_pending: bool,
    search_generation: u64,

    metrics: Loadable<DashboardMetrics>,
    vendors: Loadable<Vec<VendorRecord>>,
    locations: Loadable<Vec<LocationRecord>>,
    trips: Loadable<Vec<TripRecord>>,
    overview: Loadable<InsightOverview>,
    top_vendors: Loadable<Vec<VendorPerformance>>,
    algorithm: Loadable<AlgorithmPerformance>,
    analytics: Loadable<AnalyticsSummary>,
    charts: HashMap<ChartTarget, Loadable<Chart>>,

    seqs: HashMap<Panel, u64>,
    in_flight: usize,
    initial: Option<LoadGroup>,
    revealed: bool,
    refresh: Option<LoadGroup>,
    events_tx: UnboundedSender<Event>,
    events: UnboundedReceiver<Event>,
}

impl Dashboard {
    /// Create a controller whose fetches run on `runtime`.
    pub fn new(
        client: ApiClient,
        renderer: Box<dyn ChartRenderer>,
        config: &DashboardConfig,
        theme: Theme,
        runtime: Handle,
    ) -> Self {
        let (events_tx, events) = unbounded_channel();
        Self {
            client,
            runtime,
            preferences_path: None,
            renderer,
            surfaces: Surfaces::default(),
            state: ViewState::new(config, theme),
            toasts: Toasts::default(),
            directory: VendorDirectory::default(),
            search_input: String::new(),
            search: Debouncer::new(Duration::from_millis(config.search_debounce_ms)),
            search_pending: false,
            search_generation: 0,
            metrics: Loadable::Idle,
            vendors: Loadable::Idle,
            locations: Loadable::Idle,
            trips: Loadable::Idle,
            overview: Loadable::Idle,
            top_vendors: Loadable::Idle,
            algorithm: Loadable::Idle,
            analytics: Loadable::Idle,
            charts: ChartTarget::ALL
                .iter()
                .map(|target| (*target, Loadable::Idle))
                .collect(),
            seqs: HashMap::new(),
            in_flight: 0,
            initial: None,
            revealed: false,
            refresh: None,
            events_tx,
            events,
        }
    }

    /// Persist theme changes to `path`.
    pub fn with_preferences_path(mut self, path: Option<PathBuf>) -> Self {
        self.preferences_path = path;
        self
    }

    // ---- accessors ----

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut Toasts {
        &mut self.toasts
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn vendor_directory(&self) -> &VendorDirectory {
        &self.directory
    }

    pub fn metrics(&self) -> &Loadable<DashboardMetrics> {
        &self.metrics
    }

    pub fn vendors(&self) -> &Loadable<Vec<VendorRecord>> {
        &self.vendors
    }

    pub fn locations(&self) -> &Loadable<Vec<LocationRecord>> {
        &self.locations
    }

    pub fn trips(&self) -> &Loadable<Vec<TripRecord>> {
        &self.trips
    }

    pub fn overview(&self) -> &Loadable<InsightOverview> {
        &self.overview
    }

    pub fn top_vendors(&self) -> &Loadable<Vec<VendorPerformance>> {
        &self.top_vendors
    }

    pub fn algorithm(&self) -> &Loadable<AlgorithmPerformance> {
        &self.algorithm
    }

    pub fn analytics(&self) -> &Loadable<AnalyticsSummary> {
        &self.analytics
    }

    pub fn chart(&self, target: ChartTarget) -> Option<&Loadable<Chart>> {
        self.charts.get(&target)
    }

    pub fn surface(&self, target: ChartTarget) -> Option<&Surface> {
        self.surfaces.get(target)
    }

    pub fn renderer_kind(&self) -> RendererKind {
        self.renderer.kind()
    }

    /// `true` once every panel of the initial group has settled.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Whether any fetch or debounced search is still outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0 || self.search_pending
    }

    // ---- event pump ----

    /// Apply every event that has arrived since the last call. Returns `true`
    /// if anything was applied.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            self.handle(event);
            changed = true;
        }
        changed
    }

    /// Wait until no fetch or debounced search is outstanding.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            match self.events.recv().await {
                Some(event) => self.handle(event),
                None => break,
            }
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::SearchSettled(generation) => {
                if generation != self.search_generation {
                    debug!("Discarding superseded search (#{})", generation);
                    return;
                }
                self.apply_search();
            }
            Event::Loaded {
                panel,
                seq,
                outcome,
            } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if self.seqs.get(&panel) != Some(&seq) {
                    debug!("Discarding stale response for {:?} (#{})", panel, seq);
                    return;
                }
                let ok = outcome.is_ok();
                match outcome {
                    Ok(payload) => self.apply(panel, payload),
                    Err(err) => self.fail(panel, err),
                }
                self.settle_groups(panel, ok);
            }
        }
    }

    fn apply(&mut self, panel: Panel, payload: Payload) {
        match payload {
            Payload::Metrics(metrics) => self.metrics = Loadable::Ready(metrics),
            Payload::Vendors(vendors) => {
                self.directory.extend(&vendors);
                self.vendors = Loadable::Ready(vendors);
            }
            Payload::Locations(locations) => {
                self.state.locations_page.record(locations.len());
                self.locations = Loadable::Ready(locations);
            }
            Payload::Trips(trips) => {
                debug!("Loaded {} trips", trips.len());
                self.state.trips_page.record(trips.len());
                self.trips = Loadable::Ready(trips);
            }
            Payload::Overview(overview) => self.overview = Loadable::Ready(overview),
            Payload::TopVendors(vendors) => self.top_vendors = Loadable::Ready(vendors),
            Payload::Algorithm(stats) => self.algorithm = Loadable::Ready(stats),
            Payload::Analytics(summary) => self.analytics = Loadable::Ready(summary),
            Payload::Chart(chart) => match panel {
                Panel::Chart(target) => self.show_chart(target, chart),
                other => warn!("Chart payload delivered to {:?}", other),
            },
        }
    }

    fn fail(&mut self, panel: Panel, err: RequestError) {
        error!("Failed to load {:?}: {}", panel, err);
        let message = err.to_string();
        match panel {
            Panel::Metrics => self.metrics = Loadable::Failed(message),
            Panel::Vendors => self.vendors = Loadable::Failed(message),
            Panel::Locations => self.locations = Loadable::Failed(message),
            Panel::Trips => {
                self.trips = Loadable::Failed(message);
                self.toasts.push(ToastKind::Error, "Failed to load trips data");
            }
            Panel::Overview => self.overview = Loadable::Failed(message),
            Panel::TopVendors => self.top_vendors = Loadable::Failed(message),
            Panel::Algorithm => self.algorithm = Loadable::Failed(message),
            Panel::Analytics => {
                self.analytics = Loadable::Failed(message);
                self.toasts.push(ToastKind::Error, "Failed to load analytics data");
            }
            Panel::Chart(target) => {
                self.charts.insert(target, Loadable::Failed(message));
            }
        }
    }

    fn settle_groups(&mut self, panel: Panel, ok: bool) {
        if let Some(group) = self.initial.as_mut() {
            if group.settle(panel, ok) {
                info!("Initial data loaded");
                self.initial = None;
                self.revealed = true;
            }
        }
        if let Some(group) = self.refresh.as_mut() {
            if group.settle(panel, ok) {
                let failed = group.failed;
                self.refresh = None;
                if failed {
                    self.toasts.push(ToastKind::Error, "Failed to refresh data");
                } else {
                    self.toasts.push(ToastKind::Success, "Data refreshed successfully");
                }
            }
        }
    }

    fn set_loading(&mut self, panel: Panel) {
        match panel {
            Panel::Metrics => self.metrics = Loadable::Loading,
            Panel::Vendors => self.vendors = Loadable::Loading,
            Panel::Locations => self.locations = Loadable::Loading,
            Panel::Trips => self.trips = Loadable::Loading,
            Panel::Overview => self.overview = Loadable::Loading,
            Panel::TopVendors => self.top_vendors = Loadable::Loading,
            Panel::Algorithm => self.algorithm = Loadable::Loading,
            Panel::Analytics => self.analytics = Loadable::Loading,
            Panel::Chart(target) => {
                self.charts.insert(target, Loadable::Loading);
            }
        }
    }

    /// Tag a new load of `panel` and run `fetch` on the runtime.
    fn spawn<F>(&mut self, panel: Panel, fetch: F)
    where
        F: Future<Output = Result<Payload, RequestError>> + Send + 'static,
    {
        let seq = {
            let seq = self.seqs.entry(panel).or_insert(0);
            *seq += 1;
            *seq
        };
        self.set_loading(panel);
        self.in_flight += 1;

        let events = self.events_tx.clone();
        self.runtime.spawn(async move {
            let outcome = fetch.await;
            // The receiver only goes away with the controller.
            let _ = events.send(Event::Loaded {
                panel,
                seq,
                outcome,
            });
        });
    }

    // ---- loaders ----

    /// Issue the startup group concurrently.
    pub fn load_initial(&mut self) {
        info!("Loading initial data");
        self.revealed = false;
        self.initial = Some(LoadGroup::new(INITIAL_PANELS));
        for panel in INITIAL_PANELS {
            self.load(panel);
        }
    }

    /// (Re)load one panel from the current view state.
    pub fn load(&mut self, panel: Panel) {
        match panel {
            Panel::Metrics => self.load_metrics(),
            Panel::Vendors => self.load_vendors(),
            Panel::Locations => self.load_locations(),
            Panel::Trips => self.load_trips(),
            Panel::Overview => self.load_overview(),
            Panel::TopVendors => self.load_top_vendors(),
            Panel::Algorithm => self.load_algorithm(),
            Panel::Analytics => self.load_analytics(),
            Panel::Chart(target) => self.load_chart(target),
        }
    }

    /// Re-run the loader of a failed panel.
    pub fn retry(&mut self, panel: Panel) {
        info!("Retrying {:?}", panel);
        self.load(panel);
    }

    pub fn load_metrics(&mut self) {
        let client = self.client.clone();
        let range = self.state.filters.date_range();
        self.spawn(Panel::Metrics, async move {
            let overview_path = query::insights_overview(&range);
            let summary_path = query::trip_summary(&range);
            let (overview, summary) = try_join(
                client.get::<InsightOverview>(&overview_path),
                client.get::<TripSummary>(&summary_path),
            )
            .await?;
            Ok(Payload::Metrics(DashboardMetrics { overview, summary }))
        });
    }

    pub fn load_vendors(&mut self) {
        let client = self.client.clone();
        self.spawn(Panel::Vendors, async move {
            let vendors = client.get(&query::vendors()).await?;
            Ok(Payload::Vendors(vendors))
        });
    }

    pub fn load_locations(&mut self) {
        let client = self.client.clone();
        let page = &self.state.locations_page;
        let path = query::locations(page.page_size(), page.offset());
        self.spawn(Panel::Locations, async move {
            let locations = client.get(&path).await?;
            Ok(Payload::Locations(locations))
        });
    }

    pub fn load_trips(&mut self) {
        let client = self.client.clone();
        let path = self.trips_path();
        self.spawn(Panel::Trips, async move {
            let trips = client.get(&path).await?;
            Ok(Payload::Trips(trips))
        });
    }

    /// Path of the current trips page. A location filter switches to the
    /// per-location endpoint, which takes no other trip filters.
    pub fn trips_path(&self) -> String {
        let page = &self.state.trips_page;
        if let Some(location_id) = self.state.filters.location {
            return query::location_trips(location_id, page.page_size(), page.offset());
        }
        let filters = &self.state.filters;
        query::trips(&TripQuery {
            limit: page.page_size(),
            offset: page.offset(),
            vendor_id: filters.vendor.clone(),
            search: Some(filters.search.clone()),
            range: filters.date_range(),
            sort: self.state.sort.as_query(),
        })
    }

    pub fn load_insights(&mut self) {
        for panel in INSIGHT_PANELS {
            self.load(panel);
        }
    }

    fn load_overview(&mut self) {
        let client = self.client.clone();
        let path = query::insights_overview(&self.state.filters.date_range());
        self.spawn(Panel::Overview, async move {
            Ok(Payload::Overview(client.get(&path).await?))
        });
    }

    fn load_top_vendors(&mut self) {
        let client = self.client.clone();
        let path = query::top_vendors(RANKING_LIMIT, &self.state.filters.date_range());
        self.spawn(Panel::TopVendors, async move {
            Ok(Payload::TopVendors(client.get(&path).await?))
        });
    }

    fn load_algorithm(&mut self) {
        let client = self.client.clone();
        self.spawn(Panel::Algorithm, async move {
            Ok(Payload::Algorithm(
                client.get(&query::algorithm_performance()).await?,
            ))
        });
    }

    /// Summary tiles and peak hour. The analytics charts load separately.
    fn load_analytics(&mut self) {
        let client = self.client.clone();
        let range = self.state.filters.date_range();
        self.spawn(Panel::Analytics, async move {
            let summary_path = query::trip_summary(&range);
            let sample_path = query::trip_sample(TRIP_SAMPLE, &range);
            let (summary, trips) = try_join(
                client.get::<TripSummary>(&summary_path),
                client.get::<Vec<TripRecord>>(&sample_path),
            )
            .await?;
            let hourly = bucket_by_hour(&trips, |trip| trip.pickup_datetime.as_deref());
            Ok(Payload::Analytics(AnalyticsSummary {
                summary,
                peak_hour: peak_hour(&hourly),
            }))
        });
    }

    pub fn load_chart(&mut self, target: ChartTarget) {
        let client = self.client.clone();
        let range = self.state.filters.date_range();
        let panel = Panel::Chart(target);
        match target {
            ChartTarget::TripVolume => self.spawn(panel, async move {
                let trips: Vec<TripRecord> =
                    client.get(&query::trip_sample(TRIP_SAMPLE, &range)).await?;
                Ok(Payload::Chart(charts::trip_volume(&trips)))
            }),
            ChartTarget::DistanceFare => self.spawn(panel, async move {
                let trips: Vec<TripRecord> =
                    client.get(&query::trip_sample(TRIP_SAMPLE, &range)).await?;
                Ok(Payload::Chart(charts::distance_fare(&trips)))
            }),
            ChartTarget::BoroughShare => self.spawn(panel, async move {
                let locations: Vec<LocationRecord> =
                    client.get(&query::locations(BOROUGH_SAMPLE, 0)).await?;
                Ok(Payload::Chart(charts::borough_share(&locations)))
            }),
            ChartTarget::VendorPerformance => self.spawn(panel, async move {
                let (directory, ranked) =
                    ranked_vendors(&client, VENDOR_CHART_LIMIT, &range).await?;
                Ok(Payload::Chart(charts::vendor_performance(&ranked, &directory)))
            }),
            ChartTarget::RevenueAnalysis => self.spawn(panel, async move {
                let (directory, ranked) = ranked_vendors(&client, RANKING_LIMIT, &range).await?;
                Ok(Payload::Chart(charts::revenue_analysis(&ranked, &directory)))
            }),
        }
    }

    // ---- user actions ----

    pub fn switch_section(&mut self, section: Section) {
        if self.state.section == section {
            return;
        }
        info!("Switching to {}", section.title());
        self.state.section = section;
        if matches!(section, Section::Insights | Section::Analytics) {
            for panel in section_panels(section) {
                self.load(*panel);
            }
        }
    }

    /// Drop every cached response and reload the initial group plus the
    /// current section.
    pub fn refresh(&mut self) {
        info!("Refreshing data");
        self.client.clear_cache();
        self.toasts.push(ToastKind::Info, "Refreshing data...");

        let mut panels: Vec<Panel> = INITIAL_PANELS.to_vec();
        for panel in section_panels(self.state.section) {
            if !panels.contains(panel) {
                panels.push(*panel);
            }
        }
        self.refresh = Some(LoadGroup::new(panels.iter().copied()));
        for panel in panels {
            self.load(panel);
        }
    }

    pub fn set_vendor(&mut self, vendor: Option<String>) {
        let vendor = vendor.filter(|v| !v.is_empty());
        if self.state.filters.vendor == vendor {
            return;
        }
        self.state.filters.vendor = vendor;
        self.filters_changed(false);
    }

    pub fn set_location(&mut self, location: Option<i64>) {
        if self.state.filters.location == location {
            return;
        }
        self.state.filters.location = location;
        self.filters_changed(false);
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        if self.state.filters.start_date == date {
            return;
        }
        self.state.filters.start_date = date;
        self.filters_changed(true);
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        if self.state.filters.end_date == date {
            return;
        }
        self.state.filters.end_date = date;
        self.filters_changed(true);
    }

    /// Record a keystroke in the search box. The search is applied once the
    /// input has been quiet for the debounce window.
    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.search_input = text.into();
        self.search_pending = true;
        self.search_generation += 1;
        let generation = self.search_generation;
        let events = self.events_tx.clone();
        self.search.schedule(&self.runtime, async move {
            let _ = events.send(Event::SearchSettled(generation));
        });
    }

    fn apply_search(&mut self) {
        self.search_pending = false;
        let search = self.search_input.trim().to_string();
        if search == self.state.filters.search {
            return;
        }
        debug!("Applying search {:?}", search);
        self.state.filters.search = search;
        self.filters_changed(false);
    }

    /// Page reset, cache invalidation and reload of everything the change
    /// affects. Date changes also reach the metrics, charts and the active
    /// insight or analytics section.
    fn filters_changed(&mut self, dates: bool) {
        self.state.trips_page.reset();
        self.client.clear_cache();
        self.load(Panel::Trips);
        if !dates {
            return;
        }
        for panel in DASHBOARD_PANELS {
            self.load(panel);
        }
        if matches!(self.state.section, Section::Insights | Section::Analytics) {
            for panel in section_panels(self.state.section) {
                self.load(*panel);
            }
        }
    }

    /// Column header click.
    pub fn handle_sort(&mut self, field: SortField) {
        self.state.sort.toggle(field);
        self.state.trips_page.reset();
        self.client.clear_cache();
        self.load(Panel::Trips);
    }

    /// Move the trips table by `delta` pages. Cached pages stay valid.
    pub fn change_page(&mut self, delta: i64) -> bool {
        if !self.state.trips_page.step(delta) {
            return false;
        }
        self.load(Panel::Trips);
        true
    }

    pub fn change_locations_page(&mut self, delta: i64) -> bool {
        if !self.state.locations_page.step(delta) {
            return false;
        }
        self.load(Panel::Locations);
        true
    }

    pub fn set_trips_page_size(&mut self, page_size: usize) {
        if self.state.trips_page.page_size() == page_size {
            return;
        }
        self.state.trips_page.set_page_size(page_size);
        self.load(Panel::Trips);
    }

    pub fn set_locations_page_size(&mut self, page_size: usize) {
        if self.state.locations_page.page_size() == page_size {
            return;
        }
        self.state.locations_page.set_page_size(page_size);
        self.load(Panel::Locations);
    }

    pub fn clear_all_filters(&mut self) {
        info!("Clearing all filters");
        let had_dates = !self.state.filters.date_range().is_empty();
        self.search.cancel();
        self.search_generation += 1;
        self.search_pending = false;
        self.search_input.clear();
        self.state.filters = Default::default();
        self.state.sort = Default::default();
        self.filters_changed(had_dates);
        self.toasts.push(ToastKind::Success, "Filters cleared successfully");
    }

    /// "View trips" on a vendor card.
    pub fn view_vendor_trips(&mut self, vendor_id: &str) {
        self.state.section = Section::Trips;
        self.state.filters.location = None;
        self.state.filters.vendor = Some(vendor_id.to_string());
        self.filters_changed(false);
    }

    /// "View trips" on a location card.
    pub fn view_location_trips(&mut self, location_id: i64) {
        self.state.section = Section::Trips;
        self.state.filters.vendor = None;
        self.state.filters.location = Some(location_id);
        self.filters_changed(false);
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.state.theme.toggled();
        self.state.theme = theme;
        if let Some(path) = &self.preferences_path {
            if let Err(e) = (Preferences { theme }).save(path) {
                warn!("Could not save theme preference: {}", e);
            }
        }
        self.renderer.set_theme(ChartTheme::for_theme(theme));
        self.redraw_all();
    }

    // ---- surfaces ----

    /// Register or resize the surface of `target`, drawing the last chart
    /// loaded for it.
    pub fn attach_surface(&mut self, target: ChartTarget, width: u32, height: u32, pixel_ratio: f64) {
        if !self.surfaces.attach(target, width, height, pixel_ratio) {
            return;
        }
        if let Some(Loadable::Ready(chart)) = self.charts.get(&target) {
            if let Err(e) = self.surfaces.draw(self.renderer.as_mut(), target, chart) {
                error!("Failed to draw {}: {}", target.id(), e);
            }
        }
    }

    pub fn detach_surface(&mut self, target: ChartTarget) {
        self.surfaces.detach(target);
        self.renderer.release(target);
    }

    pub fn tooltip(&self, target: ChartTarget, x: f64, y: f64) -> Option<Vec<String>> {
        self.renderer.tooltip(target, x, y)
    }

    fn show_chart(&mut self, target: ChartTarget, chart: Chart) {
        match self.surfaces.draw(self.renderer.as_mut(), target, &chart) {
            Ok(_) => {
                self.charts.insert(target, Loadable::Ready(chart));
            }
            Err(e) => {
                error!("Failed to draw {}: {}", target.id(), e);
                self.charts.insert(target, Loadable::Failed(e.to_string()));
            }
        }
    }

    fn redraw_all(&mut self) {
        for (target, chart) in &self.charts {
            if let Loadable::Ready(chart) = chart {
                if let Err(e) = self.surfaces.draw(self.renderer.as_mut(), *target, chart) {
                    error!("Failed to redraw {}: {}", target.id(), e);
                }
            }
        }
    }
}

/// Vendor directory plus the server's ranking.
async fn ranked_vendors(
    client: &ApiClient,
    limit: usize,
    range: &crate::api::DateRange,
) -> Result<(VendorDirectory, Vec<VendorPerformance>), RequestError> {
    let vendors_path = query::vendors();
    let ranking_path = query::top_vendors(limit, range);
    let (vendors, ranked) = try_join(
        client.get::<Vec<VendorRecord>>(&vendors_path),
        client.get::<Vec<VendorPerformance>>(&ranking_path),
    )
    .await?;
    let mut directory = VendorDirectory::default();
    directory.extend(&vendors);
    Ok((directory, ranked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_group_settles_once_everything_reported() {
        let mut group = LoadGroup::new([Panel::Trips, Panel::Vendors]);
        assert!(!group.settle(Panel::Trips, true));
        assert!(!group.settle(Panel::Metrics, false));
        assert!(!group.failed);
        assert!(group.settle(Panel::Vendors, false));
        assert!(group.failed);
    }

    #[test]
    fn test_section_panels() {
        assert_eq!(section_panels(Section::Trips), &[Panel::Trips]);
        assert_eq!(section_panels(Section::Analytics).len(), 4);
        assert!(section_panels(Section::Dashboard)
            .iter()
            .all(|panel| INITIAL_PANELS.contains(panel)));
    }
}
