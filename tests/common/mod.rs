//! In-process stand-in for the mobility API.
//!
//! Routes are matched on the full request target first (`/trips?limit=10&offset=0`)
//! and then on the path alone (`/trips`). Every request is counted by its
//! full target.

#![allow(dead_code)]

use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use mobility_dashboard::api::ApiClient;
use mobility_dashboard::app::Dashboard;
use mobility_dashboard::config::{DashboardConfig, Theme};
use mobility_dashboard::plotting::{renderer_for, ChartTheme, RendererKind};

const API_PREFIX: &str = "/api";

#[derive(Clone)]
struct Route {
    status: u16,
    body: String,
    delay: Duration,
}

#[derive(Default)]
struct StubState {
    routes: HashMap<String, Route>,
    hits: HashMap<String, usize>,
}

pub struct StubServer {
    addr: SocketAddr,
    state: Arc<Mutex<StubState>>,
}

impl StubServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(StubState::default()));

        let shared = state.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, shared.clone()));
            }
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, API_PREFIX)
    }

    pub fn route(&self, target: &str, body: Value) {
        self.insert(target, 200, body, Duration::ZERO);
    }

    pub fn route_status(&self, target: &str, status: u16) {
        self.insert(target, status, serde_json::json!({"detail": "stub failure"}), Duration::ZERO);
    }

    pub fn route_delayed(&self, target: &str, body: Value, delay: Duration) {
        self.insert(target, 200, body, delay);
    }

    fn insert(&self, target: &str, status: u16, body: Value, delay: Duration) {
        self.state.lock().unwrap().routes.insert(
            target.to_string(),
            Route {
                status,
                body: body.to_string(),
                delay,
            },
        );
    }

    /// Requests received for exactly `target`.
    pub fn hits(&self, target: &str) -> usize {
        self.state.lock().unwrap().hits.get(target).copied().unwrap_or(0)
    }

    /// Requests whose target starts with `prefix`.
    pub fn hits_matching(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .hits
            .iter()
            .filter(|(target, _)| target.starts_with(prefix))
            .map(|(_, count)| count)
            .sum()
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.base_url(), Duration::from_secs(5), 64).unwrap()
    }
}

async fn serve(mut stream: TcpStream, state: Arc<Mutex<StubState>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&request);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .trim_start_matches(API_PREFIX)
        .to_string();

    let route = {
        let mut state = state.lock().unwrap();
        *state.hits.entry(target.clone()).or_insert(0) += 1;
        let path = target.split('?').next().unwrap_or_default();
        state
            .routes
            .get(&target)
            .or_else(|| state.routes.get(path))
            .cloned()
    };
    let route = route.unwrap_or(Route {
        status: 404,
        body: r#"{"detail":"Not Found"}"#.to_string(),
        delay: Duration::ZERO,
    });

    if !route.delay.is_zero() {
        tokio::time::sleep(route.delay).await;
    }

    let reason = match route.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        reason,
        route.body.len(),
        route.body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

pub fn trip(id: i64, vendor: &str, pickup: &str) -> Value {
    serde_json::json!({
        "trip_id": id,
        "vendor_id": vendor,
        "pickup_id": 132,
        "dropoff_id": 48,
        "pickup_datetime": pickup,
        "dropoff_datetime": pickup,
        "trip_miles": 2.5 + id as f64,
        "trip_duration_hours": 0.5,
        "average_speed_mph": 11.2,
        "base_passenger_fare": 14.2 + id as f64,
        "driver_pay": 10.0
    })
}

/// `count` trips numbered from `first`, all picked up between 08:00 and 08:59.
pub fn trips(first: i64, count: i64) -> Value {
    Value::Array(
        (first..first + count)
            .map(|id| trip(id, "HV0003", &format!("2024-01-15T08:{:02}:00", id % 60)))
            .collect(),
    )
}

/// A server answering every endpoint the dashboard reads.
pub async fn seeded_server() -> StubServer {
    let server = StubServer::start().await;
    server.route("/trips", trips(1, 10));
    server.route(
        "/trips/summary",
        serde_json::json!({
            "total_trips": 1200,
            "avg_trip_miles": 4.75,
            "avg_trip_duration_minutes": 21.0,
            "avg_speed_mph": 13.4,
            "total_revenue": 30000.0,
            "total_driver_pay": 22000.0
        }),
    );
    server.route(
        "/vendors",
        serde_json::json!([
            {"vendor_id": "HV0003", "vendor_name": "Uber"},
            {"vendor_id": "HV0005", "vendor_name": "Lyft"}
        ]),
    );
    server.route(
        "/locations",
        serde_json::json!([
            {"location_id": 1, "borough": "EWR", "zone": "Newark Airport", "service_zone": "EWR"},
            {"location_id": 132, "borough": "Queens", "zone": "JFK Airport", "service_zone": "Airports"},
            {"location_id": 264, "borough": null, "zone": null, "service_zone": null}
        ]),
    );
    server.route(
        "/insights/overview",
        serde_json::json!({
            "total_trips": 1200,
            "unique_vendors": 2,
            "unique_locations": 263,
            "avg_base_fare": 25.0,
            "avg_extra_charges": 3.1
        }),
    );
    server.route(
        "/insights/top-vendors",
        serde_json::json!([
            {"vendor_id": "HV0003", "trip_count": 800, "avg_base_fare": 24.5, "total_revenue": 19600.0},
            {"vendor_id": "HV0005", "trip_count": 400, "avg_base_fare": 26.0, "total_revenue": 10400.0}
        ]),
    );
    server.route(
        "/insights/algorithm-performance",
        serde_json::json!({
            "algorithm_status": "Custom IQR Detection",
            "total_trips_analyzed": 1200,
            "outliers_detected": 36,
            "outlier_percentage": 3.0,
            "fare_statistics": {"min_fare": 2.5, "max_fare": 180.0, "avg_fare": 25.0, "total_with_fares": 1190},
            "algorithm_complexity": "O(n log n)",
            "data_quality_score": 97.0
        }),
    );
    server
}

pub fn test_config(server: &StubServer) -> DashboardConfig {
    DashboardConfig {
        api_base: server.base_url(),
        search_debounce_ms: 50,
        renderer: RendererKind::Canvas,
        ..Default::default()
    }
}

/// A controller drawing with the canvas renderer, running on the test runtime.
pub fn dashboard(server: &StubServer) -> Dashboard {
    let config = test_config(server);
    Dashboard::new(
        server.client(),
        renderer_for(config.renderer, ChartTheme::dark()),
        &config,
        Theme::Dark,
        tokio::runtime::Handle::current(),
    )
}

/// Wait for every outstanding load, failing the test instead of hanging.
pub async fn settle(dashboard: &mut Dashboard) {
    tokio::time::timeout(Duration::from_secs(10), dashboard.settle())
        .await
        .expect("dashboard did not settle");
}
