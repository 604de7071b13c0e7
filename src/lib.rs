//! # Urban Mobility Dashboard
//!
//! `mobility_dashboard` reads trip, vendor and location data from the urban
//! mobility REST API and turns it into tables, headline metrics and charts.
//!
//! The pipeline runs headless as well as inside the egui window:
//!
//! - [`api`] fetches JSON with a per-path response cache
//! - [`utils`] reshapes records (hourly buckets, category tallies) and formats numbers
//! - [`plotting`] draws charts through either of two interchangeable renderers
//! - [`app`] owns the view state and sequences every load
//!
//! ## Example
//!
//! ```no_run
//! use mobility_dashboard::api::ApiClient;
//! use mobility_dashboard::app::Dashboard;
//! use mobility_dashboard::config::{DashboardConfig, Theme};
//! use mobility_dashboard::plotting::{renderer_for, ChartTheme};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = DashboardConfig::default();
//! let client = ApiClient::from_config(&config)?;
//! let renderer = renderer_for(config.renderer, ChartTheme::dark());
//! let mut dashboard = Dashboard::new(
//!     client,
//!     renderer,
//!     &config,
//!     Theme::Dark,
//!     tokio::runtime::Handle::current(),
//! );
//! dashboard.load_initial();
//! dashboard.settle().await;
//! assert!(dashboard.is_revealed());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use api::{ApiClient, RequestError};
pub use app::{Dashboard, DashboardApp};
pub use config::DashboardConfig;
