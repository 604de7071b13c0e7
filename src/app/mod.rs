//! The interactive side of the dashboard: view state, the controller that
//! drives loads, and the egui front end.

pub mod charts;
pub mod controller;
pub mod debounce;
pub mod state;
pub mod ui;
pub mod view_model;

pub use controller::{AnalyticsSummary, Dashboard, DashboardMetrics, Panel};
pub use state::{Filters, Loadable, Pagination, Section, Sort, Toast, ToastKind, Toasts, ViewState};
pub use ui::DashboardApp;
