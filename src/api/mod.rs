//! Client for the mobility REST API.

mod cache;
pub mod client;
pub mod query;

pub use cache::ResponseCache;
pub use client::{ApiClient, RequestError};
pub use query::{DateRange, SortDirection, SortField, TripQuery};
