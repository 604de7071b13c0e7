pub mod aggregation;
pub mod format;
mod time;

pub use aggregation::{
    bucket_by_hour, fare_scatter, group_by_category, peak_hour, revenue_per_trip, top_n,
};
pub use time::parse_local_timestamp;
