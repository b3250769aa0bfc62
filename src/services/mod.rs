pub mod browse;
pub mod content_service;
pub mod error;
pub mod upsert_writer;

pub use browse::{BrowseAggregator, BrowsePage};
pub use content_service::{ContentService, DetailLookup, TrendingList};
pub use error::ServiceError;
pub use upsert_writer::{UpsertReport, UpsertWriter};
