//! Listing aggregation: fan-out search, canonical URLs and deduplication.

mod canonical;
mod dedup;
mod fanout;

pub use canonical::canonical_url;
pub use dedup::deduplicate_listings;
pub use fanout::{AggregationResult, Aggregator, AggregatorConfig, MAX_LOCATIONS};
