//! Fan-out search across platform drivers.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::driver::{DriverRegistry, Listing, PlatformDriver, SearchQuery};
use crate::metrics::{DRIVER_CALLS, SEARCH_RESULTS};

use super::deduplicate_listings;

/// Locations searched per driver, on top of the location-less pass.
pub const MAX_LOCATIONS: usize = 3;

/// Configuration for the aggregator.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Result cap handed to each driver search call.
    pub max_listings_per_search: usize,
    /// Pause between consecutive searches on the same driver.
    pub search_delay: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_listings_per_search: 50,
            search_delay: Duration::ZERO,
        }
    }
}

impl From<&SearchConfig> for AggregatorConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_listings_per_search: config.max_listings_per_search,
            search_delay: Duration::from_millis(config.search_delay_ms),
        }
    }
}

/// Outcome of one aggregation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Deduplicated listings in discovery order.
    pub listings: Vec<Listing>,
    /// Listings returned by drivers before deduplication.
    pub raw_count: usize,
    /// Failed search calls ("platform[location]" -> error message).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub driver_errors: BTreeMap<String, String>,
    /// How long the aggregation took in milliseconds.
    pub duration_ms: u64,
}

/// Searches every driver and merges the results.
///
/// Drivers are searched concurrently; the locations of one driver are
/// searched one after the other to respect per-site rate limits. Merging
/// happens once, after every call has completed.
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Build the search calls for one driver: up to [`MAX_LOCATIONS`]
    /// locations followed by one location-less pass.
    pub fn build_queries(&self, keywords: &[String], locations: &[String]) -> Vec<SearchQuery> {
        let mut queries: Vec<SearchQuery> = locations
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .take(MAX_LOCATIONS)
            .map(|l| {
                SearchQuery::new(
                    keywords.to_vec(),
                    Some(l.to_string()),
                    self.config.max_listings_per_search,
                )
            })
            .collect();
        queries.push(SearchQuery::new(
            keywords.to_vec(),
            None,
            self.config.max_listings_per_search,
        ));
        queries
    }

    /// Search all drivers with the given keywords and locations.
    ///
    /// Never fails: a failing call is logged, recorded in `driver_errors` and
    /// contributes zero listings.
    pub async fn aggregate(
        &self,
        drivers: &DriverRegistry,
        keywords: &[String],
        locations: &[String],
    ) -> AggregationResult {
        let start = Instant::now();

        if locations.len() > MAX_LOCATIONS {
            warn!(
                "{} locations configured, only the first {} are searched",
                locations.len(),
                MAX_LOCATIONS
            );
        }

        let queries = self.build_queries(keywords, locations);
        info!(
            "Searching {} drivers with {} queries each",
            drivers.len(),
            queries.len()
        );

        let per_driver = join_all(
            drivers
                .iter()
                .map(|driver| self.search_driver(Arc::clone(driver), &queries)),
        )
        .await;

        // Single writer: merge only after every driver has finished
        let mut raw: Vec<Listing> = Vec::new();
        let mut driver_errors = BTreeMap::new();
        for (listings, errors) in per_driver {
            raw.extend(listings);
            driver_errors.extend(errors);
        }

        let raw_count = raw.len();
        let listings = deduplicate_listings(raw);
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Aggregated {} unique listings ({} raw, {} failed calls) in {}ms",
            listings.len(),
            raw_count,
            driver_errors.len(),
            duration_ms
        );

        AggregationResult {
            listings,
            raw_count,
            driver_errors,
            duration_ms,
        }
    }

    /// Run every query against one driver, sequentially.
    async fn search_driver(
        &self,
        driver: Arc<dyn PlatformDriver>,
        queries: &[SearchQuery],
    ) -> (Vec<Listing>, Vec<(String, String)>) {
        let platform = driver.platform();
        let mut listings = Vec::new();
        let mut errors = Vec::new();

        for (idx, query) in queries.iter().enumerate() {
            if idx > 0 && !self.config.search_delay.is_zero() {
                tokio::time::sleep(self.config.search_delay).await;
            }

            match driver.search(query).await {
                Ok(mut found) => {
                    found.truncate(query.limit);
                    debug!(
                        "{} returned {} listings for location '{}'",
                        platform,
                        found.len(),
                        query.location_label()
                    );
                    DRIVER_CALLS
                        .with_label_values(&[platform.as_str(), "search", "success"])
                        .inc();
                    SEARCH_RESULTS.observe(found.len() as f64);
                    listings.extend(found);
                }
                Err(e) => {
                    warn!(
                        "Search on {} (location '{}') failed: {}",
                        platform,
                        query.location_label(),
                        e
                    );
                    DRIVER_CALLS
                        .with_label_values(&[platform.as_str(), "search", "error"])
                        .inc();
                    errors.push((
                        format!("{}[{}]", platform, query.location_label()),
                        e.to_string(),
                    ));
                }
            }
        }

        (listings, errors)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(AggregatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverError, Platform};
    use crate::testing::{fixtures, MockDriver};

    fn keywords() -> Vec<String> {
        vec!["java".to_string()]
    }

    #[test]
    fn test_build_queries_caps_locations() {
        let aggregator = Aggregator::default();
        let locations: Vec<String> = ["Pune", "", "Bangalore", "Delhi", "Mumbai"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let queries = aggregator.build_queries(&keywords(), &locations);
        let labels: Vec<&str> = queries.iter().map(|q| q.location_label()).collect();

        assert_eq!(labels, vec!["Pune", "Bangalore", "Delhi", ""]);
        assert!(queries.iter().all(|q| q.limit == 50));
    }

    #[tokio::test]
    async fn test_aggregate_searches_every_location_per_driver() {
        let linkedin = Arc::new(MockDriver::new(Platform::Linkedin));
        let registry = DriverRegistry::new().with_driver(linkedin.clone());

        let locations = vec!["Pune".to_string(), "Remote".to_string()];
        Aggregator::default()
            .aggregate(&registry, &keywords(), &locations)
            .await;

        let searches = linkedin.recorded_searches().await;
        assert_eq!(searches.len(), 3);
        assert_eq!(searches[0].location.as_deref(), Some("Pune"));
        assert_eq!(searches[1].location.as_deref(), Some("Remote"));
        assert_eq!(searches[2].location, None);
    }

    #[tokio::test]
    async fn test_aggregate_merges_and_dedups_across_drivers() {
        let shared_url = "https://www.linkedin.com/jobs/view/7";
        let linkedin = Arc::new(MockDriver::with_listings(
            Platform::Linkedin,
            vec![
                fixtures::listing("Java Developer", shared_url),
                fixtures::listing("Backend Engineer", "https://www.linkedin.com/jobs/view/8"),
            ],
        ));
        let indeed = Arc::new(MockDriver::with_listings(
            Platform::Indeed,
            vec![
                fixtures::listing(
                    "Java Developer (mirror)",
                    "https://www.LinkedIn.com/jobs/view/7/",
                ),
                fixtures::listing("Java Engineer", "https://www.indeed.com/viewjob?jk=1"),
            ],
        ));
        let registry = DriverRegistry::new()
            .with_driver(linkedin)
            .with_driver(indeed);

        let result = Aggregator::default()
            .aggregate(&registry, &keywords(), &[])
            .await;

        // One location-less pass per driver, 2 listings each
        assert_eq!(result.raw_count, 4);
        assert_eq!(result.listings.len(), 3);
        assert_eq!(result.listings[0].title, "Java Developer");
        assert!(result.driver_errors.is_empty());
    }

    #[tokio::test]
    async fn test_aggregate_isolates_failed_calls() {
        let broken = Arc::new(MockDriver::new(Platform::Naukri));
        broken
            .fail_searches(DriverError::Navigation("search page changed".into()))
            .await;
        let healthy = Arc::new(MockDriver::with_listings(
            Platform::Indeed,
            vec![fixtures::listing("Java Developer", "https://www.indeed.com/viewjob?jk=9")],
        ));
        let registry = DriverRegistry::new()
            .with_driver(broken)
            .with_driver(healthy);

        let locations = vec!["Pune".to_string()];
        let result = Aggregator::default()
            .aggregate(&registry, &keywords(), &locations)
            .await;

        assert_eq!(result.listings.len(), 1);
        assert_eq!(result.driver_errors.len(), 2);
        assert!(result.driver_errors.contains_key("naukri[Pune]"));
        assert!(result.driver_errors.contains_key("naukri[]"));
    }

    #[tokio::test]
    async fn test_aggregate_truncates_to_limit() {
        let listings: Vec<Listing> = (0..10)
            .map(|i| {
                fixtures::listing(
                    &format!("Java Developer {}", i),
                    &format!("https://www.indeed.com/viewjob?jk={}", i),
                )
            })
            .collect();
        let driver = Arc::new(MockDriver::with_listings(Platform::Indeed, listings));
        driver.ignore_limit(true).await;
        let registry = DriverRegistry::new().with_driver(driver);

        let aggregator = Aggregator::new(AggregatorConfig {
            max_listings_per_search: 4,
            search_delay: Duration::ZERO,
        });
        let result = aggregator.aggregate(&registry, &keywords(), &[]).await;

        assert_eq!(result.raw_count, 4);
    }

    #[tokio::test]
    async fn test_aggregate_no_drivers() {
        let result = Aggregator::default()
            .aggregate(&DriverRegistry::new(), &keywords(), &[])
            .await;
        assert!(result.listings.is_empty());
        assert_eq!(result.raw_count, 0);
    }
}
