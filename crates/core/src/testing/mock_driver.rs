//! Mock platform driver for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::aggregator::canonical_url;
use crate::driver::{DriverError, Listing, Platform, PlatformDriver, SearchQuery};

/// Mock implementation of the PlatformDriver trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable listings (filtered by location, capped by limit)
/// - Track searches and submissions for assertions
/// - Simulate authentication, search and submission failures
///
/// # Example
///
/// ```rust,ignore
/// use jobhound_core::testing::{MockDriver, fixtures};
///
/// let driver = MockDriver::with_listings(
///     Platform::Linkedin,
///     vec![fixtures::listing("Java Developer", "https://www.linkedin.com/jobs/view/1")],
/// );
/// driver.set_submit_result("https://www.linkedin.com/jobs/view/1", Ok(false)).await;
///
/// let found = driver.search(&query).await?;
/// assert_eq!(driver.recorded_searches().await.len(), 1);
/// ```
pub struct MockDriver {
    platform: Platform,
    /// Configured listings to return.
    listings: Arc<RwLock<Vec<Listing>>>,
    /// Recorded search queries.
    searches: Arc<RwLock<Vec<SearchQuery>>>,
    /// Recorded submission URLs, in call order.
    submissions: Arc<RwLock<Vec<String>>>,
    /// Result returned by `authenticate`.
    auth_result: Arc<RwLock<Result<bool, DriverError>>>,
    /// If set, every search fails with this error.
    search_error: Arc<RwLock<Option<DriverError>>>,
    /// Per-URL submission results (keyed by canonical URL); default is `Ok(true)`.
    submit_results: Arc<RwLock<HashMap<String, Result<bool, DriverError>>>>,
    /// Return every configured listing regardless of the query limit.
    ignore_limit: Arc<RwLock<bool>>,
    /// Simulated latency of each search call.
    search_delay: Arc<RwLock<Duration>>,
    auth_calls: AtomicUsize,
    shutdown_calls: AtomicUsize,
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDriver")
            .field("platform", &self.platform)
            .field("listings", &"<listings>")
            .field("searches", &"<searches>")
            .field("submissions", &"<submissions>")
            .finish()
    }
}

impl MockDriver {
    /// Create a new mock driver with no listings.
    pub fn new(platform: Platform) -> Self {
        Self::with_listings(platform, Vec::new())
    }

    /// Create a mock driver with predefined listings.
    pub fn with_listings(platform: Platform, listings: Vec<Listing>) -> Self {
        Self {
            platform,
            listings: Arc::new(RwLock::new(listings)),
            searches: Arc::new(RwLock::new(Vec::new())),
            submissions: Arc::new(RwLock::new(Vec::new())),
            auth_result: Arc::new(RwLock::new(Ok(true))),
            search_error: Arc::new(RwLock::new(None)),
            submit_results: Arc::new(RwLock::new(HashMap::new())),
            ignore_limit: Arc::new(RwLock::new(false)),
            search_delay: Arc::new(RwLock::new(Duration::ZERO)),
            auth_calls: AtomicUsize::new(0),
            shutdown_calls: AtomicUsize::new(0),
        }
    }

    /// Set the listings to return for subsequent searches.
    pub async fn set_listings(&self, listings: Vec<Listing>) {
        *self.listings.write().await = listings;
    }

    /// Set the result of `authenticate`.
    pub async fn set_auth_result(&self, result: Result<bool, DriverError>) {
        *self.auth_result.write().await = result;
    }

    /// Make every subsequent search fail with the given error.
    pub async fn fail_searches(&self, error: DriverError) {
        *self.search_error.write().await = Some(error);
    }

    /// Set the submission result for one listing URL.
    pub async fn set_submit_result(&self, url: &str, result: Result<bool, DriverError>) {
        self.submit_results
            .write()
            .await
            .insert(canonical_url(url), result);
    }

    /// Return all listings even when the query asks for fewer.
    pub async fn ignore_limit(&self, ignore: bool) {
        *self.ignore_limit.write().await = ignore;
    }

    /// Delay every search call by the given duration.
    pub async fn set_search_delay(&self, delay: Duration) {
        *self.search_delay.write().await = delay;
    }

    /// Get recorded search queries.
    pub async fn recorded_searches(&self) -> Vec<SearchQuery> {
        self.searches.read().await.clone()
    }

    /// Get recorded submission URLs.
    pub async fn recorded_submissions(&self) -> Vec<String> {
        self.submissions.read().await.clone()
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn shutdown_calls(&self) -> usize {
        self.shutdown_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformDriver for MockDriver {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn authenticate(&self) -> Result<bool, DriverError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.auth_result.read().await.clone()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, DriverError> {
        self.searches.write().await.push(query.clone());

        let delay = *self.search_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.search_error.read().await.clone() {
            return Err(err);
        }

        let location = query
            .location
            .as_deref()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty());

        let limit = if *self.ignore_limit.read().await {
            usize::MAX
        } else {
            query.limit
        };

        let listings = self.listings.read().await;
        let found: Vec<Listing> = listings
            .iter()
            .filter(|l| match &location {
                Some(loc) => l.location.to_lowercase().contains(loc.as_str()),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect();
        Ok(found)
    }

    async fn submit_application(&self, url: &str) -> Result<bool, DriverError> {
        self.submissions.write().await.push(url.to_string());
        self.submit_results
            .read()
            .await
            .get(&canonical_url(url))
            .cloned()
            .unwrap_or(Ok(true))
    }

    async fn shutdown(&self) {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
    }
}
