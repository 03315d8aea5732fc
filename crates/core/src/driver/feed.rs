//! Feed-backed platform driver.
//!
//! Serves listings from a JSON export (an array of postings) instead of
//! driving the site. Useful for offline runs and for replaying a previous
//! scrape through the scoring and reporting pipeline.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::aggregator::canonical_url;
use crate::config::FeedDriverConfig;
use crate::profile::{ContactInfo, Profile};

use super::{DriverError, Listing, Platform, PlatformDriver, SearchQuery};

/// One posting as stored in a feed file.
#[derive(Debug, Deserialize)]
struct FeedEntry {
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    requirements: Option<String>,
    #[serde(default)]
    experience: Option<String>,
    #[serde(default)]
    url: String,
}

/// An accepted application and the contact details it was filed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub url: String,
    pub contact: ContactInfo,
}

/// Driver that answers searches from a feed file.
pub struct FeedDriver {
    platform: Platform,
    path: PathBuf,
    accept_submissions: bool,
    profile: Arc<Profile>,
    listings: RwLock<Option<Vec<Listing>>>,
    submitted: RwLock<Vec<Submission>>,
}

impl FeedDriver {
    pub fn new(platform: Platform, config: &FeedDriverConfig, profile: Arc<Profile>) -> Self {
        Self {
            platform,
            path: config.path.clone(),
            accept_submissions: config.accept_submissions,
            profile,
            listings: RwLock::new(None),
            submitted: RwLock::new(Vec::new()),
        }
    }

    /// Applications this driver accepted since the last shutdown.
    pub async fn submitted(&self) -> Vec<Submission> {
        self.submitted.read().await.clone()
    }

    async fn load(&self) -> Result<Vec<Listing>, DriverError> {
        if let Some(listings) = self.listings.read().await.as_ref() {
            return Ok(listings.clone());
        }

        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DriverError::Unavailable(format!("cannot read feed {}: {}", self.path.display(), e))
        })?;
        let entries: Vec<FeedEntry> = serde_json::from_str(&raw).map_err(|e| {
            DriverError::Internal(format!("invalid feed {}: {}", self.path.display(), e))
        })?;

        let listings: Vec<Listing> = entries
            .into_iter()
            .map(|e| Listing {
                title: e.title,
                company: e.company,
                location: e.location,
                description: e.description,
                requirements: e.requirements,
                experience: e.experience,
                url: e.url,
                platform: self.platform,
            })
            .collect();

        info!(
            "Loaded {} listings from {} feed {}",
            listings.len(),
            self.platform,
            self.path.display()
        );
        *self.listings.write().await = Some(listings.clone());
        Ok(listings)
    }

    fn matches_query(listing: &Listing, query: &SearchQuery) -> bool {
        let haystack = format!(
            "{} {} {}",
            listing.title,
            listing.description,
            listing.requirements.as_deref().unwrap_or_default()
        )
        .to_lowercase();

        let keyword_hit = query.keywords.is_empty()
            || query
                .keywords
                .iter()
                .any(|kw| haystack.contains(&kw.to_lowercase()));

        let location_hit = match query.location.as_deref() {
            Some(loc) if !loc.trim().is_empty() => listing
                .location
                .to_lowercase()
                .contains(&loc.trim().to_lowercase()),
            _ => true,
        };

        keyword_hit && location_hit
    }
}

#[async_trait]
impl PlatformDriver for FeedDriver {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn authenticate(&self) -> Result<bool, DriverError> {
        self.load().await.map(|_| true)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, DriverError> {
        let listings = self.load().await?;
        let found: Vec<Listing> = listings
            .into_iter()
            .filter(|l| Self::matches_query(l, query))
            .take(query.limit)
            .collect();
        debug!(
            "{} feed returned {} listings for location '{}'",
            self.platform,
            found.len(),
            query.location_label()
        );
        Ok(found)
    }

    async fn submit_application(&self, url: &str) -> Result<bool, DriverError> {
        let listings = self.load().await?;
        let key = canonical_url(url);
        if !listings.iter().any(|l| canonical_url(&l.url) == key) {
            return Err(DriverError::Navigation(format!(
                "listing not present in feed: {}",
                url
            )));
        }

        if !self.accept_submissions {
            debug!("{} feed declines submission for {}", self.platform, url);
            return Ok(false);
        }

        let contact = self.profile.contact.clone();
        debug!(
            "{} feed accepted submission for {} as {}",
            self.platform,
            url,
            contact.name.as_deref().unwrap_or("<unnamed>")
        );
        self.submitted.write().await.push(Submission {
            url: url.to_string(),
            contact,
        });
        Ok(true)
    }

    async fn shutdown(&self) {
        *self.listings.write().await = None;
        self.submitted.write().await.clear();
    }
}
