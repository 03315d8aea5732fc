//! Types for the platform driver contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Recruiting site a listing came from or a driver talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Naukri,
    Linkedin,
    Indeed,
    Unknown,
}

impl Platform {
    /// All platforms a driver can be registered for.
    pub const SUPPORTED: [Platform; 3] = [Platform::Naukri, Platform::Linkedin, Platform::Indeed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Naukri => "naukri",
            Platform::Linkedin => "linkedin",
            Platform::Indeed => "indeed",
            Platform::Unknown => "unknown",
        }
    }

    /// Infer the platform from a listing URL's domain.
    ///
    /// The stored platform tag on a listing is not trusted for routing;
    /// the URL is what the driver will actually navigate to.
    pub fn from_url(url: &str) -> Self {
        const DOMAINS: [(&str, Platform); 3] = [
            ("naukri.com", Platform::Naukri),
            ("linkedin.com", Platform::Linkedin),
            ("indeed.com", Platform::Indeed),
        ];

        let Ok(parsed) = url::Url::parse(url.trim()) else {
            return Platform::Unknown;
        };
        let host = parsed.host_str().unwrap_or_default().to_lowercase();

        DOMAINS
            .iter()
            .find(|(domain, _)| {
                host == *domain
                    || host
                        .strip_suffix(*domain)
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
            .map_or(Platform::Unknown, |(_, platform)| *platform)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered job posting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    /// Free-text requirements section, when the site separates it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    /// Experience line as displayed by the site (e.g. "3-5 Yrs").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    pub url: String,
    /// Platform tag assigned by the driver that found the listing.
    pub platform: Platform,
}

/// Parameters for one driver search call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    pub keywords: Vec<String>,
    /// `None` is the location-less pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Maximum listings the driver should return.
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(keywords: Vec<String>, location: Option<String>, limit: usize) -> Self {
        Self {
            keywords,
            location,
            limit,
        }
    }

    /// Location as a display string ("" for the location-less pass).
    pub fn location_label(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }
}

/// Errors a platform driver can report.
///
/// "No results" is never an error; drivers return an empty list instead.
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("driver unavailable: {0}")]
    Unavailable(String),

    #[error("request timeout")]
    Timeout,

    #[error("internal driver error: {0}")]
    Internal(String),
}

/// Site-specific search/apply capability.
///
/// One implementation per recruiting site. The pipeline only depends on
/// this trait; how a driver reaches the site is its own business.
#[async_trait]
pub trait PlatformDriver: Send + Sync {
    /// Platform this driver serves (also its registry key).
    fn platform(&self) -> Platform;

    /// Log in to the site. Idempotent: returns `Ok(true)` when a session is
    /// already active.
    async fn authenticate(&self) -> Result<bool, DriverError>;

    /// Search for listings. Best effort; an empty list means no results.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, DriverError>;

    /// Submit an application for the listing at `url`.
    ///
    /// `Ok(true)` only on confirmed submission, `Ok(false)` for a known
    /// non-submittable state (e.g. the site redirects to an external form).
    async fn submit_application(&self, url: &str) -> Result<bool, DriverError>;

    /// Release per-driver resources. Safe to call without prior use.
    async fn shutdown(&self);
}
