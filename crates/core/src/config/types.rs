use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::driver::Platform;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub profile: ProfileConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub apply: ApplyConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub drivers: Vec<DriverConfig>,
}

/// Candidate profile configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
}

/// Search and matching configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Target locations; only the first 3 are searched.
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default = "default_max_listings_per_search")]
    pub max_listings_per_search: usize,
    #[serde(default = "default_min_match_score")]
    pub min_match_score: f32,
    /// Pause between consecutive searches on the same platform (default: 0)
    #[serde(default)]
    pub search_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            locations: Vec::new(),
            max_listings_per_search: default_max_listings_per_search(),
            min_match_score: default_min_match_score(),
            search_delay_ms: 0,
        }
    }
}

fn default_max_listings_per_search() -> usize {
    50
}

fn default_min_match_score() -> f32 {
    70.0
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApplyConfig {
    /// Submit applications (false = rank and report only)
    #[serde(default = "default_auto_apply")]
    pub auto_apply: bool,
    /// Maximum applications per run (default: all ranked listings)
    #[serde(default)]
    pub max_applications: Option<usize>,
    /// Delay between consecutive applications in seconds
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            auto_apply: default_auto_apply(),
            max_applications: None,
            delay_secs: default_delay_secs(),
        }
    }
}

fn default_auto_apply() -> bool {
    true
}

fn default_delay_secs() -> u64 {
    5
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_results_file")]
    pub results_file: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            results_file: default_results_file(),
            report_file: default_report_file(),
        }
    }
}

impl OutputConfig {
    pub fn results_path(&self) -> PathBuf {
        self.dir.join(&self.results_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(&self.report_file)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_results_file() -> String {
    "job_search_results.json".to_string()
}

fn default_report_file() -> String {
    "job_bot_report.txt".to_string()
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// One platform driver
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriverConfig {
    pub platform: Platform,
    /// Driver backend type
    #[serde(default)]
    pub backend: DriverBackend,
    /// Feed-specific configuration (required when backend = "feed")
    #[serde(default)]
    pub feed: Option<FeedDriverConfig>,
}

/// Available driver backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DriverBackend {
    #[default]
    Feed,
    // Future: Browser
}

impl DriverBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverBackend::Feed => "feed",
        }
    }
}

/// Feed driver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedDriverConfig {
    /// JSON file holding an array of postings
    pub path: PathBuf,
    /// Whether submissions are confirmed (default: false)
    #[serde(default)]
    pub accept_submissions: bool,
}

/// Sanitized config for API responses (contact details redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub profile: SanitizedProfileConfig,
    pub search: SearchConfig,
    pub apply: ApplyConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
    pub drivers: Vec<SanitizedDriverConfig>,
}

/// Sanitized profile (contact fields reduced to presence flags)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProfileConfig {
    pub name_configured: bool,
    pub email_configured: bool,
    pub phone_configured: bool,
    pub skills: Vec<String>,
    pub experience_years: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDriverConfig {
    pub platform: Platform,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<FeedDriverConfig>,
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            profile: SanitizedProfileConfig {
                name_configured: is_set(&config.profile.name),
                email_configured: is_set(&config.profile.email),
                phone_configured: is_set(&config.profile.phone),
                skills: config.profile.skills.clone(),
                experience_years: config.profile.experience_years,
            },
            search: config.search.clone(),
            apply: config.apply.clone(),
            output: config.output.clone(),
            server: config.server.clone(),
            drivers: config
                .drivers
                .iter()
                .map(|d| SanitizedDriverConfig {
                    platform: d.platform,
                    backend: d.backend.as_str().to_string(),
                    feed: d.feed.clone(),
                })
                .collect(),
        }
    }
}
