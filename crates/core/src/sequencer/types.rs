//! Types for application sequencing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::driver::Platform;
use crate::matcher::MatchResult;

/// Terminal state of one application attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Applied,
    Failed,
    /// No driver is registered for the listing's platform.
    SkippedNoDriver,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Applied => "applied",
            OutcomeStatus::Failed => "failed",
            OutcomeStatus::SkippedNoDriver => "skipped_no_driver",
        }
    }
}

/// Result of driving one ranked listing through its platform's driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationOutcome {
    pub status: OutcomeStatus,
    pub title: String,
    pub company: String,
    pub url: String,
    /// Platform inferred from the URL (the one routed to).
    pub platform: Platform,
    pub score: f32,
    /// Why the attempt did not result in an application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

impl ApplicationOutcome {
    fn new(
        status: OutcomeStatus,
        result: &MatchResult,
        platform: Platform,
        reason: Option<String>,
    ) -> Self {
        Self {
            status,
            title: result.listing.title.clone(),
            company: result.listing.company.clone(),
            url: result.listing.url.clone(),
            platform,
            score: result.score,
            reason,
            attempted_at: Utc::now(),
        }
    }

    pub fn applied(result: &MatchResult, platform: Platform) -> Self {
        Self::new(OutcomeStatus::Applied, result, platform, None)
    }

    pub fn failed(result: &MatchResult, platform: Platform, reason: impl Into<String>) -> Self {
        Self::new(OutcomeStatus::Failed, result, platform, Some(reason.into()))
    }

    pub fn skipped_no_driver(result: &MatchResult, platform: Platform) -> Self {
        Self::new(
            OutcomeStatus::SkippedNoDriver,
            result,
            platform,
            Some(format!("no driver registered for platform: {}", platform)),
        )
    }

    pub fn is_applied(&self) -> bool {
        self.status == OutcomeStatus::Applied
    }
}
