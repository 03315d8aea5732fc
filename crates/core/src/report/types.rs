//! Run report record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::driver::{Listing, Platform};
use crate::matcher::MatchResult;
use crate::sequencer::{ApplicationOutcome, OutcomeStatus};

/// Ranked listing as persisted in the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedSummary {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub platform: Platform,
    pub score: f32,
    pub matched_skills: Vec<String>,
    pub rationale: String,
}

impl From<&MatchResult> for RankedSummary {
    fn from(result: &MatchResult) -> Self {
        Self {
            title: result.listing.title.clone(),
            company: result.listing.company.clone(),
            location: result.listing.location.clone(),
            url: result.listing.url.clone(),
            platform: result.listing.platform,
            score: result.score,
            matched_skills: result.matched_skills.clone(),
            rationale: result.rationale.clone(),
        }
    }
}

/// Run-level facts that are not derived from the pipeline data.
#[derive(Debug, Clone, Default)]
pub struct ReportMeta {
    pub run_id: String,
    pub min_score: f32,
    /// Digest of the profile and search settings the run used.
    pub fingerprint: String,
    pub cancelled: bool,
}

/// End state of one run. Built once, persisted as JSON and rendered to text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub min_score: f32,
    #[serde(default)]
    pub fingerprint: String,
    /// Unique listings found across all drivers.
    pub total_found: usize,
    /// Listings at or above the minimum score.
    pub matched: usize,
    pub applied: usize,
    pub failed: usize,
    /// Listings whose platform had no driver.
    #[serde(default)]
    pub skipped: usize,
    #[serde(default)]
    pub cancelled: bool,
    /// Ranked listings, best first.
    pub ranked: Vec<RankedSummary>,
    pub applied_outcomes: Vec<ApplicationOutcome>,
    /// Failed and skipped outcomes, in attempt order.
    pub failed_outcomes: Vec<ApplicationOutcome>,
}

impl RunReport {
    /// Aggregate the run's listings, ranked results and outcomes.
    ///
    /// Counts are derived from the inputs only, so they always agree with
    /// the lists in the record.
    pub fn build(
        all_listings: &[Listing],
        ranked: &[MatchResult],
        outcomes: &[ApplicationOutcome],
        meta: ReportMeta,
    ) -> Self {
        let count = |status: OutcomeStatus| outcomes.iter().filter(|o| o.status == status).count();

        Self {
            run_id: meta.run_id,
            timestamp: Utc::now(),
            min_score: meta.min_score,
            fingerprint: meta.fingerprint,
            total_found: all_listings.len(),
            matched: ranked.len(),
            applied: count(OutcomeStatus::Applied),
            failed: count(OutcomeStatus::Failed),
            skipped: count(OutcomeStatus::SkippedNoDriver),
            cancelled: meta.cancelled,
            ranked: ranked.iter().map(RankedSummary::from).collect(),
            applied_outcomes: outcomes.iter().filter(|o| o.is_applied()).cloned().collect(),
            failed_outcomes: outcomes
                .iter()
                .filter(|o| !o.is_applied())
                .cloned()
                .collect(),
        }
    }

    /// Report of a run that ended before anything was found.
    pub fn empty(meta: ReportMeta) -> Self {
        Self::build(&[], &[], &[], meta)
    }
}
