//! Threshold filtering and ordering of scored listings.

use tracing::{debug, info};

use crate::driver::Listing;
use crate::metrics::MATCH_SCORES;

use super::scoring::ScoringEngine;
use super::types::MatchResult;

/// Default minimum score a listing needs to be ranked.
pub const DEFAULT_MIN_SCORE: f32 = 70.0;

/// Score every listing, keep those at or above `min_score` and sort them by
/// score descending.
///
/// The sort is stable, so equal scores keep discovery order. No cap is
/// applied here; the sequencer decides how many to act on.
pub fn rank(listings: &[Listing], engine: &ScoringEngine, min_score: f32) -> Vec<MatchResult> {
    let mut ranked: Vec<MatchResult> = listings
        .iter()
        .map(|listing| engine.score_listing(listing))
        .inspect(|result| {
            MATCH_SCORES.observe(result.score as f64);
            debug!(
                "Scored '{}' at {} ({:.1}): {}",
                result.listing.title, result.listing.company, result.score, result.rationale
            );
        })
        .filter(|result| result.score >= min_score)
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    info!(
        "{} of {} listings scored at or above {}",
        ranked.len(),
        listings.len(),
        min_score
    );
    ranked
}
