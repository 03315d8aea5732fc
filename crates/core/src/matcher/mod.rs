//! Listing scoring against the candidate profile, and ranking.

mod experience;
mod ranker;
mod scoring;
mod types;

pub use experience::{experience_points, required_experience};
pub use ranker::{rank, DEFAULT_MIN_SCORE};
pub use scoring::ScoringEngine;
pub use types::{MatchDetails, MatchResult, ScoreBreakdown};
