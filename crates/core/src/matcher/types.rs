//! Types for listing scoring and ranking.

use serde::{Deserialize, Serialize};

use crate::driver::Listing;

/// Points each scoring factor contributed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    /// Skill coverage (0-40).
    pub skills: f32,
    /// Keyword coverage (0-20).
    pub keywords: f32,
    /// Experience fit (0-20).
    pub experience: f32,
    /// Title relevance (0 or 10).
    pub title: f32,
    /// Education relevance (0 or 10).
    pub education: f32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f32 {
        (self.skills + self.keywords + self.experience + self.title + self.education).min(100.0)
    }
}

/// Everything the scoring engine derived from one listing's text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchDetails {
    /// Final score (0-100).
    pub score: f32,
    pub breakdown: ScoreBreakdown,
    /// Profile skills found literally or through a synonym, in profile order.
    pub matched_skills: Vec<String>,
    /// Profile skills not found at all (first 5).
    pub missing_skills: Vec<String>,
    /// Whether the candidate meets the required experience (true when none was found).
    pub experience_match: bool,
    /// Years of experience the listing asks for, when stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_experience: Option<u32>,
    /// Number of profile keywords present in the listing.
    pub keyword_matches: usize,
    /// Human-readable explanation of the score.
    pub rationale: String,
}

/// A listing that passed scoring, with its score details.
///
/// Created once by the ranker and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub listing: Listing,
    pub score: f32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_experience: Option<u32>,
    pub keyword_matches: usize,
    pub rationale: String,
}

impl MatchResult {
    pub fn new(listing: Listing, details: MatchDetails) -> Self {
        Self {
            listing,
            score: details.score,
            matched_skills: details.matched_skills,
            missing_skills: details.missing_skills,
            experience_match: details.experience_match,
            required_experience: details.required_experience,
            keyword_matches: details.keyword_matches,
            rationale: details.rationale,
        }
    }
}
