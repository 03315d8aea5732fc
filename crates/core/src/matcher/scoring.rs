//! Weighted scoring of listings against a candidate profile.
//!
//! Pure and deterministic: the same profile and listing text always yield
//! the same score and rationale. No I/O, no clock.

use std::sync::Arc;

use tracing::debug;

use crate::driver::Listing;
use crate::profile::Profile;

use super::experience::{experience_points, required_experience};
use super::types::{MatchDetails, MatchResult, ScoreBreakdown};

const SKILL_POINTS: f32 = 40.0;
const KEYWORD_POINTS: f32 = 20.0;
const TITLE_POINTS: f32 = 10.0;
const EDUCATION_POINTS: f32 = 10.0;

/// Missing skills kept in the details.
const MAX_MISSING_SKILLS: usize = 5;

/// Aliases that grant credit for a skill whose literal text is absent.
/// Order matters: the first alias found wins.
const SKILL_SYNONYMS: &[(&str, &[&str])] = &[
    ("java", &["j2ee", "j2se", "jdk", "jvm"]),
    ("spring boot", &["springboot", "spring framework"]),
    ("rest apis", &["restful", "rest api", "api development"]),
    ("microservices", &["microservice", "micro service"]),
    ("mysql", &["sql", "database"]),
    ("docker", &["containerization", "containers"]),
    ("devops", &["ci/cd", "continuous integration", "continuous deployment"]),
];

const TITLE_KEYWORDS: &[&str] = &["developer", "engineer", "backend", "java", "software"];

const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor",
    "btech",
    "b.tech",
    "computer science",
    "engineering",
];

/// Scores listings against one profile.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    profile: Arc<Profile>,
}

impl ScoringEngine {
    pub fn new(profile: Arc<Profile>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Score raw listing text.
    ///
    /// Skills, keywords and education are searched in
    /// `title + description + requirements`; the required experience is
    /// extracted from `experience_text + description`.
    pub fn score(
        &self,
        title: &str,
        description: &str,
        requirements: &str,
        experience_text: &str,
    ) -> MatchDetails {
        let full_text = format!("{} {} {}", title, description, requirements).to_lowercase();

        let (matched_skills, missing_skills) = self.match_skills(&full_text);
        let skill_score = if self.profile.skills.is_empty() {
            debug!("Profile has no skills, skill score is 0");
            0.0
        } else {
            (matched_skills.len() as f32 * SKILL_POINTS / self.profile.skills.len() as f32)
                .min(SKILL_POINTS)
        };

        let keyword_matches = self
            .profile
            .keywords
            .iter()
            .filter(|kw| full_text.contains(kw.as_str()))
            .count();
        let keyword_score = if self.profile.keywords.is_empty() {
            debug!("Profile has no keywords, keyword score is 0");
            0.0
        } else {
            (keyword_matches as f32 / self.profile.keywords.len() as f32 * KEYWORD_POINTS)
                .min(KEYWORD_POINTS)
        };

        let required = required_experience(&format!("{} {}", experience_text, description));
        let experience_score = experience_points(self.profile.experience_years, required);
        // Any shortfall is a mismatch, even the one- and two-year gaps that still earn points
        let experience_match = required.is_none_or(|req| self.profile.experience_years >= req);

        let title_lower = title.to_lowercase();
        let title_score = if TITLE_KEYWORDS.iter().any(|kw| title_lower.contains(kw)) {
            TITLE_POINTS
        } else {
            0.0
        };

        let education_score = if EDUCATION_KEYWORDS.iter().any(|kw| full_text.contains(kw)) {
            EDUCATION_POINTS
        } else {
            0.0
        };

        let breakdown = ScoreBreakdown {
            skills: skill_score,
            keywords: keyword_score,
            experience: experience_score,
            title: title_score,
            education: education_score,
        };
        let score = breakdown.total();

        let rationale = rationale(
            score,
            matched_skills.len(),
            keyword_matches,
            required,
            experience_match,
        );

        MatchDetails {
            score,
            breakdown,
            matched_skills,
            missing_skills,
            experience_match,
            required_experience: required,
            keyword_matches,
            rationale,
        }
    }

    /// Score a listing and wrap it into a [`MatchResult`].
    pub fn score_listing(&self, listing: &Listing) -> MatchResult {
        let details = self.score(
            &listing.title,
            &listing.description,
            listing.requirements.as_deref().unwrap_or_default(),
            listing.experience.as_deref().unwrap_or_default(),
        );
        MatchResult::new(listing.clone(), details)
    }

    /// Split profile skills into matched (literal or alias) and missing.
    fn match_skills(&self, full_text: &str) -> (Vec<String>, Vec<String>) {
        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for skill in &self.profile.skills {
            if full_text.contains(skill.as_str()) || synonym_present(skill, full_text) {
                matched.push(skill.clone());
            } else {
                missing.push(skill.clone());
            }
        }

        missing.truncate(MAX_MISSING_SKILLS);
        (matched, missing)
    }
}

fn synonym_present(skill: &str, full_text: &str) -> bool {
    SKILL_SYNONYMS
        .iter()
        .find(|(name, _)| *name == skill)
        .is_some_and(|(_, aliases)| aliases.iter().any(|alias| full_text.contains(alias)))
}

fn rationale(
    score: f32,
    matched_skills: usize,
    keyword_matches: usize,
    required: Option<u32>,
    experience_match: bool,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    let bracket = if score >= 80.0 {
        "Excellent match"
    } else if score >= 70.0 {
        "Good match"
    } else if score >= 60.0 {
        "Moderate match"
    } else {
        "Partial match"
    };
    parts.push(bracket.to_string());

    if matched_skills > 0 {
        parts.push(format!("Matched {} skills", matched_skills));
    }
    if keyword_matches > 0 {
        parts.push(format!("Matched {} keywords", keyword_matches));
    }

    if let Some(req) = required {
        if experience_match {
            parts.push(format!("Experience requirement met ({} years)", req));
        } else {
            parts.push(format!("Experience gap: requires {} years", req));
        }
    }

    parts.join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(skills: &[&str], years: u32, keywords: &[&str]) -> ScoringEngine {
        ScoringEngine::new(Arc::new(Profile::new(
            skills.iter().copied(),
            years,
            keywords.iter().copied(),
        )))
    }

    #[test]
    fn test_senior_java_listing_with_experience_gap() {
        let engine = engine(&["java", "spring boot"], 3, &["java"]);
        let details = engine.score(
            "Senior Java Developer",
            "Requires 5+ years experience with Java and Spring Boot",
            "",
            "",
        );

        assert_eq!(details.breakdown.skills, 40.0);
        assert_eq!(details.breakdown.keywords, 20.0);
        assert_eq!(details.breakdown.experience, 10.0);
        assert_eq!(details.breakdown.title, 10.0);
        assert_eq!(details.breakdown.education, 0.0);
        assert!(details.score >= 70.0);
        assert_eq!(details.required_experience, Some(5));
        assert!(!details.experience_match);
        assert!(details
            .rationale
            .contains("Experience gap: requires 5 years"));
        assert_eq!(
            details.rationale,
            "Excellent match. Matched 2 skills. Matched 1 keywords. Experience gap: requires 5 years"
        );
    }

    #[test]
    fn test_experience_requirement_met() {
        let engine = engine(&["rust"], 6, &[]);
        let details = engine.score("Backend Engineer", "Rust services", "", "3-5 Yrs, 4 years");

        assert_eq!(details.required_experience, Some(4));
        assert!(details.experience_match);
        assert_eq!(details.breakdown.experience, 20.0);
        assert!(details
            .rationale
            .ends_with("Experience requirement met (4 years)"));
    }

    #[test]
    fn test_one_year_shortfall_is_a_gap() {
        let engine = engine(&["rust"], 4, &[]);
        let details = engine.score("Rust Developer", "Requires 5 years", "", "");

        assert_eq!(details.breakdown.experience, 15.0);
        assert!(!details.experience_match);
        assert!(details.rationale.ends_with("Experience gap: requires 5 years"));
    }

    #[test]
    fn test_no_experience_requirement() {
        let engine = engine(&["rust"], 0, &[]);
        let details = engine.score("Rust Developer", "Join us", "", "");

        assert_eq!(details.required_experience, None);
        assert!(details.experience_match);
        assert_eq!(details.breakdown.experience, 15.0);
        assert!(!details.rationale.contains("Experience"));
    }

    #[test]
    fn test_synonym_grants_credit_once() {
        let engine = engine(&["java", "docker", "kotlin"], 5, &[]);
        let details = engine.score(
            "Platform Engineer",
            "JVM tuning, J2EE legacy, containers everywhere",
            "",
            "",
        );

        assert_eq!(details.matched_skills, vec!["java", "docker"]);
        assert_eq!(details.missing_skills, vec!["kotlin"]);
        let expected = 2.0 * 40.0 / 3.0;
        assert!((details.breakdown.skills - expected).abs() < 1e-4);
    }

    #[test]
    fn test_missing_skills_capped_at_five() {
        let engine = engine(&["a1", "b2", "c3", "d4", "e5", "f6", "g7"], 1, &[]);
        let details = engine.score("Chef", "Cooking", "", "");

        assert!(details.matched_skills.is_empty());
        assert_eq!(details.missing_skills, vec!["a1", "b2", "c3", "d4", "e5"]);
    }

    #[test]
    fn test_empty_profile_does_not_divide_by_zero() {
        let engine = engine(&[], 0, &[]);
        let details = engine.score("Software Engineer", "Bachelor in Computer Science", "", "");

        assert_eq!(details.breakdown.skills, 0.0);
        assert_eq!(details.breakdown.keywords, 0.0);
        assert!(details.score.is_finite());
        // 15 (no requirement) + 10 (title) + 10 (education)
        assert_eq!(details.score, 35.0);
        assert_eq!(details.rationale, "Partial match");
    }

    #[test]
    fn test_requirements_text_counts_for_skills_and_education() {
        let engine = engine(&["postgres"], 2, &["backend"]);
        let details = engine.score(
            "Analyst",
            "Data work",
            "Postgres, B.Tech preferred, backend exposure",
            "",
        );

        assert_eq!(details.matched_skills, vec!["postgres"]);
        assert_eq!(details.keyword_matches, 1);
        assert_eq!(details.breakdown.education, 10.0);
        assert_eq!(details.breakdown.title, 0.0);
    }

    #[test]
    fn test_score_is_capped_and_in_range() {
        let capped = engine(&["java"], 10, &["java"]);
        let details = capped.score(
            "Java Software Engineer",
            "Java, computer science degree, 2 years",
            "",
            "",
        );
        assert_eq!(details.score, 100.0);

        let low = engine(&["cobol"], 0, &["mainframe"]);
        let details = low.score("Barista", "10 years latte art", "", "");
        assert!((0.0..=100.0).contains(&details.score));
        assert_eq!(details.score, 5.0);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let engine = engine(&["java", "spring boot", "mysql"], 4, &["backend", "java"]);
        let first = engine.score("Backend Developer", "SQL, Spring Framework, 5 years", "", "");
        let second = engine.score("Backend Developer", "SQL, Spring Framework, 5 years", "", "");
        assert_eq!(first, second);
    }

    #[test]
    fn test_score_listing_uses_optional_fields() {
        let engine = engine(&["kafka"], 1, &[]);
        let listing = Listing {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Pune".to_string(),
            description: "Streaming team".to_string(),
            requirements: Some("Kafka".to_string()),
            experience: Some("3 years".to_string()),
            url: "https://www.naukri.com/job-1".to_string(),
            platform: crate::driver::Platform::Naukri,
        };

        let result = engine.score_listing(&listing);
        assert_eq!(result.listing, listing);
        assert_eq!(result.matched_skills, vec!["kafka"]);
        assert_eq!(result.required_experience, Some(3));
        assert!(!result.experience_match);
    }
}
