//! Extraction of the required years of experience from listing text.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Experience patterns in priority order. The first pattern with any match
/// wins; its first match supplies the number (the lower bound for ranges).
static EXPERIENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d+)\+?\s*years?",
        r"(\d+)\s*-\s*(\d+)\s*years?",
        r"minimum\s*(\d+)\s*years?",
        r"at least\s*(\d+)\s*years?",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Find the years of experience a listing asks for.
///
/// `text` is matched case-insensitively. Returns `None` when no pattern
/// matches or the number does not fit a `u32`.
pub fn required_experience(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    EXPERIENCE_PATTERNS
        .iter()
        .find_map(|re| re.captures(&lower))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Points for experience fit (0-20) given the requirement, if any.
pub fn experience_points(candidate_years: u32, required: Option<u32>) -> f32 {
    match required {
        None => 15.0,
        Some(req) if candidate_years >= req => 20.0,
        Some(req) => match req - candidate_years {
            1 => 15.0,
            2 => 10.0,
            _ => 5.0,
        },
    }
}
