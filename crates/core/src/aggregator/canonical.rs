//! Canonical URL normalization, the identity key of a listing.

use url::Url;

/// Query parameters that only carry click tracking.
const TRACKING_PARAMS: &[&str] = &["trk", "trackingid", "refid"];

fn is_tracking_param(name: &str) -> bool {
    let name = name.to_lowercase();
    name.starts_with("utm_") || TRACKING_PARAMS.contains(&name.as_str())
}

/// Normalize a listing URL into its identity key.
///
/// Rules, applied in order:
/// 1. surrounding whitespace is trimmed; an empty input stays empty
/// 2. the fragment is dropped
/// 3. tracking query parameters (`utm_*`, `trk`, `trackingId`, `refId`) are dropped,
///    other parameters keep their order
/// 4. a trailing `/` is stripped from a non-root path
/// 5. the whole result is lowercased
///
/// Input the `url` crate cannot parse falls back to trim + strip trailing
/// slashes + lowercase.
pub fn canonical_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => return trimmed.trim_end_matches('/').to_lowercase(),
    };

    url.set_fragment(None);

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept.iter());
    }

    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }

    url.to_string().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_trailing_slash() {
        assert_eq!(
            canonical_url("HTTPS://www.LinkedIn.com/jobs/view/123/"),
            "https://www.linkedin.com/jobs/view/123"
        );
        assert_eq!(
            canonical_url("https://www.linkedin.com/jobs/view/123"),
            canonical_url("https://www.linkedin.com/Jobs/View/123/")
        );
    }

    #[test]
    fn test_fragment_and_tracking_params_dropped() {
        assert_eq!(
            canonical_url("https://www.linkedin.com/jobs/view/9/?refId=abc&trackingId=xyz#top"),
            "https://www.linkedin.com/jobs/view/9"
        );
        assert_eq!(
            canonical_url("https://in.indeed.com/viewjob?jk=ABC123&utm_source=mail"),
            "https://in.indeed.com/viewjob?jk=abc123"
        );
    }

    #[test]
    fn test_identity_query_params_kept() {
        assert_ne!(
            canonical_url("https://in.indeed.com/viewjob?jk=1"),
            canonical_url("https://in.indeed.com/viewjob?jk=2")
        );
    }

    #[test]
    fn test_root_path_and_empty() {
        assert_eq!(canonical_url("https://example.com"), "https://example.com/");
        assert_eq!(canonical_url("https://example.com/"), "https://example.com/");
        assert_eq!(canonical_url("   "), "");
    }

    #[test]
    fn test_unparseable_fallback() {
        assert_eq!(canonical_url("  Jobs/Backend-Dev/ "), "jobs/backend-dev");
    }
}
