//! Deduplication of aggregated listings by canonical URL.

use std::collections::HashSet;

use tracing::debug;

use super::canonical_url;
use crate::driver::Listing;

/// Deduplicate listings by canonical URL.
///
/// The first occurrence of a URL wins and keeps its position, so the output
/// preserves discovery order. Listings without a URL are dropped: they can
/// neither be deduplicated nor routed to a driver later.
pub fn deduplicate_listings(raw: Vec<Listing>) -> Vec<Listing> {
    let total = raw.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let mut unique = Vec::with_capacity(total);
    let mut missing_url = 0usize;

    for listing in raw {
        let key = canonical_url(&listing.url);
        if key.is_empty() {
            missing_url += 1;
            continue;
        }
        if seen.insert(key) {
            unique.push(listing);
        }
    }

    debug!(
        "Deduplicated {} listings into {} ({} without URL)",
        total,
        unique.len(),
        missing_url
    );
    unique
}
