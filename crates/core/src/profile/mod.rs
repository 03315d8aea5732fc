//! Candidate profile.
//!
//! The profile is built once from configuration and shared read-only
//! (`Arc<Profile>`) between the scoring engine and the platform drivers.

mod types;

pub use types::{ContactInfo, Profile};
