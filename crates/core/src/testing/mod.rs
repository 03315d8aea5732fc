//! Testing utilities and mock implementations.
//!
//! This module provides a mock of the platform driver trait plus fixtures,
//! allowing full pipeline runs without touching any recruiting site.
//!
//! # Example
//!
//! ```rust,ignore
//! use jobhound_core::testing::{fixtures, MockDriver};
//!
//! let linkedin = Arc::new(MockDriver::with_listings(
//!     Platform::Linkedin,
//!     vec![fixtures::java_listing("https://www.linkedin.com/jobs/view/1")],
//! ));
//! let registry = DriverRegistry::new().with_driver(linkedin.clone());
//!
//! // Run the pipeline, then assert on what the driver saw
//! assert_eq!(linkedin.recorded_submissions().await.len(), 1);
//! ```

mod mock_driver;

pub use mock_driver::MockDriver;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::driver::{Listing, Platform};
    use crate::profile::{ContactInfo, Profile};

    /// Create a test listing with reasonable defaults.
    ///
    /// The platform tag is inferred from the URL.
    pub fn listing(title: &str, url: &str) -> Listing {
        Listing {
            title: title.to_string(),
            company: "Acme Corp".to_string(),
            location: "Bangalore, India".to_string(),
            description: String::new(),
            requirements: None,
            experience: None,
            url: url.to_string(),
            platform: Platform::from_url(url),
        }
    }

    /// Create a listing that scores 90 against [`profile`].
    pub fn java_listing(url: &str) -> Listing {
        let mut listing = listing("Java Developer", url);
        listing.description = "Java and Spring Boot microservices, 2 years".to_string();
        listing
    }

    /// Create a listing that scores well below the default threshold
    /// against [`profile`].
    pub fn unrelated_listing(url: &str) -> Listing {
        let mut listing = listing("Store Manager", url);
        listing.description = "Retail operations, 8 years".to_string();
        listing
    }

    /// Java backend candidate with 3 years of experience.
    pub fn profile() -> Profile {
        Profile::new(["java", "spring boot"], 3, ["java"]).with_contact(ContactInfo {
            name: Some("Test Candidate".to_string()),
            email: Some("candidate@example.com".to_string()),
            phone: None,
        })
    }
}
