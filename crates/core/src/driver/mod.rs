//! Platform drivers: the per-site search/apply capability.

mod feed;
mod registry;
mod types;

pub use feed::{FeedDriver, Submission};
pub use registry::DriverRegistry;
pub use types::*;

use std::sync::Arc;

use tracing::info;

use crate::config::{ConfigError, DriverBackend, DriverConfig};
use crate::profile::Profile;

/// Factory function to create the driver registry from config.
///
/// Every driver shares `profile` for the contact details it submits.
pub fn build_registry(
    configs: &[DriverConfig],
    profile: Arc<Profile>,
) -> Result<DriverRegistry, ConfigError> {
    let mut registry = DriverRegistry::new();

    for config in configs {
        let driver: Arc<dyn PlatformDriver> = match config.backend {
            DriverBackend::Feed => {
                let feed = config.feed.as_ref().ok_or_else(|| {
                    ConfigError::ValidationError(format!(
                        "feed must be set for driver '{}' when using the feed backend",
                        config.platform
                    ))
                })?;
                Arc::new(FeedDriver::new(
                    config.platform,
                    feed,
                    Arc::clone(&profile),
                ))
            }
        };
        info!(
            "Registered {} driver ({} backend)",
            config.platform,
            config.backend.as_str()
        );
        registry.register(driver);
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedDriverConfig;
    use crate::testing::fixtures;
    use std::path::PathBuf;

    fn profile() -> Arc<Profile> {
        Arc::new(fixtures::profile())
    }

    #[test]
    fn test_build_registry_feed() {
        let configs = vec![
            DriverConfig {
                platform: Platform::Naukri,
                backend: DriverBackend::Feed,
                feed: Some(FeedDriverConfig {
                    path: PathBuf::from("naukri.json"),
                    accept_submissions: true,
                }),
            },
            DriverConfig {
                platform: Platform::Indeed,
                backend: DriverBackend::Feed,
                feed: Some(FeedDriverConfig {
                    path: PathBuf::from("indeed.json"),
                    accept_submissions: false,
                }),
            },
        ];
        let registry = build_registry(&configs, profile()).unwrap();
        assert_eq!(registry.platforms(), vec![Platform::Naukri, Platform::Indeed]);
    }

    #[test]
    fn test_build_registry_feed_missing_section() {
        let configs = vec![DriverConfig {
            platform: Platform::Linkedin,
            backend: DriverBackend::Feed,
            feed: None,
        }];
        let err = build_registry(&configs, profile()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_build_registry_empty() {
        assert!(build_registry(&[], profile()).unwrap().is_empty());
    }
}
