use std::collections::HashSet;

use super::{types::Config, ConfigError, DriverBackend};
use crate::driver::Platform;

/// Validate configuration
/// Currently validates:
/// - Minimum match score is within 0-100
/// - Listing and application limits are not 0
/// - Server port is not 0
/// - Drivers name a supported platform, at most once, with their backend section
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let min_score = config.search.min_match_score;
    if !(0.0..=100.0).contains(&min_score) {
        return Err(ConfigError::ValidationError(format!(
            "search.min_match_score must be within 0-100, got {}",
            min_score
        )));
    }

    if config.search.max_listings_per_search == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_listings_per_search cannot be 0".to_string(),
        ));
    }

    if config.apply.max_applications == Some(0) {
        return Err(ConfigError::ValidationError(
            "apply.max_applications cannot be 0 (omit it to apply to all)".to_string(),
        ));
    }

    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for driver in &config.drivers {
        if driver.platform == Platform::Unknown {
            return Err(ConfigError::ValidationError(
                "driver platform must be one of naukri, linkedin, indeed".to_string(),
            ));
        }
        if !seen.insert(driver.platform) {
            return Err(ConfigError::ValidationError(format!(
                "driver for platform '{}' configured more than once",
                driver.platform
            )));
        }

        match driver.backend {
            DriverBackend::Feed => {
                let feed = driver.feed.as_ref().ok_or_else(|| {
                    ConfigError::ValidationError(format!(
                        "driver '{}' uses backend 'feed' but has no [drivers.feed] section",
                        driver.platform
                    ))
                })?;
                if feed.path.as_os_str().is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "driver '{}' feed path cannot be empty",
                        driver.platform
                    )));
                }
            }
        }
    }

    Ok(())
}
