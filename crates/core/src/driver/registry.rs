//! Registry of platform drivers, keyed by platform.

use std::sync::Arc;

use super::{Platform, PlatformDriver};

/// Ordered set of drivers, at most one per platform.
///
/// Registration order is preserved; the aggregator uses it as the
/// discovery order of listings.
#[derive(Clone, Default)]
pub struct DriverRegistry {
    drivers: Vec<Arc<dyn PlatformDriver>>,
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("platforms", &self.platforms())
            .finish()
    }
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver. A driver for an already-registered platform
    /// replaces the previous one in place.
    pub fn register(&mut self, driver: Arc<dyn PlatformDriver>) {
        let platform = driver.platform();
        match self.drivers.iter().position(|d| d.platform() == platform) {
            Some(idx) => self.drivers[idx] = driver,
            None => self.drivers.push(driver),
        }
    }

    /// Builder-style `register`.
    pub fn with_driver(mut self, driver: Arc<dyn PlatformDriver>) -> Self {
        self.register(driver);
        self
    }

    pub fn get(&self, platform: Platform) -> Option<&Arc<dyn PlatformDriver>> {
        self.drivers.iter().find(|d| d.platform() == platform)
    }

    pub fn contains(&self, platform: Platform) -> bool {
        self.get(platform).is_some()
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.drivers.iter().map(|d| d.platform()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn PlatformDriver>> {
        self.drivers.iter()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Registry restricted to the given platforms, keeping registration order.
    pub fn subset(&self, platforms: &[Platform]) -> Self {
        Self {
            drivers: self
                .drivers
                .iter()
                .filter(|d| platforms.contains(&d.platform()))
                .cloned()
                .collect(),
        }
    }
}
