//! Application sequencer implementation.
//!
//! Walks the ranked list strictly in order, one submission at a time:
//! - The driver is chosen from the listing URL's domain
//! - Every driver failure becomes a Failed outcome; nothing is retried
//! - Attempts are paced by a fixed delay that cancellation interrupts

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ApplyConfig;
use crate::driver::{DriverRegistry, Platform};
use crate::matcher::MatchResult;
use crate::metrics::{APPLICATIONS, DRIVER_CALLS};

use super::types::ApplicationOutcome;

/// Configuration for the sequencer.
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Maximum listings to act on (`None` = all ranked).
    pub max_applications: Option<usize>,
    /// Pause between consecutive driver submissions.
    pub delay: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            max_applications: None,
            delay: Duration::from_secs(5),
        }
    }
}

impl From<&ApplyConfig> for SequencerConfig {
    fn from(config: &ApplyConfig) -> Self {
        Self {
            max_applications: config.max_applications,
            delay: Duration::from_secs(config.delay_secs),
        }
    }
}

/// Drives ranked listings through the matching driver's submit capability.
pub struct ApplicationSequencer {
    config: SequencerConfig,
    drivers: DriverRegistry,
    cancel: CancellationToken,
}

impl ApplicationSequencer {
    pub fn new(
        config: SequencerConfig,
        drivers: DriverRegistry,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            drivers,
            cancel,
        }
    }

    /// Apply to the ranked listings, in rank order.
    pub async fn apply(&self, ranked: &[MatchResult]) -> Vec<ApplicationOutcome> {
        self.apply_with(ranked, |_| {}).await
    }

    /// Like [`apply`](Self::apply), calling `on_outcome` after every item.
    ///
    /// Stops early, without an outcome for the remaining items, when the
    /// cancellation token fires.
    pub async fn apply_with<F>(
        &self,
        ranked: &[MatchResult],
        mut on_outcome: F,
    ) -> Vec<ApplicationOutcome>
    where
        F: FnMut(&ApplicationOutcome) + Send,
    {
        let cap = self
            .config
            .max_applications
            .unwrap_or(ranked.len())
            .min(ranked.len());
        let mut outcomes = Vec::with_capacity(cap);
        let mut driver_called = false;

        info!("Applying to {} of {} ranked listings", cap, ranked.len());

        for (idx, result) in ranked.iter().take(cap).enumerate() {
            if driver_called && !self.config.delay.is_zero() {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.config.delay) => {}
                }
            }
            if self.cancel.is_cancelled() {
                warn!(
                    "Sequencing cancelled after {} of {} applications",
                    outcomes.len(),
                    cap
                );
                break;
            }

            info!(
                "[{}/{}] Applying to '{}' at {} (score {:.1})",
                idx + 1,
                cap,
                result.listing.title,
                result.listing.company,
                result.score
            );

            let (outcome, called) = self.apply_one(result).await;
            driver_called = called;

            APPLICATIONS
                .with_label_values(&[outcome.platform.as_str(), outcome.status.as_str()])
                .inc();
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Attempt one listing. Returns the outcome and whether a driver was
    /// invoked.
    async fn apply_one(&self, result: &MatchResult) -> (ApplicationOutcome, bool) {
        let platform = Platform::from_url(&result.listing.url);
        let Some(driver) = self.drivers.get(platform) else {
            warn!(
                "No driver for platform {} ({}), skipping",
                platform, result.listing.url
            );
            return (ApplicationOutcome::skipped_no_driver(result, platform), false);
        };

        let outcome = match driver.submit_application(&result.listing.url).await {
            Ok(true) => {
                DRIVER_CALLS
                    .with_label_values(&[platform.as_str(), "submit", "success"])
                    .inc();
                info!("Applied to '{}' on {}", result.listing.title, platform);
                ApplicationOutcome::applied(result, platform)
            }
            Ok(false) => {
                DRIVER_CALLS
                    .with_label_values(&[platform.as_str(), "submit", "success"])
                    .inc();
                warn!(
                    "Application to '{}' on {} was not submitted",
                    result.listing.title, platform
                );
                ApplicationOutcome::failed(result, platform, "application not submitted")
            }
            Err(e) => {
                DRIVER_CALLS
                    .with_label_values(&[platform.as_str(), "submit", "error"])
                    .inc();
                warn!(
                    "Application to '{}' on {} failed: {}",
                    result.listing.title, platform, e
                );
                ApplicationOutcome::failed(result, platform, e.to_string())
            }
        };

        (outcome, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverError;
    use crate::matcher::ScoringEngine;
    use crate::sequencer::OutcomeStatus;
    use crate::testing::{fixtures, MockDriver};
    use std::sync::Arc;

    fn ranked(urls: &[&str]) -> Vec<MatchResult> {
        let engine = ScoringEngine::new(Arc::new(fixtures::profile()));
        urls.iter()
            .map(|url| engine.score_listing(&fixtures::java_listing(url)))
            .collect()
    }

    fn no_delay(max_applications: Option<usize>) -> SequencerConfig {
        SequencerConfig {
            max_applications,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_apply_routes_by_url_domain() {
        let linkedin = Arc::new(MockDriver::new(Platform::Linkedin));
        let indeed = Arc::new(MockDriver::new(Platform::Indeed));
        let registry = DriverRegistry::new()
            .with_driver(linkedin.clone())
            .with_driver(indeed.clone());

        // Platform tag says indeed, the URL says linkedin
        let mut results = ranked(&["https://www.linkedin.com/jobs/view/1"]);
        results[0].listing.platform = Platform::Indeed;

        let sequencer =
            ApplicationSequencer::new(no_delay(None), registry, CancellationToken::new());
        let outcomes = sequencer.apply(&results).await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, OutcomeStatus::Applied);
        assert_eq!(outcomes[0].platform, Platform::Linkedin);
        assert_eq!(linkedin.recorded_submissions().await.len(), 1);
        assert!(indeed.recorded_submissions().await.is_empty());
    }

    #[tokio::test]
    async fn test_apply_skips_platform_without_driver() {
        let linkedin = Arc::new(MockDriver::new(Platform::Linkedin));
        let registry = DriverRegistry::new().with_driver(linkedin.clone());

        let results = ranked(&[
            "https://www.naukri.com/job-listings-1",
            "https://careers.example.com/jobs/2",
            "https://www.linkedin.com/jobs/view/3",
        ]);
        let sequencer =
            ApplicationSequencer::new(no_delay(None), registry, CancellationToken::new());
        let outcomes = sequencer.apply(&results).await;

        let statuses: Vec<OutcomeStatus> = outcomes.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![
                OutcomeStatus::SkippedNoDriver,
                OutcomeStatus::SkippedNoDriver,
                OutcomeStatus::Applied
            ]
        );
        assert!(outcomes[0]
            .reason
            .as_deref()
            .unwrap()
            .contains("naukri"));
        assert_eq!(
            linkedin.recorded_submissions().await,
            vec!["https://www.linkedin.com/jobs/view/3".to_string()]
        );
    }

    #[tokio::test]
    async fn test_apply_converts_driver_failures() {
        let indeed = Arc::new(MockDriver::new(Platform::Indeed));
        indeed
            .set_submit_result("https://www.indeed.com/viewjob?jk=1", Ok(false))
            .await;
        indeed
            .set_submit_result(
                "https://www.indeed.com/viewjob?jk=2",
                Err(DriverError::Navigation("apply button missing".into())),
            )
            .await;
        let registry = DriverRegistry::new().with_driver(indeed);

        let results = ranked(&[
            "https://www.indeed.com/viewjob?jk=1",
            "https://www.indeed.com/viewjob?jk=2",
            "https://www.indeed.com/viewjob?jk=3",
        ]);
        let sequencer =
            ApplicationSequencer::new(no_delay(None), registry, CancellationToken::new());
        let outcomes = sequencer.apply(&results).await;

        assert_eq!(outcomes[0].status, OutcomeStatus::Failed);
        assert_eq!(
            outcomes[0].reason.as_deref(),
            Some("application not submitted")
        );
        assert_eq!(outcomes[1].status, OutcomeStatus::Failed);
        assert!(outcomes[1]
            .reason
            .as_deref()
            .unwrap()
            .contains("apply button missing"));
        assert_eq!(outcomes[2].status, OutcomeStatus::Applied);
    }

    #[tokio::test]
    async fn test_apply_respects_max_applications() {
        let linkedin = Arc::new(MockDriver::new(Platform::Linkedin));
        let registry = DriverRegistry::new().with_driver(linkedin.clone());

        let results = ranked(&[
            "https://www.linkedin.com/jobs/view/1",
            "https://www.linkedin.com/jobs/view/2",
            "https://www.linkedin.com/jobs/view/3",
        ]);
        let sequencer =
            ApplicationSequencer::new(no_delay(Some(2)), registry, CancellationToken::new());

        let mut seen = Vec::new();
        let outcomes = sequencer
            .apply_with(&results, |o| seen.push(o.url.clone()))
            .await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(seen.len(), 2);
        assert_eq!(
            linkedin.recorded_submissions().await,
            vec![
                "https://www.linkedin.com/jobs/view/1".to_string(),
                "https://www.linkedin.com/jobs/view/2".to_string()
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_delays_between_attempts_only() {
        let linkedin = Arc::new(MockDriver::new(Platform::Linkedin));
        let registry = DriverRegistry::new().with_driver(linkedin);

        let results = ranked(&[
            "https://www.linkedin.com/jobs/view/1",
            "https://www.linkedin.com/jobs/view/2",
            "https://www.linkedin.com/jobs/view/3",
        ]);
        let config = SequencerConfig {
            max_applications: None,
            delay: Duration::from_secs(5),
        };
        let sequencer = ApplicationSequencer::new(config, registry, CancellationToken::new());

        let start = tokio::time::Instant::now();
        let outcomes = sequencer.apply(&results).await;
        let elapsed = start.elapsed();

        assert_eq!(outcomes.len(), 3);
        // Two pauses, none after the last attempt
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_apply_stops_when_cancelled_during_delay() {
        let linkedin = Arc::new(MockDriver::new(Platform::Linkedin));
        let registry = DriverRegistry::new().with_driver(linkedin.clone());

        let results = ranked(&[
            "https://www.linkedin.com/jobs/view/1",
            "https://www.linkedin.com/jobs/view/2",
        ]);
        let cancel = CancellationToken::new();
        let config = SequencerConfig {
            max_applications: None,
            delay: Duration::from_secs(3600),
        };
        let sequencer = ApplicationSequencer::new(config, registry, cancel.clone());

        let outcomes = sequencer
            .apply_with(&results, |_| cancel.cancel())
            .await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(linkedin.recorded_submissions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_nothing_ranked() {
        let sequencer = ApplicationSequencer::new(
            no_delay(Some(5)),
            DriverRegistry::new(),
            CancellationToken::new(),
        );
        assert!(sequencer.apply(&[]).await.is_empty());
    }
}
