//! Run orchestrator implementation.
//!
//! Executes one run as strictly sequential phases:
//! - Authenticate: every driver, concurrently; failures drop the driver
//! - Search: fan-out aggregation over the authenticated drivers
//! - Match: score and rank
//! - Apply: sequential submissions through the sequencer
//! - Report: build, persist
//!
//! Drivers are shut down at the end of every run, whatever the outcome.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::aggregator::Aggregator;
use crate::config::{Config, ConfigError};
use crate::driver::{build_registry, DriverRegistry, Listing, Platform};
use crate::matcher::{rank, MatchResult, ScoringEngine};
use crate::metrics::{DRIVER_CALLS, LISTINGS_FOUND, RUNS_TOTAL, RUN_DURATION};
use crate::profile::Profile;
use crate::report::{ReportMeta, ReportStore, RunReport};
use crate::sequencer::{ApplicationOutcome, ApplicationSequencer, OutcomeStatus};

use super::config::RunConfig;
use super::types::{OrchestratorError, RunPhase, RunProgress};

/// Runs the discovery, ranking and application pipeline.
pub struct RunOrchestrator {
    profile: Arc<Profile>,
    drivers: DriverRegistry,
    config: RunConfig,
    store: Option<ReportStore>,
    progress: watch::Sender<RunProgress>,
}

impl RunOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        profile: Arc<Profile>,
        drivers: DriverRegistry,
        config: RunConfig,
        store: Option<ReportStore>,
    ) -> Self {
        let (progress, _) = watch::channel(RunProgress::default());
        Self {
            profile,
            drivers,
            config,
            store,
            progress,
        }
    }

    /// Wire an orchestrator from the root configuration, persisting
    /// reports to the configured output files.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let profile = Arc::new(Profile::from_config(&config.profile, &config.search));
        let drivers = build_registry(&config.drivers, Arc::clone(&profile))?;
        Ok(Self::new(
            profile,
            drivers,
            RunConfig::from(config),
            Some(ReportStore::from_config(&config.output)),
        ))
    }

    /// Subscribe to progress snapshots.
    pub fn subscribe(&self) -> watch::Receiver<RunProgress> {
        self.progress.subscribe()
    }

    /// Latest progress snapshot.
    pub fn progress(&self) -> RunProgress {
        self.progress.borrow().clone()
    }

    /// Reset progress to the start of `run_id`. Publishing again for the
    /// same, not yet advanced run keeps the first snapshot.
    pub(crate) fn publish_started(&self, run_id: &str) {
        self.progress.send_if_modified(|p| {
            if p.run_id.as_deref() == Some(run_id) && p.phase == RunPhase::Idle {
                return false;
            }
            *p = RunProgress::started(run_id);
            true
        });
    }

    /// Mark the current run as failed.
    pub(crate) fn publish_failure(&self, message: String) {
        self.progress.send_modify(|p| {
            p.error = Some(message);
            p.enter(RunPhase::Failed, "Run failed");
        });
    }

    pub fn drivers(&self) -> &DriverRegistry {
        &self.drivers
    }

    /// Digest of the profile and search settings, identical for two runs
    /// over the same inputs.
    pub fn fingerprint(&self) -> String {
        #[derive(Serialize)]
        struct Inputs<'a> {
            skills: &'a [String],
            experience_years: u32,
            keywords: &'a [String],
            locations: &'a [String],
            min_score: f32,
            max_listings_per_search: usize,
            platforms: Vec<Platform>,
        }

        let inputs = Inputs {
            skills: &self.profile.skills,
            experience_years: self.profile.experience_years,
            keywords: &self.profile.keywords,
            locations: &self.config.locations,
            min_score: self.config.min_score,
            max_listings_per_search: self.config.aggregator.max_listings_per_search,
            platforms: self.drivers.platforms(),
        };
        // Serializing plain data into a Vec cannot fail
        let bytes = serde_json::to_vec(&inputs).unwrap_or_default();
        format!("{:x}", Sha256::digest(&bytes))
    }

    /// Execute one run with a fresh run id.
    pub async fn run(&self, cancel: CancellationToken) -> Result<RunReport, OrchestratorError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        self.run_with_id(&run_id, cancel).await
    }

    /// Execute one run.
    ///
    /// Cancellation between phases skips the remaining phases; the report
    /// still reflects the work done so far and is persisted. Only report
    /// persistence failures are returned as errors.
    pub async fn run_with_id(
        &self,
        run_id: &str,
        cancel: CancellationToken,
    ) -> Result<RunReport, OrchestratorError> {
        let start = Instant::now();
        self.publish_started(run_id);
        info!("Starting run {}", run_id);

        let result = self.execute(run_id, &cancel).await;

        self.shutdown_drivers().await;

        let outcome = match &result {
            Ok(report) if report.cancelled => "cancelled",
            Ok(_) => "completed",
            Err(_) => "failed",
        };
        RUNS_TOTAL.with_label_values(&[outcome]).inc();
        RUN_DURATION
            .with_label_values(&[outcome])
            .observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(report) if report.cancelled => {
                warn!("Run {} cancelled", run_id);
                self.enter(RunPhase::Cancelled, "Run cancelled");
            }
            Ok(report) => {
                info!(
                    "Run {} completed: {} found, {} matched, {} applied, {} failed, {} skipped",
                    run_id,
                    report.total_found,
                    report.matched,
                    report.applied,
                    report.failed,
                    report.skipped
                );
                self.enter(RunPhase::Completed, "Run completed");
            }
            Err(e) => {
                error!("Run {} failed: {}", run_id, e);
                self.publish_failure(e.to_string());
            }
        }

        result
    }

    async fn execute(
        &self,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<RunReport, OrchestratorError> {
        let mut listings: Vec<Listing> = Vec::new();
        let mut ranked: Vec<MatchResult> = Vec::new();
        let mut outcomes: Vec<ApplicationOutcome> = Vec::new();

        'phases: {
            self.enter(RunPhase::Authenticating, "Authenticating drivers");
            let active = tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'phases,
                active = self.authenticate_all() => active,
            };
            if active.is_empty() {
                warn!("No driver authenticated, nothing to search");
                break 'phases;
            }

            self.enter(
                RunPhase::Searching,
                format!("Searching {} platforms", active.len()),
            );
            let aggregator = Aggregator::new(self.config.aggregator.clone());
            let search =
                aggregator.aggregate(&active, &self.config.keywords, &self.config.locations);
            let aggregation = tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'phases,
                result = search => result,
            };
            listings = aggregation.listings;
            LISTINGS_FOUND.observe(listings.len() as f64);
            self.progress
                .send_modify(|p| p.listings_found = listings.len());
            if listings.is_empty() {
                warn!("No listings found");
                break 'phases;
            }
            if cancel.is_cancelled() {
                break 'phases;
            }

            self.enter(
                RunPhase::Matching,
                format!("Scoring {} listings", listings.len()),
            );
            let engine = ScoringEngine::new(Arc::clone(&self.profile));
            ranked = rank(&listings, &engine, self.config.min_score);
            self.progress.send_modify(|p| p.matched = ranked.len());
            if ranked.is_empty() {
                warn!("No listings matched the profile");
                break 'phases;
            }
            if cancel.is_cancelled() {
                break 'phases;
            }

            if !self.config.auto_apply {
                info!("Auto-apply disabled, {} matches reported only", ranked.len());
                break 'phases;
            }

            self.enter(
                RunPhase::Applying,
                format!("Applying to up to {} listings", ranked.len()),
            );
            let sequencer =
                ApplicationSequencer::new(self.config.sequencer.clone(), active, cancel.clone());
            outcomes = sequencer
                .apply_with(&ranked, |outcome| {
                    self.progress.send_modify(|p| match outcome.status {
                        OutcomeStatus::Applied => p.applied += 1,
                        OutcomeStatus::Failed => p.failed += 1,
                        OutcomeStatus::SkippedNoDriver => p.skipped += 1,
                    });
                })
                .await;
        }

        self.enter(RunPhase::Reporting, "Building report");
        let report = RunReport::build(
            &listings,
            &ranked,
            &outcomes,
            ReportMeta {
                run_id: run_id.to_string(),
                min_score: self.config.min_score,
                fingerprint: self.fingerprint(),
                cancelled: cancel.is_cancelled(),
            },
        );

        if let Some(store) = &self.store {
            store.save(&report).await?;
        }

        Ok(report)
    }

    /// Authenticate every registered driver and return the ones that
    /// succeeded, in registration order.
    async fn authenticate_all(&self) -> DriverRegistry {
        let results = join_all(self.drivers.iter().map(|driver| async move {
            let platform = driver.platform();
            (platform, driver.authenticate().await)
        }))
        .await;

        let mut authenticated = Vec::new();
        for (platform, result) in results {
            match result {
                Ok(true) => {
                    DRIVER_CALLS
                        .with_label_values(&[platform.as_str(), "authenticate", "success"])
                        .inc();
                    info!("Authenticated on {}", platform);
                    authenticated.push(platform);
                }
                Ok(false) => {
                    DRIVER_CALLS
                        .with_label_values(&[platform.as_str(), "authenticate", "error"])
                        .inc();
                    warn!("Authentication on {} was refused", platform);
                }
                Err(e) => {
                    DRIVER_CALLS
                        .with_label_values(&[platform.as_str(), "authenticate", "error"])
                        .inc();
                    warn!("Authentication on {} failed: {}", platform, e);
                }
            }
        }

        let active = self.drivers.subset(&authenticated);
        self.progress
            .send_modify(|p| p.authenticated = active.platforms());
        active
    }

    async fn shutdown_drivers(&self) {
        join_all(self.drivers.iter().map(|driver| driver.shutdown())).await;
    }

    fn enter(&self, phase: RunPhase, message: impl Into<String>) {
        let message = message.into();
        self.progress.send_modify(|p| p.enter(phase, message));
    }
}
