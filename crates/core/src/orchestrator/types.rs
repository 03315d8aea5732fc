//! Types for the run orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::driver::Platform;
use crate::report::ReportError;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A run is already in progress.
    #[error("a run is already in progress: {0}")]
    AlreadyRunning(String),

    /// No run is in progress.
    #[error("no run in progress")]
    NotRunning,

    /// Report persistence error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// The background run ended with an error.
    #[error("run failed: {0}")]
    Failed(String),
}

/// Phase of a run, in execution order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Idle,
    Authenticating,
    Searching,
    Matching,
    Applying,
    Reporting,
    Completed,
    Cancelled,
    Failed,
}

impl RunPhase {
    /// Progress percentage reached when the phase starts. Cancelled and
    /// Failed have none; they keep the percentage of the interrupted phase.
    pub fn progress_pct(&self) -> Option<u8> {
        match self {
            RunPhase::Idle => Some(0),
            RunPhase::Authenticating => Some(15),
            RunPhase::Searching => Some(30),
            RunPhase::Matching => Some(50),
            RunPhase::Applying => Some(70),
            RunPhase::Reporting => Some(90),
            RunPhase::Completed => Some(100),
            RunPhase::Cancelled | RunPhase::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunPhase::Completed | RunPhase::Cancelled | RunPhase::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::Authenticating => "authenticating",
            RunPhase::Searching => "searching",
            RunPhase::Matching => "matching",
            RunPhase::Applying => "applying",
            RunPhase::Reporting => "reporting",
            RunPhase::Completed => "completed",
            RunPhase::Cancelled => "cancelled",
            RunPhase::Failed => "failed",
        }
    }
}

/// Snapshot of a run's progress, published on a watch channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunProgress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub phase: RunPhase,
    pub progress_pct: u8,
    /// Human-readable description of the current step.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Platforms whose driver authenticated for this run.
    pub authenticated: Vec<Platform>,
    pub listings_found: usize,
    pub matched: usize,
    pub applied: usize,
    pub failed: usize,
    pub skipped: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunProgress {
    /// Fresh progress for a run that is about to start.
    pub fn started(run_id: &str) -> Self {
        Self {
            run_id: Some(run_id.to_string()),
            message: "Starting run".to_string(),
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Move to `phase`, updating the percentage when the phase defines one.
    pub fn enter(&mut self, phase: RunPhase, message: impl Into<String>) {
        self.phase = phase;
        if let Some(pct) = phase.progress_pct() {
            self.progress_pct = pct;
        }
        self.message = message.into();
        if phase.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_id.is_some() && !self.phase.is_terminal()
    }
}
