//! Background run control: at most one run at a time.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::report::RunReport;

use super::runner::RunOrchestrator;
use super::types::{OrchestratorError, RunProgress};

/// Result of a finished background run, shared with every waiter.
type RunOutcome = Result<RunReport, String>;

#[derive(Default)]
struct ControllerState {
    /// Set from `start` until the run's result is stored.
    run_id: Option<String>,
    cancel: Option<CancellationToken>,
    /// Completion of the most recent run.
    done: Option<watch::Receiver<Option<RunOutcome>>>,
    last_report: Option<RunReport>,
}

/// Starts runs in the background and exposes their status.
pub struct RunController {
    orchestrator: Arc<RunOrchestrator>,
    state: Arc<Mutex<ControllerState>>,
}

impl RunController {
    pub fn new(orchestrator: RunOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            state: Arc::new(Mutex::new(ControllerState::default())),
        }
    }

    pub fn orchestrator(&self) -> &RunOrchestrator {
        &self.orchestrator
    }

    /// Start a run in the background and return its id.
    ///
    /// The run's progress is published before this returns, so `status`
    /// and `cancel` see the new run immediately.
    pub async fn start(&self) -> Result<String, OrchestratorError> {
        let mut state = self.state.lock().await;
        if let Some(run_id) = &state.run_id {
            return Err(OrchestratorError::AlreadyRunning(run_id.clone()));
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        let cancel = CancellationToken::new();
        let (done_tx, done_rx) = watch::channel(None);

        self.orchestrator.publish_started(&run_id);
        state.run_id = Some(run_id.clone());
        state.cancel = Some(cancel.clone());
        state.done = Some(done_rx);

        let orchestrator = Arc::clone(&self.orchestrator);
        let shared = Arc::clone(&self.state);
        let task_id = run_id.clone();
        tokio::spawn(async move {
            let run = tokio::spawn({
                let orchestrator = Arc::clone(&orchestrator);
                let task_id = task_id.clone();
                async move { orchestrator.run_with_id(&task_id, cancel).await }
            });

            let outcome = match run.await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => {
                    // The run panicked before publishing a terminal phase
                    error!("Run {} task ended abnormally: {}", task_id, e);
                    let message = format!("run task failed: {}", e);
                    orchestrator.publish_failure(message.clone());
                    Err(message)
                }
            };

            let mut state = shared.lock().await;
            if let Ok(report) = &outcome {
                state.last_report = Some(report.clone());
            }
            state.run_id = None;
            state.cancel = None;
            done_tx.send_replace(Some(outcome));
        });

        info!("Run {} started in background", run_id);
        Ok(run_id)
    }

    /// Current progress snapshot.
    pub fn status(&self) -> RunProgress {
        self.orchestrator.progress()
    }

    /// Request cancellation of the active run.
    pub async fn cancel(&self) -> Result<String, OrchestratorError> {
        let state = self.state.lock().await;
        match (&state.run_id, &state.cancel) {
            (Some(run_id), Some(cancel)) => {
                cancel.cancel();
                info!("Cancellation requested for run {}", run_id);
                Ok(run_id.clone())
            }
            _ => Err(OrchestratorError::NotRunning),
        }
    }

    /// Report of the most recently finished run.
    pub async fn last_report(&self) -> Option<RunReport> {
        self.state.lock().await.last_report.clone()
    }

    /// Wait for the most recent run to finish and return its result.
    ///
    /// Waiting does not release the single-run guard; any number of
    /// callers may wait on the same run.
    pub async fn wait(&self) -> Result<RunReport, OrchestratorError> {
        let done = self.state.lock().await.done.clone();
        let Some(mut done) = done else {
            return Err(OrchestratorError::NotRunning);
        };

        let outcome = done
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|outcome| (*outcome).clone());
        match outcome {
            Some(Ok(report)) => Ok(report),
            Some(Err(message)) => Err(OrchestratorError::Failed(message)),
            None => Err(OrchestratorError::Failed(
                "run task ended without a result".to_string(),
            )),
        }
    }
}
