//! Run orchestrator for the job search pipeline.
//!
//! One run walks the phases strictly in order:
//! - **Authenticate**: all drivers concurrently, failures are dropped
//! - **Search**: concurrent across platforms, sequential within one
//! - **Match**: CPU-only scoring and ranking
//! - **Apply**: sequential, rate-limited submissions
//! - **Report**: persisted even when the run is cancelled

mod config;
mod controller;
mod runner;
mod types;

pub use config::RunConfig;
pub use controller::RunController;
pub use runner::RunOrchestrator;
pub use types::{OrchestratorError, RunPhase, RunProgress};
