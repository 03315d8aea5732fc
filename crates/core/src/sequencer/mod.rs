//! Sequential submission of ranked listings through platform drivers.

mod apply;
mod types;

pub use apply::{ApplicationSequencer, SequencerConfig};
pub use types::{ApplicationOutcome, OutcomeStatus};
