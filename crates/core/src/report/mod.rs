//! Run reports: the record, its text rendering and persistence.

mod render;
mod store;
mod types;

pub use render::{render_text, TOP_RESULTS, TOP_SKILLS};
pub use store::{load_report, ReportError, ReportStore};
pub use types::{RankedSummary, ReportMeta, RunReport};
