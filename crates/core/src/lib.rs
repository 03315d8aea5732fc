pub mod aggregator;
pub mod config;
pub mod driver;
pub mod matcher;
pub mod metrics;
pub mod orchestrator;
pub mod profile;
pub mod report;
pub mod sequencer;
pub mod testing;

pub use aggregator::{canonical_url, deduplicate_listings, AggregationResult, Aggregator};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use driver::{
    build_registry, DriverError, DriverRegistry, FeedDriver, Listing, Platform, PlatformDriver,
    SearchQuery, Submission,
};
pub use matcher::{rank, MatchResult, ScoringEngine};
pub use orchestrator::{
    OrchestratorError, RunConfig, RunController, RunOrchestrator, RunPhase, RunProgress,
};
pub use profile::{ContactInfo, Profile};
pub use report::{load_report, render_text, ReportError, ReportStore, RunReport};
pub use sequencer::{ApplicationOutcome, ApplicationSequencer, OutcomeStatus};
