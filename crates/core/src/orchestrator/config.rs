//! Run configuration.

use crate::aggregator::AggregatorConfig;
use crate::config::Config;
use crate::matcher::DEFAULT_MIN_SCORE;
use crate::sequencer::SequencerConfig;

/// Settings one run needs, extracted from the root configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub keywords: Vec<String>,
    pub locations: Vec<String>,
    /// Listings scoring below this are not ranked.
    pub min_score: f32,
    /// Submit applications; when false the run ranks and reports only.
    pub auto_apply: bool,
    pub aggregator: AggregatorConfig,
    pub sequencer: SequencerConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            locations: Vec::new(),
            min_score: DEFAULT_MIN_SCORE,
            auto_apply: true,
            aggregator: AggregatorConfig::default(),
            sequencer: SequencerConfig::default(),
        }
    }
}

impl From<&Config> for RunConfig {
    fn from(config: &Config) -> Self {
        Self {
            keywords: config.search.keywords.clone(),
            locations: config.search.locations.clone(),
            min_score: config.search.min_match_score,
            auto_apply: config.apply.auto_apply,
            aggregator: AggregatorConfig::from(&config.search),
            sequencer: SequencerConfig::from(&config.apply),
        }
    }
}
