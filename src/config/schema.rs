use serde::{Deserialize, Serialize};

use crate::followup::FollowUpConfig;
use crate::scoring::{Market, ScoringConfig, ScoringOverrides};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Weight table to start from (default: us)
    #[serde(default)]
    pub market: Option<Market>,

    /// Adjustments laid over the market's weight table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringOverrides>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<FollowUpConfig>,
}

impl Config {
    /// The market in effect: the command-line choice wins over the file.
    pub fn market(&self, cli_market: Option<Market>) -> Market {
        cli_market.or(self.market).unwrap_or_default()
    }

    pub fn effective_scoring(&self, cli_market: Option<Market>) -> ScoringConfig {
        let base = self.market(cli_market).scoring();
        match &self.scoring {
            Some(overrides) => base.with_overrides(overrides),
            None => base,
        }
    }

    pub fn effective_follow_up(&self) -> FollowUpConfig {
        self.follow_up.clone().unwrap_or_default()
    }
}
