use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::lead::LeadStatus;

/// Upper bound of every score.
pub const MAX_SCORE: u32 = 100;
/// Close probability is `score * PROBABILITY_MULTIPLIER`, capped at `PROBABILITY_CAP`.
pub const PROBABILITY_MULTIPLIER: f64 = 1.2;
pub const PROBABILITY_CAP: f64 = 95.0;
pub const URGENT_KEYWORD: &str = "urgent";
pub const URGENT_BONUS: u32 = 10;
pub const MID_TIMEFRAME_LABEL: &str = "3 months";
pub const MID_TIMEFRAME_BONUS: u32 = 15;
pub const IMMEDIATE_TIMEFRAME_BONUS: u32 = 30;

// US market
pub const US_CASH_BUYER_BONUS: u32 = 40;
pub const US_MORTGAGE_APPROVED_BONUS: u32 = 30;
pub const US_IMMEDIATE_TIMEFRAME_LABEL: &str = "Immediate";
pub const US_HIGH_BUDGET_RANGE: &str = ">=1000000";
pub const US_HIGH_BUDGET_BONUS: u32 = 20;
pub const US_MID_BUDGET_RANGE: &str = ">=500000";
pub const US_MID_BUDGET_BONUS: u32 = 10;
pub const US_HOT_THRESHOLD: u32 = 70;
pub const US_WARM_THRESHOLD: u32 = 35;
pub const US_COMMISSION_RATE: f64 = 0.025;
pub const US_HOT_ACTION: &str = "Call & Text Immediately. Book Appointment.";
pub const US_WARM_ACTION: &str = "Send matching listings. Enroll in SMS drip.";
pub const US_COLD_ACTION: &str = "Long-term nurture. Monthly email.";

// UAE market
pub const UAE_CASH_BUYER_BONUS: u32 = 25;
pub const UAE_MORTGAGE_APPROVED_BONUS: u32 = 20;
pub const UAE_IMMEDIATE_TIMEFRAME_LABEL: &str = "1 month";
pub const UAE_HIGH_BUDGET_RANGE: &str = ">1500000";
pub const UAE_HIGH_BUDGET_BONUS: u32 = 15;
pub const UAE_HOT_THRESHOLD: u32 = 70;
pub const UAE_WARM_THRESHOLD: u32 = 40;
pub const UAE_HOT_ACTION: &str = "Call within 10 minutes";
pub const UAE_WARM_ACTION: &str = "Send matching listings";
pub const UAE_COLD_ACTION: &str = "Add to long-term follow-up";

/// A deployment market with its own weight table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    #[default]
    Us,
    Uae,
}

impl Market {
    pub const ALL: [Market; 2] = [Market::Us, Market::Uae];

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Us => "us",
            Market::Uae => "uae",
        }
    }

    pub fn scoring(&self) -> ScoringConfig {
        match self {
            Market::Us => ScoringConfig::us(),
            Market::Uae => ScoringConfig::uae(),
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" | "usa" => Ok(Market::Us),
            "uae" | "ae" => Ok(Market::Uae),
            other => Err(format!("unknown market '{}' (expected: us, uae)", other)),
        }
    }
}

/// Weights, thresholds and texts for one market.
///
/// Every field is required so a config is complete on its own. To tweak a
/// preset from a config file use [`ScoringOverrides`].
///
/// Example YAML:
/// ```yaml
/// cash_buyer_bonus: 40
/// mortgage_approved_bonus: 30
/// timeframes:
///   - { name: immediate, labels: ["Immediate"], bonus: 30 }
///   - { name: mid, labels: ["3 months"], bonus: 15 }
/// budget:
///   - { range: ">=1000000", bonus: 20 }
///   - { range: ">=500000", bonus: 10 }
/// keywords:
///   - { keyword: urgent, bonus: 10 }
/// max_score: 100
/// hot_threshold: 70
/// warm_threshold: 35
/// probability_multiplier: 1.2
/// probability_cap: 95
/// commission_rate: 0.025
/// actions:
///   hot: "Call & Text Immediately. Book Appointment."
///   warm: "Send matching listings. Enroll in SMS drip."
///   cold: "Long-term nurture. Monthly email."
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    pub cash_buyer_bonus: u32,
    pub mortgage_approved_bonus: u32,

    /// Checked in order; the first tier listing the lead's timeframe wins.
    #[serde(default)]
    pub timeframes: Vec<TimeframeTier>,

    /// Lower-bound budget thresholds; the largest matching bonus applies.
    #[serde(default)]
    pub budget: Vec<BudgetBucket>,

    /// Each keyword found in the message adds its bonus once.
    #[serde(default)]
    pub keywords: Vec<KeywordBonus>,

    pub max_score: u32,
    pub hot_threshold: u32,
    pub warm_threshold: u32,
    pub probability_multiplier: f64,
    pub probability_cap: f64,

    /// Commission is only estimated when a rate is set.
    #[serde(default)]
    pub commission_rate: Option<f64>,

    pub actions: ActionTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::us()
    }
}

impl ScoringConfig {
    pub fn us() -> Self {
        Self {
            cash_buyer_bonus: US_CASH_BUYER_BONUS,
            mortgage_approved_bonus: US_MORTGAGE_APPROVED_BONUS,
            timeframes: vec![
                TimeframeTier::new(
                    "immediate",
                    US_IMMEDIATE_TIMEFRAME_LABEL,
                    IMMEDIATE_TIMEFRAME_BONUS,
                ),
                TimeframeTier::new("mid", MID_TIMEFRAME_LABEL, MID_TIMEFRAME_BONUS),
            ],
            budget: vec![
                BudgetBucket::new(US_HIGH_BUDGET_RANGE, US_HIGH_BUDGET_BONUS),
                BudgetBucket::new(US_MID_BUDGET_RANGE, US_MID_BUDGET_BONUS),
            ],
            keywords: vec![KeywordBonus::new(URGENT_KEYWORD, URGENT_BONUS)],
            max_score: MAX_SCORE,
            hot_threshold: US_HOT_THRESHOLD,
            warm_threshold: US_WARM_THRESHOLD,
            probability_multiplier: PROBABILITY_MULTIPLIER,
            probability_cap: PROBABILITY_CAP,
            commission_rate: Some(US_COMMISSION_RATE),
            actions: ActionTable {
                hot: US_HOT_ACTION.to_string(),
                warm: US_WARM_ACTION.to_string(),
                cold: US_COLD_ACTION.to_string(),
            },
        }
    }

    pub fn uae() -> Self {
        Self {
            cash_buyer_bonus: UAE_CASH_BUYER_BONUS,
            mortgage_approved_bonus: UAE_MORTGAGE_APPROVED_BONUS,
            timeframes: vec![
                TimeframeTier::new(
                    "immediate",
                    UAE_IMMEDIATE_TIMEFRAME_LABEL,
                    IMMEDIATE_TIMEFRAME_BONUS,
                ),
                TimeframeTier::new("mid", MID_TIMEFRAME_LABEL, MID_TIMEFRAME_BONUS),
            ],
            budget: vec![BudgetBucket::new(UAE_HIGH_BUDGET_RANGE, UAE_HIGH_BUDGET_BONUS)],
            keywords: vec![KeywordBonus::new(URGENT_KEYWORD, URGENT_BONUS)],
            max_score: MAX_SCORE,
            hot_threshold: UAE_HOT_THRESHOLD,
            warm_threshold: UAE_WARM_THRESHOLD,
            probability_multiplier: PROBABILITY_MULTIPLIER,
            probability_cap: PROBABILITY_CAP,
            commission_rate: None,
            actions: ActionTable {
                hot: UAE_HOT_ACTION.to_string(),
                warm: UAE_WARM_ACTION.to_string(),
                cold: UAE_COLD_ACTION.to_string(),
            },
        }
    }

    /// Apply config-file overrides on top of this config.
    pub fn with_overrides(mut self, overrides: &ScoringOverrides) -> Self {
        if let Some(v) = overrides.cash_buyer_bonus {
            self.cash_buyer_bonus = v;
        }
        if let Some(v) = overrides.mortgage_approved_bonus {
            self.mortgage_approved_bonus = v;
        }
        if let Some(ref v) = overrides.timeframes {
            self.timeframes = v.clone();
        }
        if let Some(ref v) = overrides.budget {
            self.budget = v.clone();
        }
        if let Some(ref v) = overrides.keywords {
            self.keywords = v.clone();
        }
        if let Some(v) = overrides.max_score {
            self.max_score = v;
        }
        if let Some(v) = overrides.hot_threshold {
            self.hot_threshold = v;
        }
        if let Some(v) = overrides.warm_threshold {
            self.warm_threshold = v;
        }
        if let Some(v) = overrides.probability_multiplier {
            self.probability_multiplier = v;
        }
        if let Some(v) = overrides.probability_cap {
            self.probability_cap = v;
        }
        if let Some(v) = overrides.commission_rate {
            self.commission_rate = Some(v);
        }
        if let Some(ref v) = overrides.actions {
            self.actions = v.clone();
        }
        self
    }
}

/// Timeframe labels sharing one urgency bonus.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TimeframeTier {
    pub name: String,
    /// Form values in this tier, compared case-insensitively
    pub labels: Vec<String>,
    pub bonus: u32,
}

impl TimeframeTier {
    pub fn new(name: &str, label: &str, bonus: u32) -> Self {
        Self {
            name: name.to_string(),
            labels: vec![label.to_string()],
            bonus,
        }
    }
}

/// Budget threshold bucket.
///
/// Range format: ">N" or ">=N". Digits may be grouped with `_` or `,`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BudgetBucket {
    pub range: String,
    pub bonus: u32,
}

impl BudgetBucket {
    pub fn new(range: &str, bonus: u32) -> Self {
        Self {
            range: range.to_string(),
            bonus,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KeywordBonus {
    pub keyword: String,
    pub bonus: u32,
}

impl KeywordBonus {
    pub fn new(keyword: &str, bonus: u32) -> Self {
        Self {
            keyword: keyword.to_string(),
            bonus,
        }
    }
}

/// Recommended next step per status.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ActionTable {
    pub hot: String,
    pub warm: String,
    pub cold: String,
}

impl ActionTable {
    pub fn for_status(&self, status: LeadStatus) -> &str {
        match status {
            LeadStatus::Hot => &self.hot,
            LeadStatus::Warm => &self.warm,
            LeadStatus::Cold => &self.cold,
        }
    }
}

/// Partial scoring config read from the config file and laid over a market preset.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_buyer_bonus: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_approved_bonus: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframes: Option<Vec<TimeframeTier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Vec<BudgetBucket>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<KeywordBonus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warm_threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<ActionTable>,
}

impl ScoringOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_us() {
        assert_eq!(ScoringConfig::default(), ScoringConfig::us());
        assert_eq!(Market::default(), Market::Us);
    }

    #[test]
    fn test_us_preset_weights() {
        let config = ScoringConfig::us();
        assert_eq!(config.cash_buyer_bonus, 40);
        assert_eq!(config.mortgage_approved_bonus, 30);
        assert_eq!(config.hot_threshold, 70);
        assert_eq!(config.warm_threshold, 35);
        assert_eq!(config.commission_rate, Some(0.025));
        assert_eq!(config.budget.len(), 2);
        assert_eq!(config.timeframes[0].labels, vec!["Immediate".to_string()]);
    }

    #[test]
    fn test_uae_preset_weights() {
        let config = ScoringConfig::uae();
        assert_eq!(config.cash_buyer_bonus, 25);
        assert_eq!(config.mortgage_approved_bonus, 20);
        assert_eq!(config.warm_threshold, 40);
        assert!(config.commission_rate.is_none());
        assert_eq!(config.budget, vec![BudgetBucket::new(">1500000", 15)]);
        assert_eq!(config.timeframes[0].labels, vec!["1 month".to_string()]);
    }

    #[test]
    fn test_market_from_str() {
        assert_eq!("us".parse::<Market>(), Ok(Market::Us));
        assert_eq!(" UAE ".parse::<Market>(), Ok(Market::Uae));
        assert!("uk".parse::<Market>().is_err());
    }

    #[test]
    fn test_market_scoring_matches_preset() {
        assert_eq!(Market::Us.scoring(), ScoringConfig::us());
        assert_eq!(Market::Uae.scoring(), ScoringConfig::uae());
    }

    #[test]
    fn test_action_table_lookup() {
        let actions = ScoringConfig::uae().actions;
        assert_eq!(actions.for_status(LeadStatus::Hot), "Call within 10 minutes");
        assert_eq!(actions.for_status(LeadStatus::Warm), "Send matching listings");
        assert_eq!(actions.for_status(LeadStatus::Cold), "Add to long-term follow-up");
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::uae();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_overrides_parse() {
        let yaml = r#"
hot_threshold: 75
budget:
  - range: ">=2000000"
    bonus: 25
"#;
        let overrides: ScoringOverrides = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(overrides.hot_threshold, Some(75));
        assert!(overrides.cash_buyer_bonus.is_none());
        assert!(overrides.timeframes.is_none());
        assert_eq!(overrides.budget.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_overrides_reject_unknown_fields() {
        let yaml = "hot_treshold: 75\n";
        assert!(serde_saphyr::from_str::<ScoringOverrides>(yaml).is_err());
    }

    #[test]
    fn test_with_overrides_only_touches_set_fields() {
        let overrides = ScoringOverrides {
            hot_threshold: Some(80),
            commission_rate: Some(0.03),
            ..Default::default()
        };
        let config = ScoringConfig::uae().with_overrides(&overrides);
        assert_eq!(config.hot_threshold, 80);
        assert_eq!(config.commission_rate, Some(0.03));
        assert_eq!(config.warm_threshold, 40);
        assert_eq!(config.cash_buyer_bonus, 25);
    }

    #[test]
    fn test_empty_overrides() {
        assert!(ScoringOverrides::default().is_empty());
        let config = ScoringConfig::us().with_overrides(&ScoringOverrides::default());
        assert_eq!(config, ScoringConfig::us());
    }
}
