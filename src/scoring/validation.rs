use std::collections::HashSet;

use super::config::{ScoringConfig, MAX_SCORE, PROBABILITY_CAP};
use super::factors::RangeOp;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.max_score > MAX_SCORE {
        errors.push(format!("scoring.max_score: must be at most {}", MAX_SCORE));
    }
    if config.hot_threshold > config.max_score {
        errors.push(format!(
            "scoring.hot_threshold: {} is above max_score {}, no lead could be HOT",
            config.hot_threshold, config.max_score
        ));
    }
    if config.warm_threshold > config.hot_threshold {
        errors.push(format!(
            "scoring.warm_threshold: {} must not exceed hot_threshold {}",
            config.warm_threshold, config.hot_threshold
        ));
    }

    // Timeframe tiers
    let mut seen_labels = HashSet::new();
    for (i, tier) in config.timeframes.iter().enumerate() {
        if tier.labels.is_empty() {
            errors.push(format!("scoring.timeframes[{}].labels: must not be empty", i));
        }
        for label in &tier.labels {
            let key = label.trim().to_lowercase();
            if key.is_empty() {
                errors.push(format!("scoring.timeframes[{}].labels: empty label", i));
            } else if !seen_labels.insert(key) {
                errors.push(format!(
                    "scoring.timeframes[{}].labels: '{}' already belongs to an earlier tier",
                    i,
                    label.trim()
                ));
            }
        }
    }

    // Budget buckets must be lower bounds so a bigger budget never scores less
    for (i, bucket) in config.budget.iter().enumerate() {
        match RangeOp::parse(&bucket.range) {
            Ok(range) if !range.is_lower_bound() => errors.push(format!(
                "scoring.budget[{}].range: '{}' must be a lower bound ('>N' or '>=N')",
                i, bucket.range
            )),
            Ok(_) => {}
            Err(e) => errors.push(format!(
                "scoring.budget[{}].range: invalid '{}' - {}",
                i, bucket.range, e
            )),
        }
    }

    for (i, keyword) in config.keywords.iter().enumerate() {
        if keyword.keyword.trim().is_empty() {
            errors.push(format!("scoring.keywords[{}].keyword: must not be empty", i));
        }
    }

    if !config.probability_multiplier.is_finite() || config.probability_multiplier < 0.0 {
        errors.push("scoring.probability_multiplier: must be a non-negative number".to_string());
    }
    if !config.probability_cap.is_finite()
        || config.probability_cap < 0.0
        || config.probability_cap > PROBABILITY_CAP
    {
        errors.push(format!(
            "scoring.probability_cap: must be between 0 and {}",
            PROBABILITY_CAP
        ));
    }

    if let Some(rate) = config.commission_rate {
        if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
            errors.push(format!(
                "scoring.commission_rate: {} must be at least 0 and below 1",
                rate
            ));
        }
    }

    for (name, action) in [
        ("hot", &config.actions.hot),
        ("warm", &config.actions.warm),
        ("cold", &config.actions.cold),
    ] {
        if action.trim().is_empty() {
            errors.push(format!("scoring.actions.{}: must not be empty", name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{BudgetBucket, KeywordBonus, TimeframeTier};

    #[test]
    fn test_presets_are_valid() {
        assert!(validate_scoring(&ScoringConfig::us()).is_ok());
        assert!(validate_scoring(&ScoringConfig::uae()).is_ok());
    }

    #[test]
    fn test_warm_above_hot() {
        let mut config = ScoringConfig::us();
        config.warm_threshold = 80;
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.warm_threshold"));
    }

    #[test]
    fn test_hot_above_max_score() {
        let mut config = ScoringConfig::us();
        config.hot_threshold = 120;
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.hot_threshold"));
    }

    #[test]
    fn test_max_score_above_hundred() {
        let mut config = ScoringConfig::us();
        config.max_score = 150;
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.max_score"));
    }

    #[test]
    fn test_invalid_budget_range() {
        let mut config = ScoringConfig::us();
        config.budget = vec![BudgetBucket::new("lots", 5)];
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.budget[0].range: invalid"));
    }

    #[test]
    fn test_budget_range_must_be_lower_bound() {
        let mut config = ScoringConfig::us();
        config.budget = vec![BudgetBucket::new(">=1000000", 20), BudgetBucket::new("<100000", 5)];
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.budget[1].range"));
        assert!(errors[0].contains("lower bound"));
    }

    #[test]
    fn test_duplicate_timeframe_label() {
        let mut config = ScoringConfig::us();
        config.timeframes.push(TimeframeTier::new("again", "immediate", 5));
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.timeframes[2].labels"));
    }

    #[test]
    fn test_empty_timeframe_labels() {
        let mut config = ScoringConfig::us();
        config.timeframes[1].labels.clear();
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.timeframes[1].labels: must not be empty"));
    }

    #[test]
    fn test_empty_keyword() {
        let mut config = ScoringConfig::us();
        config.keywords.push(KeywordBonus::new(" ", 5));
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.keywords[1].keyword"));
    }

    #[test]
    fn test_commission_rate_range() {
        let mut config = ScoringConfig::us();
        config.commission_rate = Some(1.5);
        assert!(validate_scoring(&config).is_err());
        config.commission_rate = Some(-0.01);
        assert!(validate_scoring(&config).is_err());
        config.commission_rate = Some(0.0);
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_probability_settings() {
        let mut config = ScoringConfig::us();
        config.probability_multiplier = -1.0;
        config.probability_cap = 99.0;
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_empty_action() {
        let mut config = ScoringConfig::uae();
        config.actions.warm = String::new();
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.actions.warm"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ScoringConfig::us();
        config.warm_threshold = 90; // Error 1
        config.budget = vec![BudgetBucket::new("bad", 1)]; // Error 2
        config.commission_rate = Some(2.0); // Error 3
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
