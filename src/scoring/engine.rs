use serde::Serialize;

use super::config::{BudgetBucket, ScoringConfig};
use super::factors::RangeOp;
use crate::lead::{LeadAttributes, LeadStatus, MortgageStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Cash buyer", "Budget", "Keyword"
    pub description: String, // e.g. "2000000 matched '>=1000000'"
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Sum of all contributions before the cap
    pub raw_score: u32,
    pub factors: Vec<FactorContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    pub score: u32,
    pub status: LeadStatus,
    pub probability: f64,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission: Option<f64>,
    pub breakdown: ScoreBreakdown,
}

/// Score a lead against a market configuration.
///
/// Pure and total: unknown timeframes or mortgage states add nothing, and a
/// negative or non-finite budget is treated as zero.
pub fn score_lead(attrs: &LeadAttributes, config: &ScoringConfig) -> ScoringResult {
    let mut raw_score: u32 = 0;
    let mut factors = Vec::new();
    let mut add = |label: &str, description: String, points: u32| {
        raw_score = raw_score.saturating_add(points);
        factors.push(FactorContribution {
            label: label.to_string(),
            description,
            points,
        });
    };

    if attrs.cash_buyer {
        add("Cash buyer", "pays without financing".to_string(), config.cash_buyer_bonus);
    }

    if attrs.mortgage_status == MortgageStatus::Approved {
        add("Mortgage", "pre-approved".to_string(), config.mortgage_approved_bonus);
    }

    // First tier listing the timeframe wins
    if let Some(tier) = config.timeframes.iter().find(|t| t.matches(&attrs.timeframe)) {
        add(
            "Timeframe",
            format!("'{}' is {}", attrs.timeframe.trim(), tier.name),
            tier.bonus,
        );
    }

    let budget = effective_budget(attrs.budget);
    if let Some(bucket) = best_budget_bucket(budget, &config.budget) {
        add(
            "Budget",
            format!("{} matched '{}'", budget, bucket.range),
            bucket.bonus,
        );
    }

    for keyword in &config.keywords {
        if keyword.matches(&attrs.message) {
            add(
                "Keyword",
                format!("message mentions '{}'", keyword.keyword.trim()),
                keyword.bonus,
            );
        }
    }

    let score = raw_score.min(config.max_score);
    let status = classify(score, config);
    let probability = close_probability(score, config);

    ScoringResult {
        score,
        status,
        probability,
        action: config.actions.for_status(status).to_string(),
        commission: config.commission_rate.map(|rate| budget * rate),
        breakdown: ScoreBreakdown { raw_score, factors },
    }
}

/// Map a score to its tier using the config's two thresholds.
pub fn classify(score: u32, config: &ScoringConfig) -> LeadStatus {
    if score >= config.hot_threshold {
        LeadStatus::Hot
    } else if score >= config.warm_threshold {
        LeadStatus::Warm
    } else {
        LeadStatus::Cold
    }
}

fn close_probability(score: u32, config: &ScoringConfig) -> f64 {
    (score as f64 * config.probability_multiplier)
        .min(config.probability_cap)
        .max(0.0)
}

fn effective_budget(budget: f64) -> f64 {
    if budget.is_finite() && budget > 0.0 {
        budget
    } else {
        0.0
    }
}

/// The bucket with the largest bonus among those the budget satisfies.
/// Earlier buckets win ties. Ranges that fail to parse are skipped.
fn best_budget_bucket(budget: f64, buckets: &[BudgetBucket]) -> Option<&BudgetBucket> {
    let mut best: Option<&BudgetBucket> = None;
    for bucket in buckets {
        if let Ok(range) = RangeOp::parse(&bucket.range) {
            if range.matches(budget) && best.map_or(true, |b| bucket.bonus > b.bonus) {
                best = Some(bucket);
            }
        }
    }
    best
}
