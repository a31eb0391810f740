use anyhow::{bail, Result};

use super::config::{KeywordBonus, TimeframeTier};

/// A comparison against an amount, parsed from strings like ">=1_000_000".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeOp {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Equal(f64),
    Between(f64, f64), // Inclusive range: N-M
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(parse_amount(val)?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(parse_amount(val)?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(parse_amount(val)?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(parse_amount(val)?))
        } else if let Some((low, high)) = s.split_once('-').filter(|_| !s.starts_with('-')) {
            let low = parse_amount(low)?;
            let high = parse_amount(high)?;
            if low > high {
                bail!("Invalid range {}: lower bound exceeds upper bound", s);
            }
            Ok(RangeOp::Between(low, high))
        } else {
            Ok(RangeOp::Equal(parse_amount(s)?))
        }
    }

    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }

    /// True for ">N" and ">=N": once a value matches, every larger value does too.
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, RangeOp::GreaterThan(_) | RangeOp::GreaterEqual(_))
    }
}

/// Parse an amount, allowing `_` and `,` as digit separators.
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s.trim().chars().filter(|c| !matches!(c, '_' | ',')).collect();
    if cleaned.is_empty() {
        bail!("Missing amount");
    }
    let value: f64 = cleaned.parse()?;
    if !value.is_finite() {
        bail!("Amount must be finite: {}", s.trim());
    }
    Ok(value)
}

impl TimeframeTier {
    pub fn matches(&self, timeframe: &str) -> bool {
        let timeframe = timeframe.trim();
        !timeframe.is_empty()
            && self
                .labels
                .iter()
                .any(|label| label.trim().eq_ignore_ascii_case(timeframe))
    }
}

impl KeywordBonus {
    /// Case-insensitive substring match against the lead's message.
    pub fn matches(&self, message: &str) -> bool {
        let keyword = self.keyword.trim();
        !keyword.is_empty() && message.to_lowercase().contains(&keyword.to_lowercase())
    }
}
