use serde::{Deserialize, Serialize};
use std::fmt;

/// Mortgage pre-approval state reported on the inquiry form.
///
/// Anything the form sends that is not one of the known states becomes
/// `Unknown`, which scores the same as "not approved".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MortgageStatus {
    Approved,
    NotApproved,
    Checking,
    #[default]
    #[serde(other)]
    Unknown,
}

impl MortgageStatus {
    /// Lenient parse of a form value ("approved", "Not Approved", "not-approved", ...)
    pub fn from_label(s: &str) -> Self {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "approved" => MortgageStatus::Approved,
            "not_approved" => MortgageStatus::NotApproved,
            "checking" => MortgageStatus::Checking,
            _ => MortgageStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MortgageStatus::Approved => "approved",
            MortgageStatus::NotApproved => "not_approved",
            MortgageStatus::Checking => "checking",
            MortgageStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MortgageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage bucket derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeadStatus {
    Hot,
    Warm,
    Cold,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Hot => "HOT",
            LeadStatus::Warm => "WARM",
            LeadStatus::Cold => "COLD",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input to the scoring engine.
///
/// Build it with [`crate::lead::RawLead::attributes`] when the values come
/// from a form or an uploaded file; that is where coercion happens.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct LeadAttributes {
    pub cash_buyer: bool,
    pub mortgage_status: MortgageStatus,
    pub timeframe: String,
    pub budget: f64,
    pub message: String,
}
