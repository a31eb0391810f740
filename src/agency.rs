//! Agency prospecting.
//!
//! Rates a brokerage from the numbers a directory listing exposes (listing
//! count, Google rating, name), places it in a sales tier and drafts a first
//! outreach email. Everything here is deterministic: no page fetching and no
//! text generation.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::lead::{coerce_budget, RawNumber};

pub const LARGE_BROKERAGE_LISTINGS: u32 = 50;
pub const SMALL_TEAM_LISTINGS: u32 = 15;
/// Name markers of a luxury brokerage (case-sensitive, as brokerages write them)
pub const LUXURY_NAME_MARKERS: [&str; 2] = ["Luxury", "Premium"];

pub const LARGE_BROKERAGE_BASE_SCORE: i32 = 8;
pub const LUXURY_BROKERAGE_BASE_SCORE: i32 = 9;
pub const SMALL_TEAM_BASE_SCORE: i32 = 6;
pub const SOLO_AGENT_BASE_SCORE: i32 = 4;

pub const HIGH_RATING: f64 = 4.5;
pub const LOW_RATING: f64 = 3.5;
pub const RATING_ADJUSTMENT: i32 = 1;

pub const MIN_AGENCY_SCORE: i32 = 1;
pub const MAX_AGENCY_SCORE: i32 = 10;
/// Scores above this get the automation pitch; the rest are nurtured
pub const GROWTH_SCORE_THRESHOLD: u32 = 5;

pub const UNKNOWN_AGENCY_NAME: &str = "Unknown Agency";
pub const DEFAULT_CITY: &str = "your area";
pub const DEFAULT_NICHE: &str = "Real Estate";
pub const DEFAULT_GREETING_NAME: &str = "Team";

pub const OUTREACH_SIGNATURE: &str = "[Your Name]\nSpeedToLead AI Team";
pub const OUTREACH_POSTAL_ADDRESS: &str = "123 AI Way, San Francisco, CA";

/// One agency row from a directory export, before coercion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawAgency {
    pub agency_name: Option<String>,
    pub num_listings: Option<RawNumber>,
    pub google_rating: Option<RawNumber>,
    pub city: Option<String>,
    pub owner_name: Option<String>,
    pub niche: Option<String>,
    pub website: Option<String>,
}

impl RawAgency {
    pub fn name(&self) -> &str {
        match self.agency_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_AGENCY_NAME,
        }
    }

    /// Whole listings; unreadable or negative counts are 0
    pub fn listings(&self) -> u32 {
        self.num_listings
            .as_ref()
            .map(coerce_budget)
            .map_or(0, |n| n.trunc().min(u32::MAX as f64) as u32)
    }

    /// Google rating, 0 when missing or unreadable
    pub fn rating(&self) -> f64 {
        self.google_rating.as_ref().map_or(0.0, coerce_budget)
    }

    fn text_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgencyClass {
    #[serde(rename = "Large Brokerage")]
    LargeBrokerage,
    #[serde(rename = "Luxury Brokerage")]
    LuxuryBrokerage,
    #[serde(rename = "Small Team")]
    SmallTeam,
    #[serde(rename = "Solo Agent")]
    SoloAgent,
}

impl AgencyClass {
    /// Listing volume wins over a luxury name; a luxury name wins over team size.
    pub fn classify(name: &str, listings: u32) -> Self {
        if listings >= LARGE_BROKERAGE_LISTINGS {
            AgencyClass::LargeBrokerage
        } else if LUXURY_NAME_MARKERS.iter().any(|m| name.contains(m)) {
            AgencyClass::LuxuryBrokerage
        } else if listings >= SMALL_TEAM_LISTINGS {
            AgencyClass::SmallTeam
        } else {
            AgencyClass::SoloAgent
        }
    }

    pub fn base_score(&self) -> i32 {
        match self {
            AgencyClass::LargeBrokerage => LARGE_BROKERAGE_BASE_SCORE,
            AgencyClass::LuxuryBrokerage => LUXURY_BROKERAGE_BASE_SCORE,
            AgencyClass::SmallTeam => SMALL_TEAM_BASE_SCORE,
            AgencyClass::SoloAgent => SOLO_AGENT_BASE_SCORE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgencyClass::LargeBrokerage => "Large Brokerage",
            AgencyClass::LuxuryBrokerage => "Luxury Brokerage",
            AgencyClass::SmallTeam => "Small Team",
            AgencyClass::SoloAgent => "Solo Agent",
        }
    }
}

impl fmt::Display for AgencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyScore {
    pub agency_name: String,
    pub classification: AgencyClass,
    pub listings: u32,
    pub rating: f64,
    /// 1-10
    pub score: u32,
    pub strength_summary: String,
    pub growth_opportunity: String,
}

/// Rate an agency 1-10 from its class, nudged by its Google rating.
pub fn score_agency(agency: &RawAgency) -> AgencyScore {
    let name = agency.name();
    let listings = agency.listings();
    let rating = agency.rating();
    let classification = AgencyClass::classify(name, listings);

    let mut score = classification.base_score();
    if rating >= HIGH_RATING {
        score += RATING_ADJUSTMENT;
    } else if rating > 0.0 && rating < LOW_RATING {
        score -= RATING_ADJUSTMENT;
    }
    let score = score.clamp(MIN_AGENCY_SCORE, MAX_AGENCY_SCORE) as u32;

    let growth_opportunity = if score > GROWTH_SCORE_THRESHOLD {
        "High potential for AI speed-to-lead automation."
    } else {
        "Nurture for future growth."
    };

    AgencyScore {
        agency_name: name.to_string(),
        classification,
        listings,
        rating,
        score,
        strength_summary: format!(
            "{} with {} listings and {:.1} rating.",
            classification, listings, rating
        ),
        growth_opportunity: growth_opportunity.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgencyTier {
    #[serde(rename = "Tier 1 - Enterprise")]
    Enterprise,
    #[serde(rename = "Tier 2 - Growth Agency")]
    Growth,
    #[serde(rename = "Tier 3 - Solo Agent")]
    Solo,
}

impl AgencyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgencyTier::Enterprise => "Tier 1 - Enterprise",
            AgencyTier::Growth => "Tier 2 - Growth Agency",
            AgencyTier::Solo => "Tier 3 - Solo Agent",
        }
    }
}

impl fmt::Display for AgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetCapability {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Qualification {
    pub tier: AgencyTier,
    pub explanation: &'static str,
    pub budget_capability: BudgetCapability,
    /// Solo agents are only a maybe for the premium product
    pub ideal_for_premium_ai: bool,
}

/// Sales tier by listing volume.
pub fn qualify_agency(listings: u32) -> Qualification {
    if listings >= LARGE_BROKERAGE_LISTINGS {
        Qualification {
            tier: AgencyTier::Enterprise,
            explanation: "Large inventory and team size indicate high volume and need for \
                          enterprise infrastructure.",
            budget_capability: BudgetCapability::High,
            ideal_for_premium_ai: true,
        }
    } else if listings >= SMALL_TEAM_LISTINGS {
        Qualification {
            tier: AgencyTier::Growth,
            explanation: "Growing agency that needs automation to scale without increasing \
                          headcount.",
            budget_capability: BudgetCapability::Medium,
            ideal_for_premium_ai: true,
        }
    } else {
        Qualification {
            tier: AgencyTier::Solo,
            explanation: "Individual agent focusing on personal brand, ideal for simple \
                          automated assistance.",
            budget_capability: BudgetCapability::Low,
            ideal_for_premium_ai: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutreachEmail {
    pub subject: String,
    pub body: String,
}

/// First-contact email from the fixed template, with the postal address and
/// unsubscribe line commercial email needs.
pub fn agency_outreach_email(agency: &RawAgency) -> OutreachEmail {
    let name = agency.name();
    let city = RawAgency::text_or(&agency.city, DEFAULT_CITY);
    let niche = RawAgency::text_or(&agency.niche, DEFAULT_NICHE);
    let greeting = RawAgency::text_or(&agency.owner_name, DEFAULT_GREETING_NAME);

    let subject = format!("Optimizing Speed-to-Lead for {} in {}", name, city);
    let body = format!(
        "Hi {greeting},\n\n\
         I've been following {name}'s work in {city} and was impressed by your {niche} focus.\n\n\
         In reviewing your current digital presence, I noticed that while you have a strong \
         brand, there might be an opportunity to further capture and qualify leads instantly. \
         Most agencies in your tier lose 40% of leads due to response delays.\n\n\
         We provide \"AI Real Estate Sales Assistant Infrastructure\" designed specifically for \
         agencies like yours. Our system ensures:\n\
         - 24/7 Instant response via SMS and Web\n\
         - Automated lead qualification\n\
         - Direct appointment booking into your calendar\n\n\
         I'd love to show you how this could work for your team. Do you have 15 minutes for a \
         brief demo next Tuesday?\n\n\
         Best regards,\n\n\
         {signature}\n\n\
         ---\n\
         {address}\n\
         To unsubscribe, reply STOP or click here.\n",
        signature = OUTREACH_SIGNATURE,
        address = OUTREACH_POSTAL_ADDRESS,
    );

    OutreachEmail { subject, body }
}

/// Score and tier of one agency, as printed by `agency`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyReport {
    #[serde(flatten)]
    pub score: AgencyScore,
    pub qualification: Qualification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<OutreachEmail>,
}

pub fn assess_agency(agency: &RawAgency, with_email: bool) -> AgencyReport {
    let score = score_agency(agency);
    let qualification = qualify_agency(score.listings);
    AgencyReport {
        score,
        qualification,
        email: with_email.then(|| agency_outreach_email(agency)),
    }
}

pub fn parse_raw_agencies(content: &str) -> Result<Vec<RawAgency>> {
    crate::lead::parse_records(content, "agency")
}

pub fn load_raw_agencies(path: &Path) -> Result<Vec<RawAgency>> {
    crate::lead::load_records(path, "agency")
}
