use serde::Serialize;

use crate::followup::FollowUp;
use crate::lead::{LeadStatus, RawLead};
use crate::scoring::ScoringResult;

/// What the agent needs to know about a freshly scored lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadAlert {
    pub name: String,
    pub budget: f64,
    pub area: Option<String>,
    pub timeframe: String,
    pub status: LeadStatus,
    pub probability: f64,
    pub action: String,
}

impl LeadAlert {
    pub fn new(lead: &RawLead, result: &ScoringResult) -> Self {
        let attrs = lead.attributes();
        Self {
            name: lead.display_name().to_string(),
            budget: attrs.budget,
            area: lead.area.clone(),
            timeframe: attrs.timeframe,
            status: result.status,
            probability: result.probability,
            action: result.action.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeadEvent {
    NewLead(LeadAlert),
    /// A reminder the agent's channel should surface at `due_at`
    FollowUpScheduled(FollowUp),
}

impl LeadEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            LeadEvent::NewLead(_) => "new_lead",
            LeadEvent::FollowUpScheduled(_) => "follow_up_scheduled",
        }
    }
}

/// Events for one freshly scored lead: the alert first, then one reminder
/// per planned follow-up in plan order.
pub fn lead_events(lead: &RawLead, result: &ScoringResult, plan: &[FollowUp]) -> Vec<LeadEvent> {
    std::iter::once(LeadEvent::NewLead(LeadAlert::new(lead, result)))
        .chain(plan.iter().cloned().map(LeadEvent::FollowUpScheduled))
        .collect()
}
