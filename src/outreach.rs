//! Outreach texts sent to the lead, with the compliance wording SMS and
//! email require.

use crate::followup::{is_quiet_hour, FollowUpConfig};
use crate::lead::LeadStatus;

pub const SMS_OPT_OUT_SUFFIX: &str = "\n\nReply STOP to unsubscribe.";
pub const EMAIL_FOOTER: &str = "\n\n---\n\
You are receiving this because you inquired about a property listing. \
To unsubscribe, please click here: [Unsubscribe Link]";
pub const EMAIL_SUBJECT: &str = "Quick question regarding your home search";

/// Agent-voice message for the lead, keyed by triage status.
pub fn script_for(lead_name: &str, status: LeadStatus) -> String {
    match status {
        LeadStatus::Hot => format!(
            "Hi {}! I saw your interest in the property. I'd love to help you \
             schedule a showing. What day works best for you this week?",
            lead_name
        ),
        LeadStatus::Warm => format!(
            "Hi {}, thanks for reaching out! I've put together a list of similar \
             homes you might like. Would you like me to send them over?",
            lead_name
        ),
        LeadStatus::Cold => format!(
            "Hi {}, thanks for your inquiry! I'm here to help whenever you're \
             ready to start your home search. Feel free to reach out with any questions.",
            lead_name
        ),
    }
}

pub fn sms_body(script: &str) -> String {
    format!("{}{}", script, SMS_OPT_OUT_SUFFIX)
}

pub fn email_body(script: &str) -> String {
    format!("{}{}", script, EMAIL_FOOTER)
}

/// Whether an SMS may go out right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsDecision {
    Send,
    /// The lead never opted in to text messages
    BlockedNoOptIn,
    /// Retry after quiet hours end
    DeferredQuietHours,
}

/// Decide whether to text a lead at `hour` (0-23, lead's local time, see
/// [`lead_local_hour`](crate::followup::lead_local_hour)).
/// Opt-in is checked first: without it the time of day does not matter.
pub fn sms_gate(opt_in: bool, hour: u32, config: &FollowUpConfig) -> SmsDecision {
    if !opt_in {
        SmsDecision::BlockedNoOptIn
    } else if is_quiet_hour(hour, config) {
        SmsDecision::DeferredQuietHours
    } else {
        SmsDecision::Send
    }
}
