use anyhow::Result;

use super::format::{format_alert, format_reminder};
use super::types::LeadEvent;

/// Outbound channel for lead events (agent chat, SMS gateway, email, ...).
///
/// Implementations are injected where events are produced; nothing in this
/// crate holds a process-wide bot or client.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    fn send(&self, event: &LeadEvent) -> Result<()>;
}

/// Writes every event to the log. Used when no external channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn send(&self, event: &LeadEvent) -> Result<()> {
        match event {
            LeadEvent::NewLead(alert) => {
                tracing::info!(
                    lead = %alert.name,
                    status = %alert.status,
                    probability = alert.probability,
                    "new lead\n{}",
                    format_alert(alert)
                );
            }
            LeadEvent::FollowUpScheduled(follow_up) => {
                tracing::info!(
                    job_id = %follow_up.job_id,
                    due_at = %follow_up.due_at,
                    "follow-up scheduled\n{}",
                    format_reminder(follow_up)
                );
            }
        }
        Ok(())
    }
}

/// Send an event to every notifier. A failing channel is logged and does not
/// stop the others. Returns how many channels accepted the event.
pub fn dispatch(notifiers: &[Box<dyn Notifier>], event: &LeadEvent) -> usize {
    let mut delivered = 0;
    for notifier in notifiers {
        match notifier.send(event) {
            Ok(()) => {
                tracing::debug!(channel = notifier.name(), kind = event.kind(), "event delivered");
                delivered += 1;
            }
            Err(e) => {
                tracing::warn!(
                    channel = notifier.name(),
                    kind = event.kind(),
                    "failed to deliver event: {:#}",
                    e
                );
            }
        }
    }
    delivered
}
