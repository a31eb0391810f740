pub mod format;
pub mod port;
pub mod types;

pub use format::{format_alert, format_reminder, format_thousands};
pub use port::{dispatch, LogNotifier, Notifier};
pub use types::{lead_events, LeadAlert, LeadEvent};
