use crate::followup::FollowUp;
use crate::lead::LeadStatus;

use super::types::LeadAlert;

fn status_marker(status: LeadStatus) -> &'static str {
    match status {
        LeadStatus::Hot => "🔥",
        LeadStatus::Warm => "⚠️",
        LeadStatus::Cold => "❄️",
    }
}

/// Group the integer part of an amount with commas: 1234567.8 -> "1,234,568"
pub fn format_thousands(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Agent alert for a new lead (Markdown, as chat apps render it)
pub fn format_alert(alert: &LeadAlert) -> String {
    let area = alert.area.as_deref().filter(|a| !a.trim().is_empty()).unwrap_or("-");
    let timeframe = if alert.timeframe.trim().is_empty() {
        "-"
    } else {
        alert.timeframe.trim()
    };

    format!(
        "{} *{} LEAD ALERT*\n\n\
         *Name:* {}\n\
         *Budget:* ${}\n\
         *Area:* {}\n\
         *Timeframe:* {}\n\
         *Close Probability:* {:.0}%\n\n\
         *Recommended Action:*\n\
         {}",
        status_marker(alert.status),
        alert.status,
        alert.name,
        format_thousands(alert.budget),
        area,
        timeframe,
        alert.probability,
        alert.action
    )
}

/// Agent reminder for a planned follow-up, to surface at its due time
pub fn format_reminder(follow_up: &FollowUp) -> String {
    format!(
        "⏰ *Follow-Up Reminder*\n\n\
         *Lead:* {}\n\
         *Status:* {}\n\
         *Due:* {}\n\
         *Last Contact:* {} ago\n\n\
         *Suggested Message:*\n\
         \"Hi {}, just checking if you'd like to schedule a viewing this week.\"",
        follow_up.lead_name,
        follow_up.status,
        follow_up.due_at.format("%Y-%m-%d %H:%M UTC"),
        follow_up.offset,
        follow_up.lead_name
    )
}
