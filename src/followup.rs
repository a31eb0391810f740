//! Follow-up (drip) planning.
//!
//! Computes when a new lead should be followed up on. Nothing here runs a
//! timer: the caller decides how to execute the plan.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::lead::LeadStatus;

/// Follow-up settings.
///
/// Example YAML:
/// ```yaml
/// follow_up:
///   offsets: ["1d", "3d", "7d"]
///   quiet_hours_start: 20
///   quiet_hours_end: 8
///   utc_offset: "-05:00"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FollowUpConfig {
    /// Delays after capture, in humantime format ("1d", "36h", "1week")
    #[serde(default = "default_offsets")]
    pub offsets: Vec<String>,

    /// First hour (0-23) in which SMS must not be sent
    #[serde(default = "default_quiet_hours_start")]
    pub quiet_hours_start: u32,

    /// First hour (0-23) in which SMS may be sent again
    #[serde(default = "default_quiet_hours_end")]
    pub quiet_hours_end: u32,

    /// Leads' UTC offset ("+04:00", "-05:00"). Unset means this machine's
    /// local time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
}

fn default_offsets() -> Vec<String> {
    vec!["1d".to_string(), "3d".to_string(), "7d".to_string()]
}

fn default_quiet_hours_start() -> u32 {
    20
}

fn default_quiet_hours_end() -> u32 {
    8
}

impl Default for FollowUpConfig {
    fn default() -> Self {
        Self {
            offsets: default_offsets(),
            quiet_hours_start: default_quiet_hours_start(),
            quiet_hours_end: default_quiet_hours_end(),
            utc_offset: None,
        }
    }
}

/// One planned follow-up for a lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowUp {
    /// Stable id, e.g. "followup_3d_42". Re-planning a lead yields the same ids.
    pub job_id: String,
    pub lead_id: u64,
    pub lead_name: String,
    pub status: LeadStatus,
    pub offset: String,
    pub due_at: DateTime<Utc>,
}

/// Plan one follow-up per configured offset, earliest first.
pub fn plan_follow_ups(
    lead_id: u64,
    lead_name: &str,
    status: LeadStatus,
    created_at: DateTime<Utc>,
    config: &FollowUpConfig,
) -> Result<Vec<FollowUp>> {
    let mut plan = config
        .offsets
        .iter()
        .map(|offset| -> Result<FollowUp> {
            let delay = parse_offset(offset)?;
            let due_at = created_at
                .checked_add_signed(delay)
                .with_context(|| format!("Follow-up offset '{}' overflows the calendar", offset))?;
            let label: String = offset.chars().filter(|c| !c.is_whitespace()).collect();
            Ok(FollowUp {
                job_id: format!("followup_{}_{}", label, lead_id),
                lead_id,
                lead_name: lead_name.to_string(),
                status,
                offset: offset.trim().to_string(),
                due_at,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    plan.sort_by_key(|f| f.due_at);
    Ok(plan)
}

fn parse_offset(offset: &str) -> Result<chrono::Duration> {
    let std_duration = humantime::parse_duration(offset.trim())
        .with_context(|| format!("Invalid follow-up offset '{}'", offset))?;
    if std_duration.is_zero() {
        bail!("Follow-up offset '{}' must be greater than zero", offset);
    }
    chrono::Duration::from_std(std_duration)
        .with_context(|| format!("Follow-up offset '{}' is too large", offset))
}

fn parse_utc_offset(offset: &str) -> Result<FixedOffset> {
    offset
        .trim()
        .parse::<FixedOffset>()
        .map_err(|e| anyhow::anyhow!("Invalid UTC offset '{}': {}", offset, e))
}

/// Hour of day (0-23) on the lead's clock at instant `at`.
///
/// Uses `utc_offset` when it is set and valid, the local time zone otherwise.
pub fn lead_local_hour(at: DateTime<Utc>, config: &FollowUpConfig) -> u32 {
    match config.utc_offset.as_deref().map(parse_utc_offset) {
        Some(Ok(offset)) => at.with_timezone(&offset).hour(),
        _ => at.with_timezone(&Local).hour(),
    }
}

/// Whether `hour` (0-23, lead's local time) falls inside the quiet window.
///
/// The window runs from `quiet_hours_start` up to, not including,
/// `quiet_hours_end` and may wrap past midnight. Equal bounds disable it.
pub fn is_quiet_hour(hour: u32, config: &FollowUpConfig) -> bool {
    let (start, end) = (config.quiet_hours_start, config.quiet_hours_end);
    if start == end {
        false
    } else if start < end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

/// Check a follow-up config for problems, returning all of them.
pub fn validate_follow_up(config: &FollowUpConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (i, offset) in config.offsets.iter().enumerate() {
        if let Err(e) = parse_offset(offset) {
            errors.push(format!("follow_up.offsets[{}]: {:#}", i, e));
        }
    }
    if config.quiet_hours_start > 23 {
        errors.push("follow_up.quiet_hours_start: must be an hour between 0 and 23".to_string());
    }
    if config.quiet_hours_end > 23 {
        errors.push("follow_up.quiet_hours_end: must be an hour between 0 and 23".to_string());
    }
    if let Some(Err(e)) = config.utc_offset.as_deref().map(parse_utc_offset) {
        errors.push(format!("follow_up.utc_offset: {:#}", e));
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
    use chrono::{Duration, TimeZone};

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_default_plan_is_one_three_seven_days() {
        let config = FollowUpConfig::default();
        let plan = plan_follow_ups(42, "Dana", LeadStatus::Hot, created_at(), &config).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].job_id, "followup_1d_42");
        assert_eq!(plan[1].job_id, "followup_3d_42");
        assert_eq!(plan[2].job_id, "followup_7d_42");
        assert_eq!(plan[0].due_at, created_at() + Duration::days(1));
        assert_eq!(plan[2].due_at, created_at() + Duration::days(7));
        assert!(plan.iter().all(|f| f.status == LeadStatus::Hot && f.lead_name == "Dana"));
    }

    #[test]
    fn test_plan_sorted_by_due_time() {
        let config = FollowUpConfig {
            offsets: vec!["7d".to_string(), "2h".to_string(), " 24h ".to_string()],
            ..Default::default()
        };
        let plan = plan_follow_ups(1, "Sam", LeadStatus::Warm, created_at(), &config).unwrap();
        let offsets: Vec<&str> = plan.iter().map(|f| f.offset.as_str()).collect();
        assert_eq!(offsets, vec!["2h", "24h", "7d"]);
        assert_eq!(plan[1].job_id, "followup_24h_1");
    }

    #[test]
    fn test_plan_ids_stable_across_calls() {
        let config = FollowUpConfig::default();
        let first = plan_follow_ups(7, "A", LeadStatus::Cold, created_at(), &config).unwrap();
        let second = plan_follow_ups(7, "A", LeadStatus::Cold, created_at(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_plan_rejects_bad_offset() {
        let config = FollowUpConfig {
            offsets: vec!["soon".to_string()],
            ..Default::default()
        };
        let err = plan_follow_ups(1, "A", LeadStatus::Cold, created_at(), &config).unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_plan_rejects_zero_offset() {
        let config = FollowUpConfig {
            offsets: vec!["0s".to_string()],
            ..Default::default()
        };
        assert!(plan_follow_ups(1, "A", LeadStatus::Cold, created_at(), &config).is_err());
    }

    #[test]
    fn test_empty_offsets_empty_plan() {
        let config = FollowUpConfig {
            offsets: vec![],
            ..Default::default()
        };
        assert!(plan_follow_ups(1, "A", LeadStatus::Hot, created_at(), &config)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_quiet_hours_default_window() {
        let config = FollowUpConfig::default();
        assert!(is_quiet_hour(20, &config));
        assert!(is_quiet_hour(23, &config));
        assert!(is_quiet_hour(0, &config));
        assert!(is_quiet_hour(7, &config));
        assert!(!is_quiet_hour(8, &config));
        assert!(!is_quiet_hour(12, &config));
        assert!(!is_quiet_hour(19, &config));
    }

    #[test]
    fn test_quiet_hours_same_day_window() {
        let config = FollowUpConfig {
            quiet_hours_start: 12,
            quiet_hours_end: 14,
            ..Default::default()
        };
        assert!(!is_quiet_hour(11, &config));
        assert!(is_quiet_hour(12, &config));
        assert!(is_quiet_hour(13, &config));
        assert!(!is_quiet_hour(14, &config));
    }

    #[test]
    fn test_lead_local_hour_applies_offset() {
        let config = FollowUpConfig {
            utc_offset: Some("-05:00".to_string()),
            ..Default::default()
        };
        let noon_utc = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(lead_local_hour(noon_utc, &config), 7);
        assert!(is_quiet_hour(lead_local_hour(noon_utc, &config), &config));

        let late_utc = Utc.with_ymd_and_hms(2026, 1, 10, 23, 0, 0).unwrap();
        assert_eq!(lead_local_hour(late_utc, &config), 18);
        assert!(!is_quiet_hour(lead_local_hour(late_utc, &config), &config));

        let dubai = FollowUpConfig {
            utc_offset: Some("+04:00".to_string()),
            ..Default::default()
        };
        assert_eq!(lead_local_hour(late_utc, &dubai), 3);
    }

    #[test]
    fn test_lead_local_hour_defaults_to_local_zone() {
        let at = Utc.with_ymd_and_hms(2026, 1, 10, 14, 0, 0).unwrap();
        let config = FollowUpConfig::default();
        assert_eq!(lead_local_hour(at, &config), at.with_timezone(&Local).hour());
    }

    #[test]
    fn test_validate_rejects_bad_utc_offset() {
        let config = FollowUpConfig {
            utc_offset: Some("EST".to_string()),
            ..Default::default()
        };
        let errors = validate_follow_up(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("follow_up.utc_offset"));

        let config = FollowUpConfig {
            utc_offset: Some("+04:00".to_string()),
            ..Default::default()
        };
        assert!(validate_follow_up(&config).is_ok());
    }

    #[test]
    fn test_quiet_hours_disabled_when_equal() {
        let config = FollowUpConfig {
            quiet_hours_start: 9,
            quiet_hours_end: 9,
            ..Default::default()
        };
        assert!((0..24).all(|h| !is_quiet_hour(h, &config)));
    }

    #[test]
    fn test_follow_up_config_partial_parse() {
        let yaml = "offsets: [\"2d\"]\n";
        let config: FollowUpConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.offsets, vec!["2d".to_string()]);
        assert_eq!(config.quiet_hours_start, 20);
        assert_eq!(config.quiet_hours_end, 8);
    }

    #[test]
    fn test_validate_follow_up() {
        assert!(validate_follow_up(&FollowUpConfig::default()).is_ok());
        let config = FollowUpConfig {
            offsets: vec!["1d".to_string(), "later".to_string()],
            quiet_hours_start: 24,
            quiet_hours_end: 8,
            utc_offset: None,
        };
        let errors = validate_follow_up(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("follow_up.offsets[1]"));
        assert!(errors[1].contains("quiet_hours_start"));
    }
}
