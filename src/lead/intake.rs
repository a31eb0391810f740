use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::types::{LeadAttributes, MortgageStatus};

/// A number as a form or spreadsheet export sends it: either a JSON number
/// or text such as "1,200,000" or "$950000".
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

/// A checkbox value: a JSON bool, a 0/1 number or text ("true", "on", "yes", "1").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawFlag {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawFlag {
    pub fn is_set(&self) -> bool {
        match self {
            RawFlag::Bool(b) => *b,
            RawFlag::Number(n) => *n != 0.0,
            RawFlag::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "on" | "yes" | "y" | "1"
            ),
        }
    }
}

/// One lead as submitted, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawLead {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub area: Option<String>,
    pub property_type: Option<String>,
    pub source: Option<String>,
    pub budget: Option<RawNumber>,
    pub timeframe: Option<String>,
    pub mortgage_status: Option<String>,
    pub cash_buyer: Option<RawFlag>,
    pub message: Option<String>,
    pub sms_opt_in: Option<RawFlag>,
}

impl RawLead {
    /// Coerce into engine input. Never fails: bad values fall back to the
    /// neutral value for their field.
    pub fn attributes(&self) -> LeadAttributes {
        let budget = match &self.budget {
            Some(raw) => coerce_budget(raw),
            None => 0.0,
        };

        let mortgage_status = self
            .mortgage_status
            .as_deref()
            .map(MortgageStatus::from_label)
            .unwrap_or_default();
        if mortgage_status == MortgageStatus::Unknown {
            if let Some(raw) = self.mortgage_status.as_deref() {
                tracing::debug!(value = raw, "unrecognized mortgage status, scoring as unknown");
            }
        }

        LeadAttributes {
            cash_buyer: self.cash_buyer.as_ref().is_some_and(RawFlag::is_set),
            mortgage_status,
            timeframe: self.timeframe.clone().unwrap_or_default(),
            budget,
            message: self.message.clone().unwrap_or_default(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => "(unnamed)",
        }
    }

    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or("Website")
    }

    pub fn sms_opt_in(&self) -> bool {
        self.sms_opt_in.as_ref().is_some_and(RawFlag::is_set)
    }
}

/// Parse a budget, returning 0 for anything negative, non-finite or unreadable.
pub fn coerce_budget(raw: &RawNumber) -> f64 {
    let value = match raw {
        RawNumber::Number(n) => *n,
        RawNumber::Text(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches(['$', '€', '£'])
                .trim_start_matches("AED")
                .chars()
                .filter(|c| !matches!(c, ',' | '_' | ' '))
                .collect();
            match cleaned.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    tracing::debug!(value = %s, "unparseable budget, using 0");
                    return 0.0;
                }
            }
        }
    };

    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::debug!(value, "budget out of range, using 0");
        0.0
    }
}

/// Parse a batch of leads: a JSON array, or one JSON object per line.
pub fn parse_raw_leads(content: &str) -> Result<Vec<RawLead>> {
    parse_records(content, "lead")
}

/// Parse a batch of `what` records: a JSON array, or one JSON object per line.
pub fn parse_records<T: DeserializeOwned>(content: &str, what: &str) -> Result<Vec<T>> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .with_context(|| format!("Failed to parse {} batch as a JSON array", what));
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Failed to parse {} on line {}", what, i + 1))
        })
        .collect()
}

/// Read a batch file from disk. See [`parse_raw_leads`] for the accepted formats.
pub fn load_raw_leads(path: &Path) -> Result<Vec<RawLead>> {
    load_records(path, "lead")
}

/// Read a file of `what` records. See [`parse_records`] for the accepted formats.
pub fn load_records<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file at {}", what, path.display()))?;
    let records: Vec<T> = parse_records(&content, what)
        .with_context(|| format!("Invalid {} file {}", what, path.display()))?;
    tracing::debug!(count = records.len(), kind = what, path = %path.display(), "loaded records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_budget_number() {
        assert_eq!(coerce_budget(&RawNumber::Number(500_000.0)), 500_000.0);
    }

    #[test]
    fn test_coerce_budget_formatted_text() {
        assert_eq!(coerce_budget(&RawNumber::Text("1,200,000".to_string())), 1_200_000.0);
        assert_eq!(coerce_budget(&RawNumber::Text("$950000".to_string())), 950_000.0);
        assert_eq!(coerce_budget(&RawNumber::Text("AED 2 000 000".to_string())), 2_000_000.0);
    }

    #[test]
    fn test_coerce_budget_rejects_bad_values() {
        assert_eq!(coerce_budget(&RawNumber::Number(-10.0)), 0.0);
        assert_eq!(coerce_budget(&RawNumber::Number(f64::NAN)), 0.0);
        assert_eq!(coerce_budget(&RawNumber::Number(f64::INFINITY)), 0.0);
        assert_eq!(coerce_budget(&RawNumber::Text("lots".to_string())), 0.0);
        assert_eq!(coerce_budget(&RawNumber::Text("-5000".to_string())), 0.0);
    }

    #[test]
    fn test_empty_raw_lead_is_neutral() {
        let attrs = RawLead::default().attributes();
        assert_eq!(attrs, LeadAttributes::default());
        assert!(!attrs.cash_buyer);
        assert_eq!(attrs.mortgage_status, MortgageStatus::Unknown);
        assert_eq!(attrs.budget, 0.0);
    }

    #[test]
    fn test_raw_lead_from_form_json() {
        let json = r#"{
            "name": "Dana Whitfield",
            "email": "dana@example.com",
            "budget": "2,000,000",
            "timeframe": "Immediate",
            "mortgage_status": "approved",
            "cash_buyer": "on",
            "message": "I am URGENT"
        }"#;
        let raw: RawLead = serde_json::from_str(json).unwrap();
        let attrs = raw.attributes();
        assert!(attrs.cash_buyer);
        assert_eq!(attrs.mortgage_status, MortgageStatus::Approved);
        assert_eq!(attrs.timeframe, "Immediate");
        assert_eq!(attrs.budget, 2_000_000.0);
        assert_eq!(attrs.message, "I am URGENT");
        assert_eq!(raw.display_name(), "Dana Whitfield");
        assert_eq!(raw.source(), "Website");
    }

    #[test]
    fn test_raw_flag_values() {
        assert!(RawFlag::Bool(true).is_set());
        assert!(!RawFlag::Bool(false).is_set());
        assert!(RawFlag::Text("Yes".to_string()).is_set());
        assert!(RawFlag::Text("1".to_string()).is_set());
        assert!(!RawFlag::Text("off".to_string()).is_set());
        assert!(!RawFlag::Text("".to_string()).is_set());
        assert!(RawFlag::Number(1.0).is_set());
        assert!(!RawFlag::Number(0.0).is_set());
    }

    #[test]
    fn test_numeric_checkbox_in_batch() {
        let content = r#"{"name": "A", "cash_buyer": 1, "sms_opt_in": 0}
{"name": "B", "cash_buyer": 0}
"#;
        let leads = parse_raw_leads(content).unwrap();
        assert_eq!(leads.len(), 2);
        assert!(leads[0].attributes().cash_buyer);
        assert!(!leads[0].sms_opt_in());
        assert!(!leads[1].attributes().cash_buyer);
    }

    #[test]
    fn test_display_name_fallback() {
        let raw = RawLead {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(raw.display_name(), "(unnamed)");
    }

    #[test]
    fn test_parse_raw_leads_array() {
        let content = r#"[{"name": "A", "budget": 100}, {"name": "B"}]"#;
        let leads = parse_raw_leads(content).unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].budget, Some(RawNumber::Number(100.0)));
        assert!(leads[1].budget.is_none());
    }

    #[test]
    fn test_parse_raw_leads_ndjson_skips_blank_lines() {
        let content = "{\"name\": \"A\"}\n\n{\"name\": \"B\", \"sms_opt_in\": true}\n";
        let leads = parse_raw_leads(content).unwrap();
        assert_eq!(leads.len(), 2);
        assert!(leads[1].sms_opt_in());
    }

    #[test]
    fn test_parse_raw_leads_reports_bad_line() {
        let content = "{\"name\": \"A\"}\nnot json\n";
        let err = parse_raw_leads(content).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_raw_leads_empty() {
        assert!(parse_raw_leads("   \n").unwrap().is_empty());
    }
}
