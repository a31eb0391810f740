use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::agency::AgencyReport;
use crate::lead::{LeadStatus, RawLead};
use crate::notify::format_thousands;
use crate::scoring::{Market, ScoringConfig, ScoringResult};

/// A lead with its scoring result for display
pub struct ScoredLead<'a> {
    pub lead: &'a RawLead,
    pub result: &'a ScoringResult,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Status label, colored HOT red, WARM yellow, COLD blue
pub fn format_status(status: LeadStatus, use_colors: bool) -> String {
    let label = format!("{:<4}", status.as_str());
    if !use_colors {
        return label;
    }
    match status {
        LeadStatus::Hot => label.red().bold().to_string(),
        LeadStatus::Warm => label.yellow().to_string(),
        LeadStatus::Cold => label.blue().to_string(),
    }
}

/// Probability as a whole percentage: 48.0 -> "48%"
pub fn format_probability(probability: f64) -> String {
    format!("{:.0}%", probability)
}

/// Format a single result with its factor breakdown (for `score` and verbose mode)
pub fn format_result_detail(name: &str, result: &ScoringResult, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let headline = format!(
        "{}  {}  score {}  close probability {}",
        name,
        format_status(result.status, use_colors).trim_end(),
        result.score,
        format_probability(result.probability)
    );
    lines.push(if use_colors {
        headline.bold().to_string()
    } else {
        headline
    });

    for factor in &result.breakdown.factors {
        let points = format!("{:>+4}", factor.points as i64);
        let points = if use_colors {
            points.green().to_string()
        } else {
            points
        };
        lines.push(format!("  {}  {}: {}", points, factor.label, factor.description));
    }
    if result.breakdown.raw_score > result.score {
        lines.push(format!(
            "        capped from {} to {}",
            result.breakdown.raw_score, result.score
        ));
    }

    lines.push(format!("  Action: {}", result.action));
    if let Some(commission) = result.commission {
        lines.push(format!("  Est. commission: ${}", format_thousands(commission)));
    }

    lines.join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format leads as a table with columns: Index, Score, Status, Probability, Name, Action
/// Index column: 3 chars (fits "99."), right-aligned
/// Name column is padded to 24 chars; the action takes the rest of the line
pub fn format_scored_table(leads: &[ScoredLead], use_colors: bool) -> String {
    render_scored_table(leads, use_colors, get_terminal_width())
}

fn render_scored_table(
    leads: &[ScoredLead],
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if leads.is_empty() {
        return "No leads found.".to_string();
    }

    let name_width = 24;
    let separator = "  ";
    // "99." + " " + score(3) + sep + status(4) + sep + prob(4) + sep + name + sep
    let fixed_width = 3 + 1 + 3 + 4 + 4 + separator.len() * 4 + name_width;

    leads
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>3}", scored.result.score);
            let prob_str = format!("{:>4}", format_probability(scored.result.probability));
            let name = format!(
                "{:<width$}",
                truncate(scored.lead.display_name(), name_width),
                width = name_width
            );

            let action = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate(&scored.result.action, width - fixed_width)
                }
                Some(_) => truncate(&scored.result.action, 20),
                None => scored.result.action.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    format_status(scored.result.status, true),
                    separator,
                    prob_str,
                    separator,
                    name,
                    separator,
                    action
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str,
                    score_str,
                    separator,
                    format_status(scored.result.status, false),
                    separator,
                    prob_str,
                    separator,
                    name,
                    separator,
                    action
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format leads as tab-separated values for scripting
/// Columns: score, status, probability, name, action (no headers, no colors)
pub fn format_tsv(leads: &[ScoredLead]) -> String {
    if leads.is_empty() {
        return String::new();
    }

    leads
        .iter()
        .map(|scored| {
            format!(
                "{}\t{}\t{:.1}\t{}\t{}",
                scored.result.score,
                scored.result.status,
                scored.result.probability,
                scored.lead.display_name(),
                scored.result.action
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    source: &'a str,
    #[serde(flatten)]
    result: &'a ScoringResult,
}

/// Format leads as a pretty-printed JSON array
pub fn format_json(leads: &[ScoredLead]) -> anyhow::Result<String> {
    let rows: Vec<JsonRow> = leads
        .iter()
        .map(|scored| JsonRow {
            name: scored.lead.display_name(),
            email: scored.lead.email.as_deref(),
            phone: scored.lead.phone.as_deref(),
            source: scored.lead.source(),
            result: scored.result,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Weight table of each market preset, one block per market
pub fn format_markets(markets: &[(Market, ScoringConfig)]) -> String {
    let mut lines = Vec::new();
    for (market, config) in markets {
        lines.push(format!("{}:", market.as_str().to_uppercase()));
        lines.push(format!("  cash buyer          +{}", config.cash_buyer_bonus));
        lines.push(format!("  mortgage approved   +{}", config.mortgage_approved_bonus));
        for tier in &config.timeframes {
            lines.push(format!(
                "  timeframe {:<9} +{}  ({})",
                tier.name,
                tier.bonus,
                tier.labels.join(", ")
            ));
        }
        for bucket in &config.budget {
            lines.push(format!("  budget {:<12} +{}", bucket.range, bucket.bonus));
        }
        for keyword in &config.keywords {
            let quoted = format!("'{}'", keyword.keyword);
            lines.push(format!("  keyword {:<11} +{}", quoted, keyword.bonus));
        }
        lines.push(format!(
            "  HOT >= {}, WARM >= {}, max {}",
            config.hot_threshold, config.warm_threshold, config.max_score
        ));
        lines.push(format!(
            "  probability = min(score x {}, {})",
            config.probability_multiplier, config.probability_cap
        ));
        match config.commission_rate {
            Some(rate) => lines.push(format!("  commission rate     {}%", rate * 100.0)),
            None => lines.push("  commission rate     -".to_string()),
        }
        lines.push(format!("  HOT  -> {}", config.actions.hot));
        lines.push(format!("  WARM -> {}", config.actions.warm));
        lines.push(format!("  COLD -> {}", config.actions.cold));
        lines.push(String::new());
    }
    lines.join("\n").trim_end().to_string()
}

/// Format agency reports as a table with columns: Index, Score, Tier, Class, Name
pub fn format_agency_table(reports: &[AgencyReport], use_colors: bool) -> String {
    if reports.is_empty() {
        return "No agencies found.".to_string();
    }

    reports
        .iter()
        .enumerate()
        .map(|(idx, report)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>2}/10", report.score.score);
            let tier = format!("{:<22}", report.qualification.tier.as_str());
            let class = format!("{:<16}", report.score.classification.as_str());
            if use_colors {
                format!(
                    "{} {}  {}  {}  {}",
                    index_str.dimmed(),
                    score_str.bold(),
                    tier,
                    class,
                    report.score.agency_name
                )
            } else {
                format!(
                    "{} {}  {}  {}  {}",
                    index_str, score_str, tier, class, report.score.agency_name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Outreach drafts of the reports that carry one, separated by a rule
pub fn format_agency_emails(reports: &[AgencyReport]) -> String {
    reports
        .iter()
        .filter_map(|report| {
            report.email.as_ref().map(|email| {
                format!(
                    "To: {}\nSubject: {}\n\n{}",
                    report.score.agency_name, email.subject, email.body
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n========\n\n")
}

/// Format agency reports as a pretty-printed JSON array
pub fn format_agency_json(reports: &[AgencyReport]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}
