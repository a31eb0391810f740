use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lead_triage::agency::AgencyReport;
use lead_triage::config::Config;
use lead_triage::followup::FollowUpConfig;
use lead_triage::lead::{RawFlag, RawLead, RawNumber};
use lead_triage::notify::{LogNotifier, Notifier};
use lead_triage::output::ScoredLead;
use lead_triage::scoring::{Market, ScoringConfig, ScoringResult};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DetailFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BatchFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one lead described by flags
    Score {
        /// Lead name, used in the output and outreach script
        #[arg(long)]
        name: Option<String>,
        /// Budget in currency units ("1200000", "1,200,000")
        #[arg(long)]
        budget: String,
        /// Buyer pays cash
        #[arg(long)]
        cash_buyer: bool,
        /// Mortgage status: approved, not_approved, checking
        #[arg(long, default_value = "")]
        mortgage: String,
        /// Buying timeframe as chosen on the form ("Immediate", "3 months", ...)
        #[arg(long, default_value = "")]
        timeframe: String,
        /// Free-text inquiry message
        #[arg(long, default_value = "")]
        message: String,
        #[arg(long, value_enum, default_value_t = DetailFormat::Text)]
        format: DetailFormat,
        /// Also print the outreach SMS and email for the lead's status
        #[arg(long)]
        script: bool,
    },
    /// Score every lead in a JSON / NDJSON file ("-" reads stdin), best first
    Batch {
        file: String,
        #[arg(long, value_enum, default_value_t = BatchFormat::Table)]
        format: BatchFormat,
        /// Send a new-lead alert per lead and log its follow-up plan
        #[arg(long)]
        notify: bool,
    },
    /// Rate and tier brokerages from a JSON / NDJSON file ("-" reads stdin), best first
    Agency {
        file: String,
        #[arg(long, value_enum, default_value_t = DetailFormat::Text)]
        format: DetailFormat,
        /// Also draft an outreach email per agency
        #[arg(long)]
        email: bool,
    },
    /// Show the weight table of every market
    Markets,
    /// Check the effective configuration and exit
    Validate,
    /// Write a starter config file
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "lead-triage")]
#[command(about = "Score real-estate leads into HOT / WARM / COLD", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/lead-triage/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Market weight table to use (us, uae); overrides the config file
    #[arg(short, long, global = true)]
    market: Option<Market>,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "lead_triage=debug"
    } else {
        "lead_triage=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config_path = cli.config.map(PathBuf::from);

    // Init must work even when the existing config is broken
    if let Commands::Init { force } = cli.command {
        let market = cli.market.unwrap_or_default();
        let path = match config_path.map(Ok).unwrap_or_else(lead_triage::config::get_config_path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        let starter = lead_triage::config::starter_config(market);
        if let Err(e) = lead_triage::config::write_config(&path, &starter, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Config written to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match lead_triage::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let market = config.market(cli.market);
    let scoring = config.effective_scoring(cli.market);
    let follow_up = config.effective_follow_up();
    tracing::debug!(%market, overrides = config.scoring.is_some(), "effective configuration");

    // Validate config at startup
    let mut errors = Vec::new();
    if let Err(e) = lead_triage::scoring::validate_scoring(&scoring) {
        errors.extend(e);
    }
    if let Err(e) = lead_triage::followup::validate_follow_up(&follow_up) {
        errors.extend(e);
    }
    if !errors.is_empty() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let outcome = match cli.command {
        Commands::Score {
            name,
            budget,
            cash_buyer,
            mortgage,
            timeframe,
            message,
            format,
            script,
        } => {
            let lead = RawLead {
                name,
                budget: Some(RawNumber::Text(budget)),
                cash_buyer: Some(RawFlag::Bool(cash_buyer)),
                mortgage_status: Some(mortgage).filter(|m| !m.trim().is_empty()),
                timeframe: Some(timeframe),
                message: Some(message),
                ..Default::default()
            };
            run_score(&lead, &scoring, format, script)
        }
        Commands::Batch {
            file,
            format,
            notify,
        } => run_batch(&file, &scoring, &follow_up, format, notify),
        Commands::Agency {
            file,
            format,
            email,
        } => run_agency(&file, format, email),
        Commands::Markets => {
            let presets = Market::ALL.map(|m| (m, m.scoring()));
            println!("{}", lead_triage::output::format_markets(&presets));
            if config.scoring.as_ref().is_some_and(|o| !o.is_empty()) {
                println!();
                println!("Note: the config file overrides some {} weights.", market);
            }
            Ok(())
        }
        Commands::Validate => {
            report_valid(&config, market);
            Ok(())
        }
        Commands::Init { .. } => Ok(()),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_INPUT);
    }

    std::process::exit(EXIT_SUCCESS);
}

fn run_score(
    lead: &RawLead,
    scoring: &ScoringConfig,
    format: DetailFormat,
    script: bool,
) -> Result<()> {
    let result = lead_triage::scoring::score_lead(&lead.attributes(), scoring);

    match format {
        DetailFormat::Text => {
            let use_colors = lead_triage::output::should_use_colors();
            println!(
                "{}",
                lead_triage::output::format_result_detail(lead.display_name(), &result, use_colors)
            );
        }
        DetailFormat::Json => {
            let rows = [ScoredLead {
                lead,
                result: &result,
            }];
            println!("{}", lead_triage::output::format_json(&rows)?);
        }
    }

    if script {
        let name = lead.name.as_deref().unwrap_or("there");
        let text = lead_triage::outreach::script_for(name, result.status);
        println!();
        println!("SMS:");
        println!("{}", lead_triage::outreach::sms_body(&text));
        println!();
        println!("Email: {}", lead_triage::outreach::EMAIL_SUBJECT);
        println!("{}", lead_triage::outreach::email_body(&text));
    }

    Ok(())
}

fn read_batch(file: &str) -> Result<Vec<RawLead>> {
    if file == "-" {
        let content =
            std::io::read_to_string(std::io::stdin()).context("Failed to read leads from stdin")?;
        lead_triage::lead::parse_raw_leads(&content).context("Invalid lead data on stdin")
    } else {
        lead_triage::lead::load_raw_leads(Path::new(file))
    }
}

fn run_batch(
    file: &str,
    scoring: &ScoringConfig,
    follow_up: &FollowUpConfig,
    format: BatchFormat,
    notify: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let leads = read_batch(file)?;

    // Lead ids follow input order so follow-up job ids stay stable across runs
    let mut scored: Vec<(u64, RawLead, ScoringResult)> = leads
        .into_iter()
        .enumerate()
        .map(|(i, lead)| {
            let result = lead_triage::scoring::score_lead(&lead.attributes(), scoring);
            (i as u64 + 1, lead, result)
        })
        .collect();

    // Score descending; ties keep input order
    scored.sort_by(|a, b| b.2.score.cmp(&a.2.score));

    tracing::debug!(
        count = scored.len(),
        elapsed = ?start_time.elapsed(),
        "scored leads"
    );

    if notify {
        let notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier)];
        let now = Utc::now();
        for (lead_id, lead, result) in &scored {
            let plan = lead_triage::followup::plan_follow_ups(
                *lead_id,
                lead.display_name(),
                result.status,
                now,
                follow_up,
            )?;
            for event in lead_triage::notify::lead_events(lead, result, &plan) {
                lead_triage::notify::dispatch(&notifiers, &event);
            }
            for planned in &plan {
                let hour = lead_triage::followup::lead_local_hour(planned.due_at, follow_up);
                let sms = lead_triage::outreach::sms_gate(lead.sms_opt_in(), hour, follow_up);
                tracing::info!(
                    job_id = %planned.job_id,
                    local_hour = hour,
                    sms = ?sms,
                    "follow-up sms"
                );
            }
        }
    }

    let rows: Vec<ScoredLead> = scored
        .iter()
        .map(|(_, lead, result)| ScoredLead { lead, result })
        .collect();

    match format {
        BatchFormat::Table => {
            let use_colors = lead_triage::output::should_use_colors();
            println!("{}", lead_triage::output::format_scored_table(&rows, use_colors));
        }
        BatchFormat::Tsv => {
            let tsv = lead_triage::output::format_tsv(&rows);
            if !tsv.is_empty() {
                println!("{}", tsv);
            }
        }
        BatchFormat::Json => println!("{}", lead_triage::output::format_json(&rows)?),
    }

    Ok(())
}

fn run_agency(file: &str, format: DetailFormat, with_email: bool) -> Result<()> {
    let agencies = if file == "-" {
        let content = std::io::read_to_string(std::io::stdin())
            .context("Failed to read agencies from stdin")?;
        lead_triage::agency::parse_raw_agencies(&content)
            .context("Invalid agency data on stdin")?
    } else {
        lead_triage::agency::load_raw_agencies(Path::new(file))?
    };

    let mut reports: Vec<AgencyReport> = agencies
        .iter()
        .map(|agency| lead_triage::agency::assess_agency(agency, with_email))
        .collect();
    reports.sort_by(|a, b| b.score.score.cmp(&a.score.score));
    tracing::debug!(count = reports.len(), "assessed agencies");

    match format {
        DetailFormat::Text => {
            let use_colors = lead_triage::output::should_use_colors();
            println!("{}", lead_triage::output::format_agency_table(&reports, use_colors));
            if with_email && !reports.is_empty() {
                println!();
                println!("{}", lead_triage::output::format_agency_emails(&reports));
            }
        }
        DetailFormat::Json => println!("{}", lead_triage::output::format_agency_json(&reports)?),
    }

    Ok(())
}

fn report_valid(config: &Config, market: Market) {
    let overridden = config.scoring.as_ref().is_some_and(|o| !o.is_empty());
    if overridden {
        println!("Configuration OK (market: {}, with scoring overrides)", market);
    } else {
        println!("Configuration OK (market: {})", market);
    }
}
