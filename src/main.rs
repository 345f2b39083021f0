use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use caseload_balance::config::AppConfig;
use caseload_balance::models::Level;
use caseload_balance::pipeline::{self, ScoringContext};
use caseload_balance::tiers::TierLabel;
use caseload_balance::window::ReferenceMonth;
use caseload_balance::{aggregate, ranking, report, roster};

#[derive(Parser)]
#[command(name = "caseload-balance")]
#[command(about = "Clinician availability scoring and assignment recommendations", long_about = None)]
struct Cli {
    /// JSON file overriding scoring and aggregation defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the clinician summary CSV from a raw session export
    Summarize {
        #[arg(long)]
        sessions: PathBuf,
        #[arg(long, default_value = "clinician_summary.csv")]
        out: PathBuf,
        /// Date the summary is computed for (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Score and rank clinicians for new assignments
    Score {
        #[arg(long, default_value = "clinician_summary.csv")]
        roster: PathBuf,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Active-case window in months
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=3))]
        window: Option<u32>,
        #[arg(long)]
        level: Option<Level>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Print the ranked records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "clinician_summary.csv")]
        roster: PathBuf,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=3))]
        window: Option<u32>,
        #[arg(long)]
        level: Option<Level>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Summarize {
            sessions,
            out,
            as_of,
        } => {
            let as_of = as_of.unwrap_or_else(today);
            let written = aggregate::summarize_file(&sessions, &out, as_of, &config.aggregation)
                .with_context(|| format!("failed to summarize {}", sessions.display()))?;
            println!("Wrote {written} clinicians to {}.", out.display());
        }
        Commands::Score {
            roster,
            as_of,
            window,
            level,
            limit,
            json,
        } => {
            let context = scoring_context(as_of, window);
            let clinicians = roster::load_roster(&roster, &context.reference)
                .with_context(|| format!("failed to load roster {}", roster.display()))?;
            let scored = pipeline::score_roster(&clinicians, &context, &config.scoring);
            let ranked = ranking::recommend(&scored, level);

            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
                return Ok(());
            }

            if ranked.is_empty() {
                println!("No clinicians found for this roster.");
                return Ok(());
            }

            println!("Clinicians by availability (lowest load first):");
            for s in ranked.iter().take(limit) {
                println!(
                    "- {} ({}) score {} [{}], burnout {}, load balancing {}{}",
                    s.identity,
                    s.level,
                    s.final_score,
                    s.recommendation.label(),
                    s.burnout.tier.label(),
                    s.load_balancing.tier.label(),
                    if s.features.using_fallback {
                        " (previous month used)"
                    } else {
                        ""
                    }
                );
            }
        }
        Commands::Report {
            roster,
            as_of,
            window,
            level,
            out,
        } => {
            let context = scoring_context(as_of, window);
            let clinicians = roster::load_roster(&roster, &context.reference)
                .with_context(|| format!("failed to load roster {}", roster.display()))?;
            let scored = pipeline::score_roster(&clinicians, &context, &config.scoring);
            let report = report::build_report(level, &context.reference, window, &scored);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn scoring_context(as_of: Option<NaiveDate>, window: Option<u32>) -> ScoringContext {
    let reference = ReferenceMonth::from_date(as_of.unwrap_or_else(today));
    let context = ScoringContext::new(reference);
    match window {
        Some(months) => context.with_window(months),
        None => context,
    }
}
