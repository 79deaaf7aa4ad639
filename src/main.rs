//! Optimum Share CLI
//!
//! Command-line front end for the retention share and cost-of-risk calculator

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use optimum_share::auth::digest;
use optimum_share::calculator::validate_percent;
use optimum_share::format::{metric_lines, result_lines};
use optimum_share::{build_report, CalculationInput, Dashboard, PresentationState, Settings};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "optimum_share")]
#[command(about = "Optimum share and cost-of-risk calculator")]
#[command(version)]
struct Cli {
    /// Net loss ratio table CSV (overrides OPTIMUM_SHARE_TABLE)
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// Ceiling mapping CSV (overrides OPTIMUM_SHARE_CEILINGS)
    #[arg(long, global = true)]
    ceilings: Option<PathBuf>,

    /// Credential digest CSV (overrides OPTIMUM_SHARE_CREDENTIALS)
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,

    /// Operating-expense loading in percentage points (overrides OPTIMUM_SHARE_OPEX_LOADING)
    #[arg(long, global = true)]
    opex_loading: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List risk categories
    Categories,
    /// List exposure ranges available for a risk category
    Ranges {
        risk_category: String,
    },
    /// Show metrics and state for a selection
    Show {
        risk_category: String,
        exposure_range: String,
        /// Emit the presentation state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Calculate cost of risk and the underwriting breakdown
    Calculate {
        risk_category: String,
        exposure_range: String,
        /// Commission in percent (0-100)
        #[arg(long, value_parser = parse_commission)]
        commission: f64,
        /// Overrider in percent (0-100)
        #[arg(long, value_parser = parse_overrider)]
        overrider: f64,
        /// Emit the presentation state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate every row of the table with one commission/overrider pair
    Report {
        #[arg(long, value_parser = parse_commission)]
        commission: f64,
        #[arg(long, value_parser = parse_overrider)]
        overrider: f64,
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write JSON instead of CSV
        #[arg(long)]
        json: bool,
    },
    /// Check credentials against the configured credential store
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Print a credential file line for a user
    HashCredentials {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

fn parse_percent(field: &'static str, s: &str) -> Result<f64, String> {
    let value: f64 = s.trim().parse().map_err(|_| format!("not a number: {}", s))?;
    validate_percent(field, value).map_err(|e| e.to_string())
}

fn parse_commission(s: &str) -> Result<f64, String> {
    parse_percent("commission", s)
}

fn parse_overrider(s: &str) -> Result<f64, String> {
    parse_percent("overrider", s)
}

fn settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::from_env();
    if let Some(path) = &cli.table {
        settings.table_path = path.clone();
    }
    if let Some(path) = &cli.ceilings {
        settings.ceilings_path = Some(path.clone());
    }
    if let Some(path) = &cli.credentials {
        settings.credentials_path = Some(path.clone());
    }
    if let Some(loading) = cli.opex_loading {
        if !loading.is_finite() || loading < 0.0 {
            bail!("opex loading must be a non-negative number, got {}", loading);
        }
        settings.opex_loading_pct = loading;
    }
    Ok(settings)
}

fn print_state(state: &PresentationState) {
    println!("{} / {}", state.metrics().risk_category, state.metrics().exposure_range);
    println!("{}", "-".repeat(40));
    for (label, value) in metric_lines(state.metrics()) {
        println!("{:<18} {:>20}", label, value);
    }
    println!();

    match state {
        PresentationState::NotRecommended { .. } => {
            println!("WARNING: this risk code is not recommended!");
        }
        PresentationState::RecommendedAwaitingInput { inputs, .. } => {
            for slot in inputs {
                println!("input {:<12} [{} - {}] step {}", slot.field, slot.min, slot.max, slot.step);
            }
        }
        PresentationState::Calculated { result, .. } => {
            println!("Expected UW Result");
            for (label, value) in result_lines(result) {
                println!("{:<18} {:>20}", label, value);
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = settings(&cli)?;

    match &cli.command {
        Commands::HashCredentials { username, password } => {
            println!("username_digest,password_digest");
            println!("{},{}", digest(username), digest(password));
            return Ok(());
        }
        Commands::Login { username, password } => {
            let authenticator = settings
                .authenticator()
                .context("Failed to load credential store")?;
            if authenticator.authorize(username, password) {
                println!("Login successful");
                return Ok(());
            }
            bail!("invalid username or password");
        }
        _ => {}
    }

    let dashboard = Dashboard::from_settings(&settings).with_context(|| {
        format!("Failed to load reference data from {}", settings.table_path.display())
    })?;

    match cli.command {
        Commands::Categories => {
            for category in dashboard.risk_categories() {
                println!("{}", category);
            }
        }
        Commands::Ranges { risk_category } => {
            let ranges = dashboard.exposure_ranges(&risk_category);
            if ranges.is_empty() {
                bail!("unknown risk category {}", risk_category);
            }
            for range in ranges {
                println!("{}", range);
            }
        }
        Commands::Show { risk_category, exposure_range, json } => {
            let state = dashboard.select(&risk_category, &exposure_range)?;
            if json {
                print_json(&state)?;
            } else {
                print_state(&state);
            }
        }
        Commands::Calculate { risk_category, exposure_range, commission, overrider, json } => {
            let state = dashboard.select(&risk_category, &exposure_range)?;
            if let PresentationState::NotRecommended { .. } = state {
                if json {
                    print_json(&state)?;
                } else {
                    print_state(&state);
                }
                return Ok(());
            }
            let calculated = state.calculate(
                CalculationInput::new(commission, overrider),
                dashboard.loadings(),
            )?;
            if json {
                print_json(&calculated)?;
            } else {
                print_state(&calculated);
            }
        }
        Commands::Report { commission, overrider, out, json } => {
            let report = build_report(&dashboard, CalculationInput::new(commission, overrider));
            let writer: Box<dyn Write> = match &out {
                Some(path) => Box::new(
                    File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                ),
                None => Box::new(io::stdout()),
            };
            let writer = BufWriter::new(writer);
            if json {
                report.write_json(writer)?;
            } else {
                report.write_csv(writer)?;
            }

            let summary = report.summary();
            eprintln!(
                "{} rows: {} surplus, {} deficit, {} not recommended, {} failed",
                summary.rows, summary.surplus, summary.deficit, summary.not_recommended, summary.failed
            );
            if let Some(path) = out {
                eprintln!("Report written to {}", path.display());
            }
        }
        Commands::Login { .. } | Commands::HashCredentials { .. } => {}
    }

    Ok(())
}
