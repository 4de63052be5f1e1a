//! `booth` — fact-check BOOTH report content from the command line.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use booth_core::{AppConfig, AppState, AuditReport, CheckedPassage, CoverageReport};

const DEFAULT_CONFIG: &str = "booth.yaml";

#[derive(Parser)]
#[command(name = "booth")]
#[command(about = "Fact-check BOOTH market report content", version)]
struct Cli {
    /// Configuration file (defaults to ./booth.yaml when present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Increase log verbosity (-v, -vv)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Fact-check a single passage
    Check {
        /// Passage text
        passage: String,

        /// Also show the score and the keywords that fired
        #[arg(long)]
        explain: bool,
    },
    /// Fact-check every factual passage in the report
    Report,
    /// Show how much of the report is backed by fact-checks
    Coverage,
    /// Grade the fact-check data for quality problems
    Audit,
    /// Load and validate all data documents
    Validate,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if default.exists() {
                AppConfig::from_yaml_file(&default)
                    .with_context(|| format!("loading config {}", default.display()))
            } else {
                debug!("no config file found, using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_ref())?;
    let state = AppState::load(config).context("loading report data")?;

    match cli.command {
        Command::Check { passage, explain } => {
            let matched = state.match_passage(&passage);
            let result = state.fact_check(&passage);

            if cli.format == Format::Json {
                #[derive(Serialize)]
                struct CheckOutput<'a> {
                    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
                    match_result: Option<&'a booth_core::MatchResult>,
                    result: &'a booth_core::FactCheckResult,
                }
                print_json(&CheckOutput {
                    match_result: explain.then_some(&matched),
                    result: &result,
                })?;
            } else {
                println!(
                    "{} ({}% confidence, {})",
                    result.status,
                    result.confidence,
                    state.band(&result)
                );
                println!("{}", result.explanation);
                for source in &result.sources {
                    println!("  - {} <{}>", source.title, source.url);
                }
                if explain {
                    match &matched.record_id {
                        Some(id) => println!(
                            "matched {} with score {} via [{}]",
                            id,
                            matched.score,
                            matched.matched_keywords.join(", ")
                        ),
                        None => println!("no rule matched"),
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Report => {
            let checked = state.fact_check_report();
            if cli.format == Format::Json {
                print_json(&checked)?;
            } else {
                print_checked(&checked);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Coverage => {
            let report = state.coverage();
            if cli.format == Format::Json {
                print_json(&report)?;
            } else {
                print_coverage(&report);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Audit => {
            let report = state.audit();
            if cli.format == Format::Json {
                print_json(&report)?;
            } else {
                print_audit(&report);
            }
            Ok(if report.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Validate => {
            // Loading already validated every document.
            println!(
                "ok: {} sections, {} fact-checks, {} rules",
                state.report().sections.len(),
                state.fact_checks().len(),
                state.rules().len()
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_checked(checked: &[CheckedPassage]) {
    for passage in checked {
        println!(
            "[{}] {} ({}%) {}",
            passage.location, passage.result.status, passage.result.confidence, passage.band
        );
        println!("    {}", passage.text);
    }
}

fn print_coverage(report: &CoverageReport) {
    println!(
        "Coverage: {}/{} claims ({:.2}%)",
        report.fact_checked_claims, report.total_claims, report.coverage_percentage
    );
    if !report.missing.is_empty() {
        println!("Missing fact-checks:");
        for missing in &report.missing {
            println!("  {}: \"{}\"", missing.location, missing.excerpt);
        }
    }
    if !report.unused_fact_checks.is_empty() {
        println!("Unused fact-checks: {}", report.unused_fact_checks.join(", "));
    }
}

fn print_audit(report: &AuditReport) {
    if report.is_valid() {
        println!("All validations passed");
    } else {
        println!("Validation failed");
    }
    for (label, messages) in [
        ("Errors", &report.errors),
        ("Warnings", &report.warnings),
        ("Suggestions", &report.suggestions),
    ] {
        if messages.is_empty() {
            continue;
        }
        println!("{}:", label);
        for message in messages {
            println!("  {}", message);
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
