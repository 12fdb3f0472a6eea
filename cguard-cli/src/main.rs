//! ComplianceGuard command-line interface.
//!
//! `cguard check` runs the full compliance workflow for a company data
//! file; `cguard monitor` polls for regulatory changes until interrupted;
//! the remaining commands query history, trends, sample data, and the
//! effective configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cguard_core::config::GuardConfig;
use cguard_core::orchestrator::Orchestrator;
use cguard_core::sample;
use cguard_core::types::CompanyProfile;
use cguard_tools::default_registry;

#[derive(Parser)]
#[command(name = "cguard", version, about = "Multi-agent compliance automation")]
struct Cli {
    /// Path to a YAML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a full compliance check for a company.
    Check {
        /// Path to a company profile JSON file.
        #[arg(long)]
        company_data: PathBuf,

        /// Output format for the report.
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Poll for regulatory changes until interrupted (Ctrl-C).
    Monitor,
    /// Show stored assessment history for a company.
    History {
        company_id: String,

        /// Lookback window in days.
        #[arg(long, default_value_t = 90)]
        days: i64,
    },
    /// Analyze compliance trends for a company.
    Trends { company_id: String },
    /// Print a sample company profile.
    Sample {
        /// Industry variant: technology, healthcare, or finance.
        #[arg(long)]
        industry: Option<String>,
    },
    /// Configuration inspection.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration.
    Show,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Detailed,
    Regulatory,
}

fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cguard={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = GuardConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Command::Check {
            company_data,
            format,
        } => run_check(config, &company_data, format).await,
        Command::Monitor => run_monitor(config).await,
        Command::History { company_id, days } => show_history(config, &company_id, days),
        Command::Trends { company_id } => show_trends(config, &company_id),
        Command::Sample { industry } => show_sample(industry.as_deref()),
        Command::Config { command } => match command {
            ConfigCommand::Show => show_config(&config),
        },
    }
}

async fn run_check(config: GuardConfig, company_data: &Path, format: OutputFormat) -> Result<()> {
    let contents = std::fs::read_to_string(company_data)
        .with_context(|| format!("failed to read {}", company_data.display()))?;
    let profile: CompanyProfile =
        serde_json::from_str(&contents).context("invalid company profile JSON")?;

    let registry = default_registry(&config)?;
    let mut orchestrator = Orchestrator::new(config)?;
    let outcome = orchestrator.run_compliance_check(profile).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.report)?);
        }
        OutputFormat::Text | OutputFormat::Detailed | OutputFormat::Regulatory => {
            let tool_format = match format {
                OutputFormat::Detailed => "detailed",
                OutputFormat::Regulatory => "regulatory",
                _ => "executive",
            };
            let rendered = registry
                .execute(
                    "report_formatter",
                    serde_json::json!({
                        "report": serde_json::to_value(&outcome.report)?,
                        "format": tool_format,
                    }),
                )
                .await?;
            if let Some(text) = rendered.data["text"].as_str() {
                println!("{text}");
            }
        }
    }

    info!(
        workflow = %outcome.workflow_id,
        score = outcome.analysis.overall_score,
        duration_s = outcome.duration_seconds,
        "Compliance check finished"
    );
    Ok(())
}

async fn run_monitor(config: GuardConfig) -> Result<()> {
    let mut orchestrator = Orchestrator::new(config)?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping monitoring");
            signal_cancel.cancel();
        }
    });

    orchestrator.run_continuous_monitoring(cancel).await?;
    Ok(())
}

fn show_history(config: GuardConfig, company_id: &str, days: i64) -> Result<()> {
    let orchestrator = Orchestrator::new(config)?;
    let history = orchestrator.memory().retrieve_history(company_id, days)?;
    println!("{}", serde_json::to_string_pretty(&history)?);
    Ok(())
}

fn show_trends(config: GuardConfig, company_id: &str) -> Result<()> {
    let orchestrator = Orchestrator::new(config)?;
    let trends = orchestrator.memory().analyze_trends(company_id)?;
    println!("{}", serde_json::to_string_pretty(&trends)?);
    Ok(())
}

fn show_sample(industry: Option<&str>) -> Result<()> {
    let profile = match industry {
        Some(industry) => sample::sample_company_for_industry(industry),
        None => sample::sample_company(),
    };
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

fn show_config(config: &GuardConfig) -> Result<()> {
    println!("{}", serde_yaml::to_string(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::parse_from([
            "cguard",
            "check",
            "--company-data",
            "company.json",
            "--format",
            "json",
        ]);
        assert!(matches!(
            cli.command,
            Command::Check {
                format: OutputFormat::Json,
                ..
            }
        ));
    }

    #[test]
    fn test_check_defaults_to_json_output() {
        let cli = Cli::parse_from(["cguard", "check", "--company-data", "company.json"]);
        match cli.command {
            Command::Check { format, .. } => assert_eq!(format, OutputFormat::Json),
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_parse_history_defaults() {
        let cli = Cli::parse_from(["cguard", "history", "techcorp-001"]);
        match cli.command {
            Command::History { company_id, days } => {
                assert_eq!(company_id, "techcorp-001");
                assert_eq!(days, 90);
            }
            _ => panic!("expected history command"),
        }
    }
}
