//! Study Buddy CLI - submit dataset generation forms from the terminal
//!
//! Each subcommand is one form: its flags are the form's fields and the
//! rendered result is printed the way the results panel would show it.

mod commands;
mod config;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use studybuddy_client::{FormKind, StudyBuddyClient, SubmissionState, DEFAULT_CONNECT_TIMEOUT};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::{collect_fields, parse_field};
use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "studybuddy")]
#[command(author, version, about = "Study Buddy dataset generation CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Server URL
    #[arg(short, long, env = "STUDYBUDDY_SERVER")]
    server: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "STUDYBUDDY_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Total request timeout in seconds (default: wait until the server answers)
    #[arg(long)]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic dataset for one domain
    Synthetic {
        /// Number of subjects (base-10 integer)
        #[arg(long)]
        num_subjects: String,

        /// Implementation guide, e.g. SDTM
        #[arg(long)]
        dataset_type: Option<String>,

        /// Domain code, e.g. DM
        #[arg(long)]
        domain: Option<String>,

        /// Therapeutic area
        #[arg(long)]
        therapeutic_area: Option<String>,

        /// Data format, e.g. csv
        #[arg(long)]
        data_format: Option<String>,

        /// Additional form field (repeatable)
        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Generate a raw EDC dataset package
    RawPackage {
        /// Number of subjects (base-10 integer)
        #[arg(long)]
        num_subjects: String,

        /// Comma-separated domain codes, e.g. "DM, AE, VS"
        #[arg(long)]
        domains: String,

        /// Therapeutic area
        #[arg(long)]
        therapeutic_area: Option<String>,

        /// Study story
        #[arg(long)]
        study_story: Option<String>,

        /// Output format of the package, e.g. csv
        #[arg(long)]
        output_format: Option<String>,

        /// Additional form field (repeatable)
        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Generate analysis code for a dataset
    AnalysisCode {
        /// Target language, e.g. sas or r
        #[arg(long)]
        language: Option<String>,

        /// Path of the input dataset
        #[arg(long)]
        dataset_path: Option<String>,

        /// Output type, e.g. demographics
        #[arg(long)]
        output_type: Option<String>,

        /// Treatment variable, e.g. ARM
        #[arg(long)]
        treatment_var: Option<String>,

        /// Additional form field (repeatable)
        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Check that the backend is reachable
    Ping,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(
        cli.server.as_deref(),
        cli.output.map(OutputFormat::as_str),
        cli.no_color,
        cli.timeout,
    );
    let format = resolve_format(&merged.output)?;

    let ctx = OutputContext::new(format, merged.no_color, cli.quiet);
    let connect_timeout = merged
        .timeout
        .map_or(DEFAULT_CONNECT_TIMEOUT, |t| t.min(DEFAULT_CONNECT_TIMEOUT));
    let client = StudyBuddyClient::with_config(&merged.server, merged.timeout, connect_timeout)
        .context("Failed to create Study Buddy client")?;

    let state = match &cli.command {
        Commands::Synthetic {
            num_subjects,
            dataset_type,
            domain,
            therapeutic_area,
            data_format,
            fields,
        } => {
            let payload = collect_fields(
                &[
                    ("dataset_type", dataset_type.as_ref()),
                    ("domain", domain.as_ref()),
                    ("num_subjects", Some(num_subjects)),
                    ("therapeutic_area", therapeutic_area.as_ref()),
                    ("data_format", data_format.as_ref()),
                ],
                fields,
            );
            commands::submit(client, FormKind::SyntheticData, payload, &ctx).await?
        }

        Commands::RawPackage {
            num_subjects,
            domains,
            therapeutic_area,
            study_story,
            output_format,
            fields,
        } => {
            let payload = collect_fields(
                &[
                    ("num_subjects", Some(num_subjects)),
                    ("therapeutic_area", therapeutic_area.as_ref()),
                    ("domains", Some(domains)),
                    ("study_story", study_story.as_ref()),
                    ("output_format", output_format.as_ref()),
                ],
                fields,
            );
            commands::submit(client, FormKind::RawDatasetPackage, payload, &ctx).await?
        }

        Commands::AnalysisCode {
            language,
            dataset_path,
            output_type,
            treatment_var,
            fields,
        } => {
            let payload = collect_fields(
                &[
                    ("language", language.as_ref()),
                    ("dataset_path", dataset_path.as_ref()),
                    ("output_type", output_type.as_ref()),
                    ("treatment_var", treatment_var.as_ref()),
                ],
                fields,
            );
            commands::submit(client, FormKind::AnalysisCode, payload, &ctx).await?
        }

        Commands::Ping => {
            return Ok(if commands::ping(&client, &ctx).await? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
    };

    Ok(exit_code(state))
}

/// Resolve the merged output setting, which may come from the config file
fn resolve_format(output: &str) -> Result<OutputFormat> {
    OutputFormat::from_str(output, true)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Invalid output format '{}' (expected text or json)", output))
}

/// Exit code for a finished submission
fn exit_code(state: SubmissionState) -> ExitCode {
    match state {
        SubmissionState::Success => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_raw_package_args() {
        let cli = Cli::try_parse_from([
            "studybuddy",
            "--server",
            "http://127.0.0.1:9000",
            "raw-package",
            "--num-subjects",
            "20",
            "--domains",
            "DM, AE",
            "-f",
            "study_story=none",
        ])
        .unwrap();

        assert_eq!(cli.server.as_deref(), Some("http://127.0.0.1:9000"));
        match cli.command {
            Commands::RawPackage {
                num_subjects,
                domains,
                fields,
                ..
            } => {
                assert_eq!(num_subjects, "20");
                assert_eq!(domains, "DM, AE");
                assert_eq!(
                    fields,
                    vec![("study_story".to_string(), "none".to_string())]
                );
            }
            _ => panic!("expected raw-package"),
        }
    }

    #[test]
    fn test_num_subjects_is_not_validated_by_clap() {
        // coercion errors are reported through the result display
        let cli = Cli::try_parse_from(["studybuddy", "synthetic", "--num-subjects", "lots"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_resolve_format() {
        assert_eq!(resolve_format("json").unwrap(), OutputFormat::Json);
        assert_eq!(resolve_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(resolve_format("text").unwrap(), OutputFormat::Text);

        let err = resolve_format("yaml").unwrap_err();
        assert!(err.to_string().starts_with("Invalid output format 'yaml'"));
    }

    #[test]
    fn test_bad_field_is_rejected() {
        let cli = Cli::try_parse_from([
            "studybuddy",
            "analysis-code",
            "--field",
            "no-equals-sign",
        ]);
        assert!(cli.is_err());
    }
}
