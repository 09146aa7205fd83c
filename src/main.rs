use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use covsum::config::{self, Config};
use covsum::console;
use covsum::{
    exit_code, CoberturaFile, CoverageSource, Messages, RunDetails, Runner, SampleCoverage,
    SinkTarget, StepSummaryFile, FAILURE_EXIT_CODE,
};

const CONFIG_FILE: &str = "covsum.toml";
const DEFAULT_INPUT: &str = "coverage.xml";

#[derive(Parser)]
#[command(name = "covsum")]
#[command(about = "Publish Cobertura coverage as an HTML table in the CI job summary")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (default: covsum.toml, if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Message catalog overriding the built-in one
    #[arg(long, global = true)]
    messages: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a Cobertura XML report
    Report {
        /// Report path or glob pattern (default: coverage.xml)
        input: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Summarize the built-in sample coverage run
    Sample {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// File to append the summary to (default: $GITHUB_STEP_SUMMARY)
    #[arg(long, conflicts_with = "stdout")]
    summary_file: Option<PathBuf>,

    /// Print the summary instead of writing the job summary file
    #[arg(long)]
    stdout: bool,

    /// Heading placed above the coverage table
    #[arg(long)]
    heading: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let (config, messages) = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            console::error(&format!("{:#}", e));
            std::process::exit(FAILURE_EXIT_CODE);
        }
    };

    let outcome = run(cli, &config);
    match outcome {
        Ok(ref details) => {
            console::info(&format!("{}{}", messages.exit_code, details.exit_code));
        }
        Err(ref e) => {
            for line in messages.failure_report(e) {
                console::error(&line);
            }
        }
    }
    std::process::exit(exit_code(&outcome));
}

fn load_settings(cli: &Cli) -> Result<(Config, Messages)> {
    let config = match cli.config {
        Some(ref path) => Config::load(path)
            .with_context(|| format!("Could not load {}", path.display()))?,
        None if Path::new(CONFIG_FILE).is_file() => Config::load(Path::new(CONFIG_FILE))?,
        None => Config::default(),
    };

    let messages = match (&cli.messages, &config.report.messages) {
        (Some(path), _) => Messages::load(path)?,
        (None, Some(raw)) => Messages::load(&config::expand_path(raw)?)?,
        (None, None) => Messages::default(),
    };

    Ok((config, messages))
}

fn run(cli: Cli, config: &Config) -> Result<RunDetails> {
    match cli.command {
        Commands::Report { input, output } => {
            let raw = input
                .or_else(|| config.report.input.clone())
                .unwrap_or_else(|| DEFAULT_INPUT.to_string());
            let path = config::resolve_input(&raw)?;
            console::info(&format!("Reading coverage report {}", path.display()));

            let source = CoberturaFile::new(path);
            cmd_summarize(config, &source, &output)
        }
        Commands::Sample { output } => cmd_summarize(config, &SampleCoverage, &output),
    }
}

fn cmd_summarize(config: &Config, source: &dyn CoverageSource, output: &OutputArgs) -> Result<RunDetails> {
    let heading = output
        .heading
        .clone()
        .unwrap_or_else(|| config.report.heading.clone());
    let target = SinkTarget::select(
        output.stdout,
        output.summary_file.as_deref(),
        config.report.summary_file.as_deref(),
        StepSummaryFile::from_env(),
    )?;

    if target.uses_stdout() {
        console::reserve_stdout();
    }
    match target {
        SinkTarget::StepSummary(ref path) => {
            console::info(&format!("Writing job summary to {}", path.display()))
        }
        SinkTarget::Unset => {
            console::warn("GITHUB_STEP_SUMMARY is not set, printing the summary to stdout")
        }
        _ => {}
    }

    let mut sink = target.open();
    Runner::new(&heading).run(source, sink.as_mut())
}
