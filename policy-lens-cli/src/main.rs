//! Command-line entry point for policy-lens.
//!
//! Exit codes: 0 when the analysis ran clean, 1 when it produced
//! findings (any statement overlap, any high-severity boundary
//! discrepancy), 2 on error.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use policy_lens_analysis::{
    render_boundaries, render_diagram, render_overlap, OutputFormat, PolicyLensService,
};

#[derive(Parser)]
#[command(
    name = "policy-lens",
    version,
    about = "Validate and analyze platform permission policies and boundaries"
)]
struct Cli {
    /// Path to the app configuration directory
    #[arg(long, global = true, default_value = ".", value_name = "PATH")]
    app_dir: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    output: Output,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    Text,
    Json,
}

impl From<Output> for OutputFormat {
    fn from(output: Output) -> Self {
        match output {
            Output::Text => Self::Text,
            Output::Json => Self::Json,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Check for overlapping IAM actions across policy statements
    CheckOverlap {
        /// Permission TOML file name, resolved under permissions/
        permission_file: String,
    },
    /// Compare permission boundaries across lifecycle stages
    CheckBoundaries,
    /// Generate a Mermaid dependency diagram of platform components
    GenerateDiagram {
        /// Directory containing component TOML files
        components_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Run the selected command; returns whether it produced findings.
fn run(cli: &Cli) -> Result<bool> {
    let service = PolicyLensService::new(cli.app_dir.clone())?;
    let format: OutputFormat = cli.output.into();
    match &cli.command {
        Command::CheckOverlap { permission_file } => {
            log::debug!("check-overlap {permission_file}");
            let report = service.check_overlap(permission_file)?;
            println!("{}", render_overlap(&report, format)?);
            Ok(report.has_findings())
        }
        Command::CheckBoundaries => {
            let report = service.check_boundaries()?;
            println!("{}", render_boundaries(&report, format)?);
            Ok(report.has_high_findings())
        }
        Command::GenerateDiagram { components_dir } => {
            let graph = service.generate_diagram(components_dir)?;
            println!("{}", render_diagram(&graph, format)?);
            Ok(false)
        }
    }
}
