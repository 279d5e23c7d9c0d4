//! Diff command - Converge a destination system toward a source
//!
//! # Usage
//!
//! Create or update everything the primary declares:
//! ```bash
//! projsync diff create primary dr
//! ```
//!
//! Remove what the primary no longer declares, as JSON for CI/CD:
//! ```bash
//! projsync diff delete primary dr --output json
//! ```

use clap::Args;
use tokio_util::sync::CancellationToken;

use projsync_engine::{
    invoke, ConvergenceReport, EngineSettings, InvocationRequest, ProfileResolver,
};

use super::timeout_flag;
use crate::config::{ConfigPaths, ProfileStore};
use crate::error::{CliError, CliResult};
use crate::output::{render, OutputFormat};

/// Reconcile a destination system with a source system
#[derive(Args, Debug)]
#[command(after_help = "EXIT CODES:
    0    Every resource converged
    1    At least one resource failed
    2    Configuration error (unknown profile or mode, password profile)
    130  Cancelled

EXAMPLES:
    # Copy projects, users, roles, and groups from primary to dr
    projsync diff create primary dr

    # Delete projects and roles that primary no longer has
    projsync diff delete primary dr --output json
")]
pub struct DiffArgs {
    /// Sweep to run: create or delete
    #[arg(value_name = "MODE")]
    pub mode: String,

    /// Profile of the system of record
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Profile of the system to converge
    #[arg(value_name = "DESTINATION")]
    pub destination: String,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Retries for transport and server errors
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,
}

impl DiffArgs {
    /// Environment settings with command-line overrides applied.
    pub fn settings(&self, base: EngineSettings) -> CliResult<EngineSettings> {
        let mut settings = base;
        if let Some(secs) = self.timeout_secs {
            settings = settings.with_timeout(timeout_flag(secs)?);
        }
        if let Some(retries) = self.max_retries {
            settings = settings.with_max_retries(retries);
        }
        Ok(settings)
    }

    pub fn request(&self) -> InvocationRequest {
        InvocationRequest::new(&self.mode, &self.source, &self.destination)
    }
}

/// Execute the diff command
pub async fn execute(
    args: DiffArgs,
    paths: &ConfigPaths,
    cancel: CancellationToken,
) -> CliResult<()> {
    let settings = args.settings(EngineSettings::from_env()?)?;
    let store = ProfileStore::load(paths)?;

    let report = run(&args, &store, &settings, cancel).await?;
    print!("{}", render(&report, args.output)?);

    outcome(&report)
}

/// Run the sweep described by `args`.
pub async fn run(
    args: &DiffArgs,
    resolver: &dyn ProfileResolver,
    settings: &EngineSettings,
    cancel: CancellationToken,
) -> CliResult<ConvergenceReport> {
    Ok(invoke(&args.request(), resolver, settings, cancel).await?)
}

/// Map a finished report onto the command result.
pub fn outcome(report: &ConvergenceReport) -> CliResult<()> {
    if report.cancelled {
        return Err(CliError::Cancelled);
    }
    match report.summary().failed {
        0 => Ok(()),
        failed => Err(CliError::Failures { failed }),
    }
}
