//! Check command - Verify that profiles resolve and their servers answer

use clap::Args;
use tracing::debug;

use projsync_engine::{connect, EngineSettings, ProfileResolver};

use super::timeout_flag;
use crate::config::{ConfigPaths, ProfileStore};
use crate::error::{CliError, CliResult};
use crate::output::use_color;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Profiles to check
    #[arg(value_name = "PROFILE", required = true, num_args = 1..)]
    pub profiles: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl CheckArgs {
    /// Environment settings with the timeout flag applied.
    pub fn settings(&self, base: EngineSettings) -> CliResult<EngineSettings> {
        match self.timeout_secs {
            Some(secs) => Ok(base.with_timeout(timeout_flag(secs)?)),
            None => Ok(base),
        }
    }
}

/// Execute the check command
pub async fn execute(args: CheckArgs, paths: &ConfigPaths) -> CliResult<()> {
    let settings = args.settings(EngineSettings::from_env()?)?;
    let store = ProfileStore::load(paths)?;

    check_profiles(&store, &settings, &args.profiles).await
}

/// Resolve every profile first, then ping each server in turn.
///
/// Resolution problems are configuration errors; an unreachable server is a
/// network error reported after all servers were tried.
pub async fn check_profiles(
    resolver: &dyn ProfileResolver,
    settings: &EngineSettings,
    names: &[String],
) -> CliResult<()> {
    let mut clients = Vec::with_capacity(names.len());
    for name in names {
        let profile = resolver.resolve(name)?;
        clients.push((name, connect(&profile, settings)?));
    }

    let mut unreachable = Vec::new();
    for (name, client) in &clients {
        debug!(profile = %name, url = client.base_url(), "Pinging");
        match client.ping().await {
            Ok(()) => report_line(true, name, client.base_url(), None),
            Err(e) => {
                report_line(false, name, client.base_url(), Some(&e.to_string()));
                unreachable.push(name.to_string());
            }
        }
    }

    if unreachable.is_empty() {
        Ok(())
    } else {
        Err(CliError::Network(format!(
            "unreachable: {}",
            unreachable.join(", ")
        )))
    }
}

fn report_line(ok: bool, name: &str, url: &str, error: Option<&str>) {
    let marker = match (ok, use_color()) {
        (true, true) => "\x1b[32m✓\x1b[0m",
        (true, false) => "OK:",
        (false, true) => "\x1b[31m✗\x1b[0m",
        (false, false) => "FAIL:",
    };
    match error {
        Some(error) => println!("{marker} {name} ({url}): {error}"),
        None => println!("{marker} {name} ({url})"),
    }
}
