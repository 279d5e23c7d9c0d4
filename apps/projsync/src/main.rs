//! projsync - keep a disaster-recovery system in line with a primary
//!
//! Copies projects, roles, and user/group memberships from a source system
//! to a destination, or removes from the destination what the source no
//! longer declares.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use projsync::commands;
use projsync::config::ConfigPaths;
use projsync::error::CliResult;
use projsync::logging::init_logging;

/// projsync - Project configuration replication
#[derive(Parser)]
#[command(name = "projsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding profiles.json
    #[arg(long, global = true, value_name = "PATH", env = "PROJSYNC_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a destination with a source
    Diff(commands::diff::DiffArgs),

    /// Verify that profiles resolve and their servers answer
    Check(commands::check::CheckArgs),

    /// List configured profiles
    Profiles(commands::profiles::ProfilesArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let paths = ConfigPaths::new(cli.config_dir.as_deref())?;

    match cli.command {
        Commands::Diff(args) => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupt received; stopping after the current call");
                    on_interrupt.cancel();
                }
            });
            commands::diff::execute(args, &paths, cancel).await
        }
        Commands::Check(args) => commands::check::execute(args, &paths).await,
        Commands::Profiles(args) => commands::profiles::execute(args, &paths),
    }
}
