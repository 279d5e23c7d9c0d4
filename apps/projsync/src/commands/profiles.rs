//! Profiles command - List configured connection profiles

use clap::Args;

use crate::config::{ConfigPaths, ProfileStore};
use crate::error::CliResult;

/// Arguments for the profiles command
#[derive(Args, Debug)]
pub struct ProfilesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the profiles command
pub fn execute(args: ProfilesArgs, paths: &ConfigPaths) -> CliResult<()> {
    let store = ProfileStore::load(paths)?;
    print!("{}", render(&store, args.json, paths)?);
    Ok(())
}

/// Names, URLs, and auth style only; secrets are never printed.
pub fn render(store: &ProfileStore, json: bool, paths: &ConfigPaths) -> CliResult<String> {
    if json {
        let rows: Vec<_> = store
            .servers
            .iter()
            .map(|s| {
                serde_json::json!({
                    "server_id": s.server_id,
                    "url": s.url,
                    "auth": s.credentials().style(),
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&rows)? + "\n");
    }

    if store.is_empty() {
        return Ok(format!(
            "No profiles configured in {}\n",
            paths.profiles_file.display()
        ));
    }

    let width = store
        .servers
        .iter()
        .map(|s| s.server_id.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for server in &store.servers {
        out.push_str(&format!(
            "{:<width$}  {:<8}  {}\n",
            server.server_id,
            server.credentials().style(),
            server.url,
            width = width
        ));
    }
    Ok(out)
}
