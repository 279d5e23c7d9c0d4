//! CLI command implementations

pub mod check;
pub mod diff;
pub mod profiles;

use std::time::Duration;

use crate::error::{CliError, CliResult};

/// Validate a `--timeout-secs` flag; a zero timeout would fail every request.
pub(crate) fn timeout_flag(secs: u64) -> CliResult<Duration> {
    if secs == 0 {
        return Err(CliError::Config(
            "--timeout-secs must be at least 1".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}
