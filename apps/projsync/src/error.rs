//! CLI error types and exit codes

use thiserror::Error;

use projsync_access::AccessError;
use projsync_engine::{ConfigError, InvocationError, ProfileError};

/// Exit codes for the CLI
/// - 0: Converged without failures
/// - 1: Run completed with failed resources
/// - 2: Configuration error
/// - 3: Network error
/// - 130: Cancelled
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Invocation(#[from] InvocationError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{failed} resource(s) failed to converge")]
    Failures { failed: usize },

    #[error("Cancelled before the run completed")]
    Cancelled,
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Failures { .. } => 1,
            CliError::Config(_) | CliError::Invocation(_) => 2,
            CliError::Network(_) => 3,
            CliError::Cancelled => 130,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Invocation(InvocationError::Profile(ProfileError::Unknown(_))) => {
                Some("Run 'projsync profiles' to list configured profiles.")
            }
            CliError::Invocation(InvocationError::PasswordAuth(_)) => {
                Some("Add an access_token to the profile in profiles.json.")
            }
            CliError::Network(_) => Some("Check that the server URL is reachable and try again."),
            CliError::Failures { .. } => {
                Some("Re-run the same command; converged resources are simply updated again.")
            }
            _ => None,
        }
    }
}

impl From<ProfileError> for CliError {
    fn from(e: ProfileError) -> Self {
        CliError::Invocation(InvocationError::Profile(e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<AccessError> for CliError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::InvalidConfig(message) => CliError::Config(message),
            other => CliError::Network(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Config(format!("I/O error: {}", e))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(format!("JSON error: {}", e))
    }
}
