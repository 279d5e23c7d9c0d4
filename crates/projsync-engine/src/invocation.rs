//! Entry point used by callers: validate the request, connect both systems,
//! run the sweep.
//!
//! Every configuration problem is raised here, before the first remote call.

use tokio_util::sync::CancellationToken;
use tracing::info;

use projsync_access::{AccessClient, AccessError, RetryingClient};

use crate::mode::{SweepMode, UnknownMode};
use crate::profile::{ConnectionProfile, Credentials, ProfileError, ProfileResolver};
use crate::reconciler::Reconciler;
use crate::report::ConvergenceReport;
use crate::settings::EngineSettings;

/// What the caller asked for, as typed by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub mode: String,
    pub source: String,
    pub destination: String,
}

impl InvocationRequest {
    pub fn new(
        mode: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            mode: mode.into(),
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Configuration errors that stop a run before it starts.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error(transparent)]
    Mode(#[from] UnknownMode),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("profile '{0}' uses password authentication; only access tokens are supported")]
    PasswordAuth(String),

    #[error("profile '{0}' has no access token")]
    MissingToken(String),

    #[error("profile '{profile}' is not usable: {error}")]
    Connection {
        profile: String,
        #[source]
        error: AccessError,
    },
}

/// Build a client for one profile, refusing anything but token auth.
pub fn connect(
    profile: &ConnectionProfile,
    settings: &EngineSettings,
) -> Result<AccessClient, InvocationError> {
    let token = match &profile.credentials {
        Credentials::Token(token) if token.is_empty() => {
            return Err(InvocationError::MissingToken(profile.name.clone()));
        }
        Credentials::Token(token) => token.clone(),
        Credentials::Password { .. } => {
            return Err(InvocationError::PasswordAuth(profile.name.clone()));
        }
    };

    AccessClient::with_user_agent(
        &profile.base_url,
        token,
        settings.request_timeout,
        &settings.user_agent,
    )
    .map_err(|error| InvocationError::Connection {
        profile: profile.name.clone(),
        error,
    })
}

/// Validate `request`, then reconcile the destination toward the source.
///
/// Validation order is mode, then profile resolution, then credentials, so a
/// bad mode is reported even when the profiles are also wrong.
pub async fn invoke(
    request: &InvocationRequest,
    resolver: &dyn ProfileResolver,
    settings: &EngineSettings,
    cancel: CancellationToken,
) -> Result<ConvergenceReport, InvocationError> {
    let mode: SweepMode = request.mode.parse()?;

    let source_profile = resolver.resolve(&request.source)?;
    let destination_profile = resolver.resolve(&request.destination)?;

    let source = RetryingClient::new(connect(&source_profile, settings)?, settings.retry.clone());
    let destination = RetryingClient::new(
        connect(&destination_profile, settings)?,
        settings.retry.clone(),
    );

    info!(
        %mode,
        source = %source_profile.name,
        destination = %destination_profile.name,
        timeout_secs = settings.request_timeout.as_secs(),
        max_retries = settings.retry.max_retries,
        "Profiles resolved"
    );

    let report = Reconciler::new(&source, &destination)
        .with_cancellation(cancel)
        .run(mode)
        .await;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_rejects_password_profile() {
        let profile = ConnectionProfile {
            name: "legacy".into(),
            base_url: "https://legacy.example.com".into(),
            credentials: Credentials::Password {
                user: "admin".into(),
            },
        };
        let err = connect(&profile, &EngineSettings::default()).unwrap_err();
        assert!(matches!(err, InvocationError::PasswordAuth(ref p) if p == "legacy"));
    }

    #[test]
    fn test_connect_rejects_blank_token() {
        let profile = ConnectionProfile::with_token("blank", "https://a.example.com", "  ");
        let err = connect(&profile, &EngineSettings::default()).unwrap_err();
        assert!(matches!(err, InvocationError::MissingToken(_)));
    }

    #[test]
    fn test_connect_rejects_bad_url() {
        let profile = ConnectionProfile::with_token("typo", "not a url", "tok");
        let err = connect(&profile, &EngineSettings::default()).unwrap_err();
        assert!(matches!(err, InvocationError::Connection { .. }));
        assert!(err.to_string().contains("typo"));
    }

    #[test]
    fn test_connect_uses_profile_url() {
        let profile = ConnectionProfile::with_token("dr", "https://dr.example.com/", "tok");
        let client = connect(&profile, &EngineSettings::default()).unwrap();
        assert_eq!(client.base_url(), "https://dr.example.com/");
    }
}
