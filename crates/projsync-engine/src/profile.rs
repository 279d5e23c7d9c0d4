//! Connection profiles and the seam through which they are resolved.
//!
//! The engine never reads credential storage itself; the caller hands it a
//! [`ProfileResolver`].

use std::collections::HashMap;
use std::fmt;

use projsync_access::BearerToken;

/// How a profile authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(BearerToken),
    /// Basic credentials. Recognised so they can be refused up front.
    Password { user: String },
}

impl Credentials {
    /// Short label for listings.
    pub fn style(&self) -> &'static str {
        match self {
            Credentials::Token(_) => "token",
            Credentials::Password { .. } => "password",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(token) => f.debug_tuple("Token").field(token).finish(),
            Credentials::Password { user } => f
                .debug_struct("Password")
                .field("user", user)
                .finish_non_exhaustive(),
        }
    }
}

/// A named system: where it lives and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    pub name: String,
    pub base_url: String,
    pub credentials: Credentials,
}

impl ConnectionProfile {
    pub fn with_token(
        name: impl Into<String>,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            credentials: Credentials::Token(BearerToken::new(token)),
        }
    }
}

/// Errors raised while resolving a profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("unknown profile '{0}'")]
    Unknown(String),

    #[error("profile store unavailable: {0}")]
    Store(String),
}

/// Resolves a profile name to connection details.
pub trait ProfileResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<ConnectionProfile, ProfileError>;
}

/// Fixed set of profiles held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticProfiles {
    profiles: HashMap<String, ConnectionProfile>,
}

impl StaticProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, profile: ConnectionProfile) -> Self {
        self.profiles.insert(profile.name.clone(), profile);
        self
    }
}

impl ProfileResolver for StaticProfiles {
    fn resolve(&self, name: &str) -> Result<ConnectionProfile, ProfileError> {
        self.profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ProfileError::Unknown(name.to_string()))
    }
}
