//! File-backed connection profiles (`profiles.json`).
//!
//! ```json
//! {"servers": [{"server_id": "dr", "url": "https://dr.example.com", "access_token": "..."}]}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use projsync_engine::{ConnectionProfile, Credentials, ProfileError, ProfileResolver};
use projsync_access::BearerToken;

use crate::config::ConfigPaths;
use crate::error::CliResult;

/// One configured server.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerEntry {
    pub server_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ServerEntry {
    /// A non-blank access token takes precedence over basic credentials.
    pub fn credentials(&self) -> Credentials {
        match (&self.access_token, &self.user) {
            (Some(token), _) if !token.trim().is_empty() => {
                Credentials::Token(BearerToken::new(token.clone()))
            }
            (_, Some(user)) => Credentials::Password { user: user.clone() },
            _ => Credentials::Token(BearerToken::new(String::new())),
        }
    }

    pub fn to_profile(&self) -> ConnectionProfile {
        ConnectionProfile {
            name: self.server_id.clone(),
            base_url: self.url.clone(),
            credentials: self.credentials(),
        }
    }
}

impl fmt::Debug for ServerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ServerEntry")
            .field("server_id", &self.server_id)
            .field("url", &self.url)
            .field("access_token", &redact(&self.access_token))
            .field("user", &self.user)
            .field("password", &redact(&self.password))
            .finish()
    }
}

/// All configured servers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileStore {
    #[serde(default)]
    pub servers: Vec<ServerEntry>,
}

impl ProfileStore {
    /// Load profiles; a missing file is an empty store.
    pub fn load(paths: &ConfigPaths) -> CliResult<Self> {
        if !paths.profiles_file.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&paths.profiles_file)?;
        let store: ProfileStore = serde_json::from_str(&content)?;
        Ok(store)
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn get(&self, server_id: &str) -> Option<&ServerEntry> {
        self.servers.iter().find(|s| s.server_id == server_id)
    }
}

impl ProfileResolver for ProfileStore {
    fn resolve(&self, name: &str) -> Result<ConnectionProfile, ProfileError> {
        self.get(name)
            .map(ServerEntry::to_profile)
            .ok_or_else(|| ProfileError::Unknown(name.to_string()))
    }
}
