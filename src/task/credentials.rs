//! Per-user API tokens.
//!
//! The secrets file is TOML with one table per user:
//! ```toml
//! [user1]
//! name = "홍길동"
//! Dooray_token = "..."
//! ```

use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

use crate::error::{DigestError, Result};

/// A user and the token they publish with.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub name: String,
    token: String,
}

impl std::fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredential")
            .field("name", &self.name)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Lookup of API tokens by user name.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: Vec<UserCredential>,
}

impl CredentialStore {
    /// Load the secrets file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DigestError::Credential(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Load the secrets file, treating a missing file as an empty store.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Secrets file not found; no users available");
                Ok(Self::default())
            }
            Err(e) => Err(DigestError::Credential(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Parse secrets from a TOML string.
    ///
    /// Tables without a string `name` are ignored. A user without a
    /// `Dooray_token` is kept with an empty token.
    pub fn parse(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| DigestError::Credential(format!("invalid secrets file: {}", e)))?;

        let users = table
            .values()
            .filter_map(|value| value.as_table())
            .filter_map(|user| {
                let name = user.get("name")?.as_str()?.to_string();
                let token = user
                    .get("Dooray_token")
                    .and_then(|t| t.as_str())
                    .unwrap_or_default()
                    .to_string();
                Some(UserCredential { name, token })
            })
            .collect();

        Ok(Self { users })
    }

    /// Build a store from `(name, token)` pairs.
    pub fn from_pairs<I, N, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            users: pairs
                .into_iter()
                .map(|(name, token)| UserCredential {
                    name: name.into(),
                    token: token.into(),
                })
                .collect(),
        }
    }

    /// Names of all known users.
    pub fn user_names(&self) -> Vec<&str> {
        self.users.iter().map(|u| u.name.as_str()).collect()
    }

    /// Whether no user is configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Token of `user_name`. Fails if the user is unknown or has no token.
    pub fn token_for(&self, user_name: &str) -> Result<&str> {
        self.users
            .iter()
            .find(|u| u.name == user_name)
            .map(|u| u.token.trim())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                DigestError::Credential(format!("no Dooray token for user '{}'", user_name))
            })
    }
}
