// Identity provider
// Signing in yields an opaque user id. Notes are partitioned by that id.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use thiserror::Error;

/// Opaque identifier of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("sign-in cancelled by user")]
    Cancelled,
    #[error("sign-in window blocked")]
    PopupBlocked,
    #[error("network request failed")]
    Network,
    #[error("too many sign-in attempts")]
    RateLimited,
    #[error("account disabled")]
    Disabled,
    #[error("sign-in method not enabled")]
    NotAllowed,
    #[error("sign-in failed: {0}")]
    Other(String),
}

impl AuthError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::Cancelled => "Sign-in was cancelled. Please try again.",
            AuthError::PopupBlocked => "Pop-up was blocked. Please allow pop-ups and try again.",
            AuthError::Network => "Network error. Please check your connection and try again.",
            AuthError::RateLimited => "Too many sign-in attempts. Please try again later.",
            AuthError::Disabled => "This account has been disabled.",
            AuthError::NotAllowed => "Sign-in is not enabled. Please contact support.",
            AuthError::Other(_) => "An error occurred during sign-in. Please try again.",
        }
    }
}

pub trait IdentityProvider {
    fn sign_in(&self) -> Result<UserId, AuthError>;
}

type EnvLookup = fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Identity of the local account: a configured name, else the login name
pub struct LocalIdentity {
    configured: Option<String>,
    env: EnvLookup,
}

impl LocalIdentity {
    pub fn new(configured: Option<String>) -> Self {
        LocalIdentity {
            configured,
            env: process_env,
        }
    }

    /// Like `new`, reading the login name from `env` instead of the process
    pub fn with_env(configured: Option<String>, env: EnvLookup) -> Self {
        LocalIdentity { configured, env }
    }
}

impl IdentityProvider for LocalIdentity {
    fn sign_in(&self) -> Result<UserId, AuthError> {
        let name = self
            .configured
            .clone()
            .or_else(|| (self.env)("USER"))
            .or_else(|| (self.env)("USERNAME"))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        match name {
            Some(name) => {
                tracing::debug!(user = %name, "signed in locally");
                Ok(UserId::new(name))
            }
            None => {
                tracing::warn!("no local user name configured or found in the environment");
                Err(AuthError::NotAllowed)
            }
        }
    }
}
