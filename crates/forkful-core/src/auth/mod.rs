//! Credential access for the favorites backend.

use std::fmt;

/// Supplies the bearer token for remote favorite calls.
///
/// A missing credential is a transient condition (the user may simply not
/// have signed in yet); callers defer their work and retry later rather than
/// failing permanently.
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, if any
    fn credential(&self) -> Option<String>;
}

/// Fixed-token provider for tests and one-shot invocations.
#[derive(Clone)]
pub struct StaticCredential {
    token: String,
}

impl StaticCredential {
    /// Wrap an already-issued bearer token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

impl fmt::Debug for StaticCredential {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StaticCredential")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Provider for the signed-out state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredential;

impl CredentialProvider for NoCredential {
    fn credential(&self) -> Option<String> {
        None
    }
}
