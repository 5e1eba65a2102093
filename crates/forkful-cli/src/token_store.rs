//! Keychain-backed API token persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use forkful_core::auth::CredentialProvider;

use crate::error::CliError;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "forkful-cli";
const TOKEN_ENTRY_NAME: &str = "favorites_api_token";

/// Stores the favorites API bearer token in the OS keychain.
#[derive(Clone, Default)]
pub struct TokenStore;

impl TokenStore {
    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry() -> Result<Entry, CliError> {
        Entry::new(KEYRING_SERVICE_NAME, TOKEN_ENTRY_NAME)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    #[cfg(not(test))]
    pub fn load_token(&self) -> Result<Option<String>, CliError> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(CliError::Auth(error.to_string())),
        }
    }

    #[cfg(test)]
    pub fn load_token(&self) -> Result<Option<String>, CliError> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        Ok(guard.get(TOKEN_ENTRY_NAME).cloned())
    }

    #[cfg(not(test))]
    pub fn save_token(&self, token: &str) -> Result<(), CliError> {
        Self::entry()?
            .set_password(token)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    #[cfg(test)]
    pub fn save_token(&self, token: &str) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        guard.insert(TOKEN_ENTRY_NAME.to_string(), token.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    pub fn clear_token(&self) -> Result<(), CliError> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(CliError::Auth(error.to_string())),
        }
    }

    #[cfg(test)]
    pub fn clear_token(&self) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        guard.remove(TOKEN_ENTRY_NAME);
        Ok(())
    }
}

impl CredentialProvider for TokenStore {
    fn credential(&self) -> Option<String> {
        self.load_token().ok().flatten()
    }
}
