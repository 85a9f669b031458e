//! Authentication service.
//!
//! A stand-in for a real identity provider: accounts come from an injected
//! [`CredentialTable`], and a successful login writes the login flags to the
//! store so every other part of the storefront can see them.

mod error;

pub use error::AuthError;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use mass_market_core::{Email, Role};

use crate::models::AuthState;
use crate::storage::KeyValueStore;

/// One account in the credential table.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "CredentialRecord")]
pub struct Credential {
    pub email: Email,
    password: SecretString,
    pub role: Role,
}

impl Credential {
    #[must_use]
    pub fn new(email: Email, password: impl Into<String>, role: Role) -> Self {
        Self {
            email,
            password: SecretString::from(password.into()),
            role,
        }
    }

    fn password_matches(&self, candidate: &str) -> bool {
        self.password.expose_secret() == candidate
    }
}

#[derive(Deserialize)]
struct CredentialRecord {
    email: Email,
    password: String,
    role: Role,
}

impl From<CredentialRecord> for Credential {
    fn from(record: CredentialRecord) -> Self {
        Self::new(record.email, record.password, record.role)
    }
}

/// A short login name standing in for an account's email.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Alias {
    pub alias: String,
    pub email: Email,
}

/// Accounts that may log in, plus login aliases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialTable {
    #[serde(default)]
    accounts: Vec<Credential>,
    #[serde(default)]
    aliases: Vec<Alias>,
}

impl CredentialTable {
    #[must_use]
    pub const fn new(accounts: Vec<Credential>, aliases: Vec<Alias>) -> Self {
        Self { accounts, aliases }
    }

    #[must_use]
    pub fn accounts(&self) -> &[Credential] {
        &self.accounts
    }

    #[must_use]
    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// First account, in table order, whose email or alias equals
    /// `identifier` and whose password equals `password`.
    #[must_use]
    pub fn lookup(&self, identifier: &str, password: &str) -> Option<&Credential> {
        self.accounts.iter().find(|account| {
            self.identifies(identifier, account) && account.password_matches(password)
        })
    }

    fn identifies(&self, identifier: &str, account: &Credential) -> bool {
        account.email.as_str() == identifier
            || self
                .aliases
                .iter()
                .any(|alias| alias.alias == identifier && alias.email == account.email)
    }
}

/// Authentication service.
///
/// Handles login, logout and reading the current login state.
pub struct AuthService<'a> {
    store: &'a dyn KeyValueStore,
    credentials: &'a CredentialTable,
    latency: Duration,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        store: &'a dyn KeyValueStore,
        credentials: &'a CredentialTable,
        latency: Duration,
    ) -> Self {
        Self {
            store,
            credentials,
            latency,
        }
    }

    /// Log in with an email (or alias) and password.
    ///
    /// Waits the simulated latency before checking. On success the login
    /// flags are persisted and the new state is returned.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account matches.
    /// Returns `AuthError::Storage` if the login flags cannot be written.
    #[instrument(skip(self, password))]
    pub async fn attempt_login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<AuthState, AuthError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let Some(account) = self.credentials.lookup(identifier.trim(), password) else {
            warn!("Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        let state = AuthState::logged_in(account.role, account.email.clone());
        state.write(self.store)?;
        info!(email = %account.email, role = %account.role, "Login successful");
        Ok(state)
    }

    /// Clear the login flags.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be written.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        AuthState::erase(self.store)?;
        info!("Logged out");
        Ok(())
    }

    /// The persisted login state.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read.
    pub fn current(&self) -> Result<AuthState, AuthError> {
        Ok(AuthState::read(self.store)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, keys};

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    fn table() -> CredentialTable {
        CredentialTable::new(
            vec![
                Credential::new(email("user@example.com"), "user", Role::User),
                Credential::new(email("admin@example.com"), "admin", Role::Admin),
                Credential::new(email("user@user.com"), "user", Role::User),
                Credential::new(email("admin@admin.com"), "admin", Role::Admin),
            ],
            vec![
                Alias {
                    alias: "user".into(),
                    email: email("user@example.com"),
                },
                Alias {
                    alias: "admin".into(),
                    email: email("admin@example.com"),
                },
            ],
        )
    }

    #[tokio::test]
    async fn test_login_persists_flags() {
        let store = MemoryStore::new();
        let credentials = table();
        let auth = AuthService::new(&store, &credentials, Duration::ZERO);

        let state = auth.attempt_login("user@user.com", "user").await.unwrap();
        assert!(state.is_logged_in);
        assert_eq!(state.role, Some(Role::User));

        assert_eq!(store.get(keys::IS_LOGGED_IN).unwrap().as_deref(), Some("true"));
        assert_eq!(store.get(keys::USER_ROLE).unwrap().as_deref(), Some("user"));
        assert_eq!(store.get(keys::USER_EMAIL).unwrap().as_deref(), Some("user@user.com"));
        assert_eq!(auth.current().unwrap(), state);
    }

    #[tokio::test]
    async fn test_wrong_password_fails_and_writes_nothing() {
        let store = MemoryStore::new();
        let credentials = table();
        let auth = AuthService::new(&store, &credentials, Duration::ZERO);

        let err = auth.attempt_login("user@user.com", "admin").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(store.is_empty());
        assert!(!auth.current().unwrap().is_logged_in);
    }

    #[tokio::test]
    async fn test_alias_logs_in_as_aliased_account() {
        let store = MemoryStore::new();
        let credentials = table();
        let auth = AuthService::new(&store, &credentials, Duration::ZERO);

        let state = auth.attempt_login("admin", "admin").await.unwrap();
        assert_eq!(state.role, Some(Role::Admin));
        assert_eq!(state.email.unwrap().as_str(), "admin@example.com");
    }

    #[test]
    fn test_alias_only_covers_its_own_account() {
        let credentials = table();
        // "user" aliases user@example.com, not user@user.com, and the
        // password still has to match.
        let account = credentials.lookup("user", "user").unwrap();
        assert_eq!(account.email.as_str(), "user@example.com");
        assert!(credentials.lookup("user", "admin").is_none());
        assert!(credentials.lookup("nobody", "user").is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_flags() {
        let store = MemoryStore::new();
        let credentials = table();
        let auth = AuthService::new(&store, &credentials, Duration::ZERO);
        auth.attempt_login("user", "user").await.unwrap();

        auth.logout().unwrap();
        assert!(store.is_empty());
        assert_eq!(auth.current().unwrap(), AuthState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_simulated_latency() {
        let store = MemoryStore::new();
        let credentials = table();
        let auth = AuthService::new(&store, &credentials, Duration::from_millis(800));

        let started = tokio::time::Instant::now();
        auth.attempt_login("user", "user").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(800));
    }

    #[test]
    fn test_table_deserializes_from_yaml() {
        let yaml = "
accounts:
  - email: user@user.com
    password: user
    role: user
aliases:
  - alias: u
    email: user@user.com
";
        let credentials: CredentialTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(credentials.accounts().len(), 1);
        assert!(credentials.lookup("u", "user").is_some());
    }
}
