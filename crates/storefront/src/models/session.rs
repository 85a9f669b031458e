//! Login state.
//!
//! The login flags live in the store under three keys
//! ([`IS_LOGGED_IN`](crate::storage::keys::IS_LOGGED_IN),
//! [`USER_ROLE`](crate::storage::keys::USER_ROLE),
//! [`USER_EMAIL`](crate::storage::keys::USER_EMAIL)). They never expire.

use tracing::warn;

use mass_market_core::{Email, Role};

use crate::storage::{KeyValueStore, StorageError, keys};

/// Persisted value of `isLoggedIn` while logged in.
pub const LOGGED_IN: &str = "true";

/// Who is logged in, if anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub is_logged_in: bool,
    pub role: Option<Role>,
    pub email: Option<Email>,
}

impl AuthState {
    /// A logged-in state.
    #[must_use]
    pub const fn logged_in(role: Role, email: Email) -> Self {
        Self {
            is_logged_in: true,
            role: Some(role),
            email: Some(email),
        }
    }

    /// Read the login flags from `store`.
    ///
    /// `isLoggedIn` must be exactly `"true"`. A role or email that does not
    /// parse is dropped with a warning; the flag alone decides whether the
    /// shopper counts as logged in.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn read(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        let is_logged_in = store.get(keys::IS_LOGGED_IN)?.as_deref() == Some(LOGGED_IN);
        if !is_logged_in {
            return Ok(Self::default());
        }

        let role = store.get(keys::USER_ROLE)?.and_then(|raw| {
            raw.parse::<Role>()
                .map_err(|e| warn!(error = %e, "Ignoring stored role"))
                .ok()
        });
        let email = store.get(keys::USER_EMAIL)?.and_then(|raw| {
            Email::parse(&raw)
                .map_err(|e| warn!(error = %e, "Ignoring stored email"))
                .ok()
        });

        Ok(Self {
            is_logged_in,
            role,
            email,
        })
    }

    /// Persist the three login keys.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub fn write(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        if !self.is_logged_in {
            return Self::erase(store);
        }
        store.set(keys::IS_LOGGED_IN, LOGGED_IN)?;
        match self.role {
            Some(role) => store.set(keys::USER_ROLE, role.as_str())?,
            None => store.remove(keys::USER_ROLE)?,
        }
        match &self.email {
            Some(email) => store.set(keys::USER_EMAIL, email.as_str()),
            None => store.remove(keys::USER_EMAIL),
        }
    }

    /// Remove the three login keys.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub fn erase(store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.remove(keys::IS_LOGGED_IN)?;
        store.remove(keys::USER_ROLE)?;
        store.remove(keys::USER_EMAIL)
    }

    /// Whether the logged-in account is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_logged_in && self.role == Some(Role::Admin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_empty_store_is_logged_out() {
        let state = AuthState::read(&MemoryStore::new()).unwrap();
        assert_eq!(state, AuthState::default());
        assert!(!state.is_admin());
    }

    #[test]
    fn test_flag_must_be_exactly_true() {
        let store = MemoryStore::with_entries([
            (keys::IS_LOGGED_IN, "TRUE"),
            (keys::USER_ROLE, "admin"),
            (keys::USER_EMAIL, "admin@admin.com"),
        ]);
        assert!(!AuthState::read(&store).unwrap().is_logged_in);
    }

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::new();
        let state = AuthState::logged_in(Role::Admin, Email::parse("admin@admin.com").unwrap());
        state.write(&store).unwrap();

        assert_eq!(store.get(keys::IS_LOGGED_IN).unwrap().as_deref(), Some("true"));
        assert_eq!(store.get(keys::USER_ROLE).unwrap().as_deref(), Some("admin"));
        let read = AuthState::read(&store).unwrap();
        assert_eq!(read, state);
        assert!(read.is_admin());
    }

    #[test]
    fn test_unparsable_role_is_dropped() {
        let store = MemoryStore::with_entries([
            (keys::IS_LOGGED_IN, "true"),
            (keys::USER_ROLE, "owner"),
            (keys::USER_EMAIL, "user@user.com"),
        ]);
        let state = AuthState::read(&store).unwrap();
        assert!(state.is_logged_in);
        assert_eq!(state.role, None);
        assert_eq!(state.email.unwrap().as_str(), "user@user.com");
    }

    #[test]
    fn test_erase_removes_all_keys() {
        let store = MemoryStore::new();
        AuthState::logged_in(Role::User, Email::parse("user@user.com").unwrap())
            .write(&store)
            .unwrap();
        AuthState::erase(&store).unwrap();

        assert_eq!(store.get(keys::IS_LOGGED_IN).unwrap(), None);
        assert_eq!(store.get(keys::USER_ROLE).unwrap(), None);
        assert_eq!(store.get(keys::USER_EMAIL).unwrap(), None);
    }
}
