//! The in-memory store: service -> user -> index.
//!
//! Only nonces live here.  Passphrases are never stored; they are
//! regenerated from the master secret and an [`Item`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::{Result, SesameError};

/// Service name of the bookkeeping entry created with every cave.
pub const SENTINEL_SERVICE: &str = "sesame";

/// User name of the bookkeeping entry.
pub const SENTINEL_USER: &str = "cave";

/// Sorted view of a store's contents.
pub type Index = BTreeMap<String, BTreeMap<String, i64>>;

/// Returns `true` if `service` names the sentinel entry (case-insensitive).
pub fn is_sentinel(service: &str) -> bool {
    service.eq_ignore_ascii_case(SENTINEL_SERVICE)
}

/// One entry of the store.
///
/// Its JSON form, `{"service":..,"user":..,"index":..}`, is the input to
/// passphrase derivation, so the field order is part of the format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub service: String,
    pub user: String,
    pub index: i64,
}

/// An entry together with the passphrase it produces.
#[derive(Debug)]
pub struct Revealed {
    pub item: Item,
    pub passphrase: Zeroizing<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    services: Index,
}

impl Store {
    /// Parse a decrypted store.
    ///
    /// Malformed content is reported exactly like a failed decryption.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|_| SesameError::Crypto)
    }

    pub fn to_json(&self) -> Result<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| SesameError::SerializationError(format!("store: {e}")))
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn as_index(&self) -> &Index {
        &self.services
    }

    /// Index of the sentinel entry, if the store has one.
    pub fn sentinel_index(&self) -> Option<i64> {
        self.services
            .get(SENTINEL_SERVICE)
            .and_then(|users| users.get(SENTINEL_USER))
            .copied()
    }

    /// `true` iff `service` has exactly one user.
    pub fn unique(&self, service: &str) -> Result<bool> {
        let users = self
            .services
            .get(service)
            .ok_or(SesameError::EntryNotFound)?;
        Ok(users.len() == 1)
    }

    /// Look up an entry.  Without a user the service must be unique.
    pub fn find(&self, service: &str, user: Option<&str>) -> Result<Item> {
        let users = self
            .services
            .get(service)
            .ok_or(SesameError::EntryNotFound)?;

        let (user, index) = match user {
            Some(user) => users
                .get_key_value(user)
                .ok_or(SesameError::EntryNotFound)?,
            None => {
                if users.len() != 1 {
                    return Err(SesameError::Ambiguous(service.to_string()));
                }
                users.iter().next().ok_or(SesameError::EntryNotFound)?
            }
        };

        Ok(Item {
            service: service.to_string(),
            user: user.clone(),
            index: *index,
        })
    }

    /// Check that `service`/`user` may be added.
    ///
    /// The sentinel may only be the first entry of an empty store.
    pub fn check_new(&self, service: &str, user: &str) -> Result<()> {
        if is_sentinel(service) && !self.is_empty() {
            return Err(SesameError::Sentinel("insert"));
        }
        if service.trim().is_empty() {
            return Err(SesameError::Blank("Service"));
        }
        if user.trim().is_empty() {
            return Err(SesameError::Blank("User"));
        }
        let exists = self
            .services
            .get(service)
            .is_some_and(|users| users.contains_key(user));
        if exists {
            return Err(SesameError::EntryExists);
        }
        Ok(())
    }

    /// Add a new entry after validating it with [`Store::check_new`].
    pub fn insert(&mut self, service: &str, user: &str, index: i64) -> Result<()> {
        self.check_new(service, user)?;
        self.put(service, user, index);
        Ok(())
    }

    /// Set an entry's index, creating it if needed.  No validation.
    pub fn put(&mut self, service: &str, user: &str, index: i64) {
        self.services
            .entry(service.to_string())
            .or_default()
            .insert(user.to_string(), index);
    }

    /// Remove an entry, dropping its service once it has no users left.
    pub fn remove(&mut self, service: &str, user: &str) -> Result<()> {
        let users = self
            .services
            .get_mut(service)
            .ok_or(SesameError::EntryNotFound)?;
        users.remove(user).ok_or(SesameError::EntryNotFound)?;
        if users.is_empty() {
            self.services.remove(service);
        }
        Ok(())
    }
}
