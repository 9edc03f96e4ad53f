//! The cave: an encrypted store of nonces plus the state machine around it.
//!
//! A cave is in one of four states:
//!
//! - **unopened**: no cave file, no lock file, nothing in memory;
//! - **open**: the store and master secret are in memory;
//! - **closed**: the cave file exists, nothing in memory;
//! - **locked**: the cave file and a lock file exist, nothing in memory.
//!
//! While open, the master secret and store live in a `Session`.  Every
//! transition out of the open state takes the session out of the cave, so
//! the secret is zeroized when that call returns whatever its outcome.
//!
//! There is no file locking: two processes working on the same cave or
//! lock file at once get undefined results.

pub mod phrase;
pub mod store;

use std::fs;
use std::path::{Path, PathBuf};

use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::kdf::{self, Cost, DEFAULT_POW};
use crate::crypto::{encryption, lock_checksum, MasterSecret};
use crate::dict::Dictionary;
use crate::errors::{Result, SesameError};

pub use store::{is_sentinel, Index, Item, Revealed, Store, SENTINEL_SERVICE, SENTINEL_USER};

/// File name of the cave inside its directory.
pub const CAVE_FILE: &str = "sesame.cave";

/// File name of the lock inside the lock directory.
pub const LOCK_FILE: &str = "sesame.lock";

/// Construction-time settings for a [`Cave`].
#[derive(Debug, Clone)]
pub struct CaveOptions {
    /// Memory exponent for master and lock key derivation.
    pub pow: u32,
    /// Directory holding the lock file (the system temp dir by default).
    pub lock_dir: PathBuf,
}

impl Default for CaveOptions {
    fn default() -> Self {
        Self {
            pow: DEFAULT_POW,
            lock_dir: std::env::temp_dir(),
        }
    }
}

struct Session {
    secret: MasterSecret,
    store: Store,
    dirty: bool,
}

impl Session {
    /// Derive the passphrase for `item` under this session's secret.
    fn reveal(&self, dict: &'static Dictionary, item: Item) -> Result<Revealed> {
        let entry = Zeroizing::new(
            serde_json::to_vec(&item)
                .map_err(|e| SesameError::SerializationError(format!("entry: {e}")))?,
        );
        let material = kdf::derive_entry_material(&entry, &self.secret)?;
        let passphrase = phrase::passphrase_from_material(dict, material.as_ref())?;
        Ok(Revealed { item, passphrase })
    }
}

/// A cave bound to a directory.
pub struct Cave {
    dict: &'static Dictionary,
    cave_path: PathBuf,
    lock_path: PathBuf,
    cost: Cost,
    session: Option<Session>,
}

impl Cave {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Bind a cave to `dir` with production settings.
    pub fn new(dir: &Path) -> Result<Self> {
        Self::with_options(dir, CaveOptions::default())
    }

    /// Bind a cave to `dir`.
    ///
    /// Nothing is read or written; the dictionary is loaded and the cost
    /// validated.
    pub fn with_options(dir: &Path, options: CaveOptions) -> Result<Self> {
        let dict = Dictionary::load()?;
        let cost =
            Cost::from_pow(options.pow).map_err(|e| SesameError::ConfigError(e.to_string()))?;

        Ok(Self {
            dict,
            cave_path: dir.join(CAVE_FILE),
            lock_path: options.lock_dir.join(LOCK_FILE),
            cost,
            session: None,
        })
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Path of the cave file.
    pub fn path(&self) -> &Path {
        &self.cave_path
    }

    /// Path of the lock file.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn exists_on_disk(&self) -> bool {
        self.cave_path.exists()
    }

    /// The lock file's presence is the only record of the locked state.
    pub fn is_locked(&self) -> bool {
        self.lock_path.exists()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// `true` if the open store has changes not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.dirty)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create a new cave and return its 8-word recovery phrase.
    ///
    /// Without a phrase a random 88-bit seed is drawn; with one, the cave
    /// is rebuilt from it.  The new cave is open and dirty; nothing is
    /// written until it is closed or locked.
    pub fn create(&mut self, phrase: Option<&str>) -> Result<Zeroizing<String>> {
        if self.is_open() {
            return Err(SesameError::AlreadyOpen("create"));
        }
        if self.exists_on_disk() || self.is_locked() {
            return Err(SesameError::CaveExists(self.cave_path.clone()));
        }

        let mut store = Store::default();
        store.insert(SENTINEL_SERVICE, SENTINEL_USER, 0)?;

        let seed = match phrase {
            Some(phrase) => phrase::seed_from_phrase(self.dict, phrase)?,
            None => phrase::random_seed(),
        };
        let secret = kdf::derive_master_secret(&seed, &self.cost)?;
        let recovery = phrase::phrase_from_seed(self.dict, &seed)?;

        self.session = Some(Session {
            secret,
            store,
            dirty: true,
        });
        info!(path = %self.cave_path.display(), "Cave created");
        Ok(recovery)
    }

    /// Open a closed cave with its recovery phrase.
    pub fn open(&mut self, phrase: &str) -> Result<()> {
        if self.is_open() {
            return Err(SesameError::AlreadyOpen("open"));
        }
        if !self.exists_on_disk() {
            return Err(SesameError::CaveNotFound(self.cave_path.clone()));
        }
        if self.is_locked() {
            return Err(SesameError::Locked("open"));
        }

        let seed = phrase::seed_from_phrase(self.dict, phrase)?;
        let secret = kdf::derive_master_secret(&seed, &self.cost)?;
        let store = self.read_store(&secret)?;

        self.session = Some(Session {
            secret,
            store,
            dirty: false,
        });
        info!(path = %self.cave_path.display(), "Cave opened");
        Ok(())
    }

    /// Close the cave, writing it first if it is dirty.
    ///
    /// The secret and store are released even if writing fails.
    pub fn close(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(SesameError::NotOpen("close"))?;
        self.persist(session)?;
        info!(path = %self.cave_path.display(), "Cave closed");
        Ok(())
    }

    /// Lock the cave and return the 4-word unlock code.
    ///
    /// The master secret is sealed into the lock file under a key derived
    /// from a 16-bit checksum; the code spells that checksum.  The cave is
    /// closed afterwards whether or not locking succeeded.
    pub fn lock(&mut self) -> Result<Zeroizing<String>> {
        let session = self.session.take().ok_or(SesameError::NotOpen("lock"))?;
        let sealed = self.write_lock(&session);
        let closed = self.persist(session);

        let code = sealed?;
        closed?;
        info!(lock = %self.lock_path.display(), "Cave locked");
        Ok(code)
    }

    /// Reopen a locked cave with its unlock code, consuming the lock.
    pub fn unlock(&mut self, code: &str) -> Result<()> {
        if !self.is_locked() {
            return Err(SesameError::NotLocked);
        }
        if self.is_open() {
            return Err(SesameError::AlreadyOpen("unlock"));
        }

        let checksum = phrase::checksum_from_code(self.dict, code)?;
        let lock_key = kdf::derive_master_secret(&checksum, &self.cost)?;

        let recovered = encryption::read_sealed(&self.lock_path, lock_key.as_bytes())?;
        let secret = MasterSecret::from_slice(&recovered)?;
        let store = self.read_store(&secret)?;

        // The sealed box proves the code opened this lock; the checksum
        // also binds the short code to this particular secret.
        let sentinel = store
            .sentinel_index()
            .ok_or(SesameError::ChecksumMismatch)?;
        let expected = lock_checksum(&secret, sentinel);
        if !bool::from(expected.as_bytes().ct_eq(checksum.as_bytes())) {
            return Err(SesameError::ChecksumMismatch);
        }

        fs::remove_file(&self.lock_path)?;
        self.session = Some(Session {
            secret,
            store,
            dirty: false,
        });
        info!(path = %self.cave_path.display(), "Cave unlocked");
        Ok(())
    }

    /// Drop the open session without writing it.
    ///
    /// For a cave that was just created this leaves nothing on disk, so a
    /// recovery phrase that was never shown cannot strand a cave file.
    pub fn abandon(&mut self) -> Result<()> {
        self.session.take().ok_or(SesameError::NotOpen("abandon"))?;
        info!(path = %self.cave_path.display(), "Cave abandoned without saving");
        Ok(())
    }

    /// Delete the lock file.
    ///
    /// Fails with an IO error if there is no lock; check
    /// [`Cave::is_locked`] first.
    pub fn forget(&self) -> Result<()> {
        fs::remove_file(&self.lock_path)?;
        info!(lock = %self.lock_path.display(), "Lock forgotten");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Sorted view of every service, user and index.
    pub fn index(&self) -> Result<&Index> {
        Ok(self.session("list the store")?.store.as_index())
    }

    /// `true` iff `service` has exactly one user; fails for unknown services.
    pub fn unique(&self, service: &str) -> Result<bool> {
        self.session("test service uniqueness")?.store.unique(service)
    }

    /// Look up an entry.  Without a user, the service must be unique.
    pub fn find(&self, service: &str, user: Option<&str>) -> Result<Item> {
        self.session("find service details")?.store.find(service, user)
    }

    /// The passphrase for an entry, optionally as if its index were `index`.
    pub fn get(&self, service: &str, user: Option<&str>, index: Option<i64>) -> Result<Revealed> {
        let session = self.session("get service details")?;
        if is_sentinel(service) {
            return Err(SesameError::Sentinel("get"));
        }
        debug!(service, "Getting passphrase");

        let mut item = session.store.find(service, user)?;
        if let Some(index) = index {
            item.index = index;
        }
        session.reveal(self.dict, item)
    }

    /// Add an entry and return its passphrase.
    ///
    /// The index is stored as given (0 by default).
    pub fn insert(&mut self, service: &str, user: &str, index: Option<i64>) -> Result<Revealed> {
        let dict = self.dict;
        let session = self.session_mut("insert service details")?;
        session.store.check_new(service, user)?;
        debug!(service, user, "Inserting entry");

        let item = Item {
            service: service.to_string(),
            user: user.to_string(),
            index: index.unwrap_or(0),
        };
        let revealed = session.reveal(dict, item)?;

        session.store.put(service, user, revealed.item.index);
        session.dirty = true;
        Ok(revealed)
    }

    /// Move an entry to a new index (the next one by default) and return
    /// its new passphrase.  Negative indices become 0.
    pub fn update(
        &mut self,
        service: &str,
        user: Option<&str>,
        index: Option<i64>,
    ) -> Result<Revealed> {
        let dict = self.dict;
        let session = self.session_mut("update service details")?;
        if is_sentinel(service) {
            return Err(SesameError::Sentinel("update"));
        }
        debug!(service, "Updating entry");

        let mut item = session.store.find(service, user)?;
        let next = item.index.saturating_add(1);
        item.index = index.unwrap_or(next).max(0);
        let revealed = session.reveal(dict, item)?;

        let item = &revealed.item;
        session.store.put(&item.service, &item.user, item.index);
        session.dirty = true;
        Ok(revealed)
    }

    /// Remove an entry and return the passphrase it used to produce.
    pub fn delete(&mut self, service: &str, user: Option<&str>) -> Result<Revealed> {
        let dict = self.dict;
        let session = self.session_mut("delete service details")?;
        if is_sentinel(service) {
            return Err(SesameError::Sentinel("delete"));
        }
        debug!(service, "Deleting entry");

        let item = session.store.find(service, user)?;
        let revealed = session.reveal(dict, item)?;

        session
            .store
            .remove(&revealed.item.service, &revealed.item.user)?;
        session.dirty = true;
        Ok(revealed)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn session(&self, action: &'static str) -> Result<&Session> {
        self.session.as_ref().ok_or(SesameError::NotOpen(action))
    }

    fn session_mut(&mut self, action: &'static str) -> Result<&mut Session> {
        self.session.as_mut().ok_or(SesameError::NotOpen(action))
    }

    fn read_store(&self, secret: &MasterSecret) -> Result<Store> {
        let plaintext = encryption::read_sealed(&self.cave_path, secret.as_bytes())?;
        Store::from_json(&plaintext)
    }

    /// Write the session if it is dirty, then let it drop.
    fn persist(&self, session: Session) -> Result<()> {
        if !session.dirty {
            debug!("Cave unchanged; nothing to write");
            return Ok(());
        }
        let plaintext = session.store.to_json()?;
        let size = encryption::write_sealed(&self.cave_path, session.secret.as_bytes(), &plaintext)?;
        debug!(path = %self.cave_path.display(), size, "Cave written");
        Ok(())
    }

    fn write_lock(&self, session: &Session) -> Result<Zeroizing<String>> {
        let sentinel = session
            .store
            .sentinel_index()
            .ok_or(SesameError::ChecksumMismatch)?;
        let checksum = Zeroizing::new(lock_checksum(&session.secret, sentinel));
        let code = phrase::code_from_checksum(self.dict, &checksum)?;

        let lock_key = kdf::derive_master_secret(&checksum, &self.cost)?;
        encryption::write_sealed(&self.lock_path, lock_key.as_bytes(), session.secret.as_bytes())?;
        Ok(code)
    }
}

impl Drop for Cave {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.persist(session) {
                warn!(error = %e, path = %self.cave_path.display(), "Failed to save cave on drop");
            }
        }
    }
}
