//! Local persistence for StreamVibe
//!
//! Two independent string-keyed JSON records scoped to the user's data dir:
//! the session token record and the watchlist array. Writes are whole-record
//! and last-write-wins; there are no transactions and no cross-process
//! coordination (two concurrent processes can silently overwrite each
//! other's watchlist changes).
//!
//! Missing or corrupt records always read as empty.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::models::WatchlistEntry;

/// Record key for the session token
pub const SESSION_KEY: &str = "session";
/// Record key for the watchlist array
pub const WATCHLIST_KEY: &str = "watchlist";

/// Persisted session record schema
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// String-keyed JSON record store rooted in the user's data directory.
///
/// Unavailable until opened; screens treat the watchlist as empty until the
/// app has a store in hand.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open the store at the default per-user location
    /// (`<data_dir>/streamvibe`). None when the platform exposes no data dir.
    pub fn open() -> Option<Self> {
        dirs::data_dir().map(|p| Self {
            root: p.join("streamvibe"),
        })
    }

    /// Open a store rooted at an explicit directory (for testing)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Read the raw JSON value for a key
    pub fn read_key(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    /// Write the raw JSON value for a key, creating the root if needed.
    /// Whole-record replacement: the last writer wins.
    pub fn write_key(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    /// Remove a key. Missing keys are not an error.
    pub fn remove_key(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // -------------------------------------------------------------------------
    // Session Record
    // -------------------------------------------------------------------------

    /// Load the persisted session token, if any. The token is re-validated
    /// by the authenticator before use, never trusted from disk.
    pub fn load_session_token(&self) -> Option<String> {
        let raw = self.read_key(SESSION_KEY)?;
        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(stored) => Some(stored.token),
            Err(e) => {
                warn!(error = %e, "corrupt session record, treating as signed out");
                None
            }
        }
    }

    /// Persist the session token (at sign-in)
    pub fn save_session_token(&self, token: &str) -> Result<()> {
        let stored = StoredSession {
            token: token.to_string(),
        };
        self.write_key(SESSION_KEY, &serde_json::to_string(&stored)?)
    }

    /// Remove the session record (at sign-out)
    pub fn clear_session(&self) -> Result<()> {
        self.remove_key(SESSION_KEY)
    }

    // -------------------------------------------------------------------------
    // Watchlist Record
    // -------------------------------------------------------------------------

    /// All watchlist entries. Missing or corrupt records read as empty.
    pub fn watchlist(&self) -> Vec<WatchlistEntry> {
        let Some(raw) = self.read_key(WATCHLIST_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "corrupt watchlist record, treating as empty");
                Vec::new()
            }
        }
    }

    /// Whether an item id is on the watchlist
    pub fn watchlist_contains(&self, id: u64) -> bool {
        self.watchlist().iter().any(|e| e.id == id)
    }

    /// Add an entry. Adding an id that is already present is a no-op.
    pub fn watchlist_add(&self, entry: WatchlistEntry) -> Result<()> {
        let mut entries = self.watchlist();
        if entries.iter().any(|e| e.id == entry.id) {
            return Ok(());
        }
        entries.push(entry);
        self.write_key(WATCHLIST_KEY, &serde_json::to_string(&entries)?)
    }

    /// Remove an entry by item id. Removing an absent id is a no-op.
    pub fn watchlist_remove(&self, id: u64) -> Result<()> {
        let mut entries = self.watchlist();
        entries.retain(|e| e.id != id);
        self.write_key(WATCHLIST_KEY, &serde_json::to_string(&entries)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
