// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `KvStore` (one JSON object in the platform config dir).

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use envprefs_core::store::{KvStore, StoreError};
use tracing::warn;

/// File name used inside the config directory.
pub const STORE_FILE: &str = "prefs.json";

/// Store every key in a single JSON file, loaded once and written through on change.
#[derive(Debug)]
pub struct FsKvStore {
    path: PathBuf,
    items: RefCell<BTreeMap<String, String>>,
}

impl FsKvStore {
    /// Open the store under the user config directory (e.g. `~/.config/envprefs/prefs.json`).
    pub fn new() -> Result<Self, StoreError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "envprefs")
            .ok_or_else(|| StoreError::Unavailable("could not resolve config dir".into()))?;
        Self::open(proj.config_dir().join(STORE_FILE))
    }

    /// Open (or lazily create) the store at `path`.
    ///
    /// A file that exists but does not parse is logged and treated as empty; it
    /// is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let items = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "ignoring unreadable store file");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(StoreError::Io(err)),
        };
        Ok(Self {
            path,
            items: RefCell::new(items),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `next` to disk and only then make it the in-memory state, so a
    /// failed write leaves both views on the previous contents.
    fn commit(&self, next: BTreeMap<String, String>) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(&next)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        *self.items.borrow_mut() = next;
        Ok(())
    }
}

impl KvStore for FsKvStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut next = self.items.borrow().clone();
        next.insert(key.to_owned(), value.to_owned());
        self.commit(next)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        if !self.items.borrow().contains_key(key) {
            return Ok(());
        }
        let mut next = self.items.borrow().clone();
        next.remove(key);
        self.commit(next)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.items.borrow().keys().cloned().collect())
    }
}
