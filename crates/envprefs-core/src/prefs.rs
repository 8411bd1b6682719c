// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed, environment-scoped preference accessor.
//!
//! Reads are lenient: a missing key, a backend read error, or a value that no
//! longer decodes as the requested type all come back as `None`. Writes are
//! strict about encoding (the error reaches the caller) but swallow backend
//! failures, which only get logged.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::keys::{build_key, list_keys};
use crate::notify::{ChangeBus, ChangeKind, PrefChange, SubscriptionId};
use crate::store::KvStore;

/// Error type for preference writes.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Value could not be serialized to JSON.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Environment-scoped preference service over a [`KvStore`].
///
/// Construct one per application and hand out references; there is no global
/// instance.
#[derive(Debug)]
pub struct EnvPrefs<S> {
    store: S,
    bus: ChangeBus,
}

impl<S> EnvPrefs<S> {
    /// Create a service using the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            bus: ChangeBus::new(),
        }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Change bus receiving a [`PrefChange`] after each write or removal.
    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// Shorthand for `self.bus().subscribe(listener)`.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&PrefChange) + 'static,
    {
        self.bus.subscribe(listener)
    }

    /// Shorthand for `self.bus().unsubscribe(id)`.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }
}

impl<S> EnvPrefs<S>
where
    S: KvStore,
{
    /// Load and decode the preference `key` of `environment_id`.
    pub fn get<T>(&self, environment_id: &str, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.read_key(&build_key(environment_id, key))
    }

    /// Encode and persist `value` as preference `key` of `environment_id`.
    pub fn set<T>(&self, environment_id: &str, key: &str, value: &T) -> Result<(), PrefsError>
    where
        T: Serialize + ?Sized,
    {
        self.write_key(&build_key(environment_id, key), value)
    }

    /// Raw string stored under preference `key`, if any.
    pub fn get_raw(&self, environment_id: &str, key: &str) -> Option<String> {
        let full_key = build_key(environment_id, key);
        match self.store.get_item(&full_key) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = %full_key, %err, "preference read failed");
                None
            }
        }
    }

    /// All stored keys of `environment_id`. Backend errors yield an empty list.
    pub fn env_keys(&self, environment_id: &str) -> Vec<String> {
        match list_keys(&self.store, environment_id) {
            Ok(keys) => keys,
            Err(err) => {
                warn!(environment_id, %err, "key enumeration failed");
                Vec::new()
            }
        }
    }

    fn read_key<T>(&self, full_key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let raw = match self.store.get_item(full_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = full_key, %err, "preference read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(key = full_key, %err, "ignoring undecodable preference");
                None
            }
        }
    }

    fn write_key<T>(&self, full_key: &str, value: &T) -> Result<(), PrefsError>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value)?;
        if let Err(err) = self.store.set_item(full_key, &raw) {
            warn!(key = full_key, %err, "preference write dropped");
            return Ok(());
        }
        self.bus.publish(&PrefChange {
            key: full_key.to_owned(),
            kind: ChangeKind::Written,
        });
        Ok(())
    }

    pub(crate) fn remove_key(&self, full_key: &str) -> bool {
        if let Err(err) = self.store.remove_item(full_key) {
            warn!(key = full_key, %err, "preference removal failed");
            return false;
        }
        self.bus.publish(&PrefChange {
            key: full_key.to_owned(),
            kind: ChangeKind::Removed,
        });
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use serde::Deserialize;

    use super::*;
    use crate::store::{MemoryStore, NullStore, StoreError};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Layout {
        columns: Vec<String>,
        compact: bool,
    }

    #[test]
    fn set_then_get_uses_namespaced_key() {
        let prefs = EnvPrefs::new(MemoryStore::new());
        let layout = Layout {
            columns: vec!["name".into(), "age".into()],
            compact: true,
        };
        prefs.set("e1", "layout", &layout).unwrap();

        assert_eq!(prefs.get::<Layout>("e1", "layout"), Some(layout));
        assert_eq!(prefs.get::<Layout>("e2", "layout"), None);
        assert!(prefs.store().get_item("env:e1:layout").unwrap().is_some());
    }

    #[test]
    fn corrupt_or_mistyped_value_reads_as_absent() {
        let prefs = EnvPrefs::new(MemoryStore::new());
        prefs.store().set_item("env:e1:layout", "{not json").unwrap();
        assert_eq!(prefs.get::<Layout>("e1", "layout"), None);

        prefs.set("e1", "layout", &42).unwrap();
        assert_eq!(prefs.get::<Layout>("e1", "layout"), None);
        assert_eq!(prefs.get::<u32>("e1", "layout"), Some(42));
    }

    #[test]
    fn encode_failure_is_surfaced_and_nothing_is_written() {
        let prefs = EnvPrefs::new(MemoryStore::new());
        let published = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&published);
        prefs.subscribe(move |_| *sink.borrow_mut() += 1);

        let mut bad: BTreeMap<Vec<u8>, u8> = BTreeMap::new();
        bad.insert(vec![1, 2], 3);
        let err = prefs.set("e1", "bad", &bad).unwrap_err();
        assert!(matches!(err, PrefsError::Encode(_)));
        assert!(prefs.store().is_empty());
        assert_eq!(*published.borrow(), 0);
    }

    #[test]
    fn write_publishes_full_key() {
        let prefs = EnvPrefs::new(MemoryStore::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = prefs.subscribe(move |c| sink.borrow_mut().push(c.clone()));

        prefs.set("e1", "theme", "dark").unwrap();
        prefs.unsubscribe(id);
        prefs.set("e1", "theme", "light").unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![PrefChange {
                key: "env:e1:theme".into(),
                kind: ChangeKind::Written,
            }]
        );
    }

    struct FailingStore;

    impl KvStore for FailingStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        fn remove_item(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        fn keys(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn backend_failures_degrade_to_absent_and_noop() {
        let prefs = EnvPrefs::new(FailingStore);
        let published = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&published);
        prefs.subscribe(move |_| *sink.borrow_mut() += 1);

        prefs.set("e1", "k", &true).unwrap();
        assert_eq!(prefs.get::<bool>("e1", "k"), None);
        assert!(prefs.env_keys("e1").is_empty());
        assert_eq!(prefs.cleanup_environment("e1"), 0);
        assert_eq!(*published.borrow(), 0);
    }

    /// Reads succeed, writes and removals fail.
    struct ReadOnlyStore(MemoryStore);

    impl KvStore for ReadOnlyStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get_item(key)
        }
        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
        fn remove_item(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
        fn keys(&self) -> Result<Vec<String>, StoreError> {
            self.0.keys()
        }
    }

    #[test]
    fn swallowed_write_and_removal_failures_publish_nothing() {
        let inner = MemoryStore::new();
        inner.set_item("env:e1:theme", "\"dark\"").unwrap();
        let prefs = EnvPrefs::new(ReadOnlyStore(inner));
        let published = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&published);
        prefs.subscribe(move |c| sink.borrow_mut().push(c.clone()));

        prefs.set("e1", "theme", "light").unwrap();
        assert_eq!(prefs.cleanup_environment("e1"), 0);

        assert!(published.borrow().is_empty());
        assert_eq!(prefs.get::<String>("e1", "theme").as_deref(), Some("dark"));
        assert_eq!(prefs.env_keys("e1"), vec!["env:e1:theme".to_owned()]);
    }

    #[test]
    fn null_store_accepts_writes_without_persisting() {
        let prefs = EnvPrefs::new(NullStore);
        prefs.set("e1", "k", &true).unwrap();
        assert_eq!(prefs.get::<bool>("e1", "k"), None);
    }
}
