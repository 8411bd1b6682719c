// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Environment-scoped preferences, recency lists and run history for desktop
//! tools that talk to several clusters, plus the small app services around
//! them (settings, toasts, confirmations).
//!
//! Everything is synchronous and single-threaded. Read-modify-write sequences
//! (recents, history) are not atomic; two processes writing the same backing
//! store can lose each other's updates.

pub mod cleanup;
pub mod confirm;
pub mod history;
pub mod keys;
pub mod notify;
pub mod prefs;
pub mod recents;
pub mod settings;
pub mod store;
pub mod toast;
pub mod value;

pub use history::{HistoryRecord, DEFAULT_MAX_HISTORY};
pub use notify::{ChangeKind, PrefChange};
pub use prefs::{EnvPrefs, PrefsError};
pub use store::{KvStore, MemoryStore, NullStore, StoreError};
