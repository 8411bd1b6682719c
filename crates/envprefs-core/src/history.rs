// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Capped run history deduplicated by record identity.
//!
//! Re-running something already in the history moves the stored record to the
//! front and refreshes its timestamp; every other field of the stored record is
//! kept as it was.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::keys::GADGET_HISTORY_KEY;
use crate::prefs::{EnvPrefs, PrefsError};
use crate::store::KvStore;
use crate::value::structural_eq;

/// Default cap for the gadget run history.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// One past run request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Image reference that was run.
    pub image: String,
    /// Run parameters, arbitrary JSON.
    #[serde(default)]
    pub params: Value,
    /// Milliseconds since the Unix epoch. Never part of identity.
    #[serde(default)]
    pub timestamp: i64,
    /// Any other fields the caller recorded; preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HistoryRecord {
    /// Record with no extra fields.
    pub fn new(image: impl Into<String>, params: Value, timestamp: i64) -> Self {
        Self {
            image: image.into(),
            params,
            timestamp,
            extra: Map::new(),
        }
    }
}

/// Default identity: same image and structurally equal params.
pub fn same_run_request(a: &HistoryRecord, b: &HistoryRecord) -> bool {
    a.image == b.image && structural_eq(&a.params, &b.params)
}

impl<S> EnvPrefs<S>
where
    S: KvStore,
{
    /// History stored under `history_key`, most recent first.
    ///
    /// Elements that no longer decode as a [`HistoryRecord`] are skipped.
    pub fn get_history(&self, environment_id: &str, history_key: &str) -> Vec<HistoryRecord> {
        let raw: Vec<Value> = self.get(environment_id, history_key).unwrap_or_default();
        raw.into_iter()
            .filter_map(|v| match serde_json::from_value(v) {
                Ok(record) => Some(record),
                Err(err) => {
                    debug!(history_key, %err, "skipping undecodable history record");
                    None
                }
            })
            .collect()
    }

    /// Insert `record` at the front of `history_key`, deduplicating with `same`.
    ///
    /// A record with a blank image is ignored.
    pub fn add_record_with<F>(
        &self,
        environment_id: &str,
        history_key: &str,
        record: HistoryRecord,
        max_entries: usize,
        same: F,
    ) -> Result<(), PrefsError>
    where
        F: Fn(&HistoryRecord, &HistoryRecord) -> bool,
    {
        if record.image.trim().is_empty() {
            return Ok(());
        }
        let mut history = self.get_history(environment_id, history_key);
        let entry = match history.iter().position(|r| same(r, &record)) {
            Some(i) => {
                let mut existing = history.remove(i);
                existing.timestamp = record.timestamp;
                existing
            }
            None => record,
        };
        history.insert(0, entry);
        history.truncate(max_entries);
        self.set(environment_id, history_key, &history)
    }

    /// Gadget run history, most recent first.
    pub fn get_gadget_history(&self, environment_id: &str) -> Vec<HistoryRecord> {
        self.get_history(environment_id, GADGET_HISTORY_KEY)
    }

    /// Add a gadget run to the history, deduplicated on image and params.
    pub fn add_gadget_to_history(
        &self,
        environment_id: &str,
        record: HistoryRecord,
        max_entries: usize,
    ) -> Result<(), PrefsError> {
        self.add_record_with(
            environment_id,
            GADGET_HISTORY_KEY,
            record,
            max_entries,
            same_run_request,
        )
    }

    /// Drop the whole gadget run history.
    pub fn clear_gadget_history(&self, environment_id: &str) -> Result<(), PrefsError> {
        self.set(environment_id, GADGET_HISTORY_KEY, &Vec::<HistoryRecord>::new())
    }
}
