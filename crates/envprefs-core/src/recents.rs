// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounded, duplicate-free, most-recent-first lists of strings.

use crate::keys::{k8s_recent_key, GADGET_URL_RECENT_KEY};
use crate::prefs::{EnvPrefs, PrefsError};
use crate::store::KvStore;

/// Cap for recently used Kubernetes resource names (per resource type).
pub const K8S_RECENTS_CAP: usize = 8;

/// Cap for recently used gadget URLs.
pub const GADGET_URL_RECENTS_CAP: usize = 10;

/// Move `value` to the front of `list`, dropping other copies, then truncate to `cap`.
pub fn push_front_dedup(list: &mut Vec<String>, value: &str, cap: usize) {
    list.retain(|v| v != value);
    list.insert(0, value.to_owned());
    list.truncate(cap);
}

impl<S> EnvPrefs<S>
where
    S: KvStore,
{
    /// Recency list stored under `list_key`, most recent first.
    pub fn get_recents(&self, environment_id: &str, list_key: &str) -> Vec<String> {
        self.get(environment_id, list_key).unwrap_or_default()
    }

    /// Record `value` as the most recent entry of `list_key`, keeping at most `cap`.
    ///
    /// Empty or whitespace-only values are ignored.
    pub fn save_recent(
        &self,
        environment_id: &str,
        list_key: &str,
        value: &str,
        cap: usize,
    ) -> Result<(), PrefsError> {
        if value.trim().is_empty() {
            return Ok(());
        }
        let mut recents = self.get_recents(environment_id, list_key);
        push_front_dedup(&mut recents, value, cap);
        self.set(environment_id, list_key, &recents)
    }

    /// Reset `list_key` to an empty list.
    pub fn clear_recents(&self, environment_id: &str, list_key: &str) -> Result<(), PrefsError> {
        self.set(environment_id, list_key, &Vec::<String>::new())
    }

    /// Recently used values for a Kubernetes resource type (`namespace`, `pod`, ...).
    pub fn get_k8s_recents(&self, environment_id: &str, resource_type: &str) -> Vec<String> {
        self.get_recents(environment_id, &k8s_recent_key(resource_type))
    }

    /// Record a recently used Kubernetes resource value.
    pub fn save_k8s_recent(
        &self,
        environment_id: &str,
        resource_type: &str,
        value: &str,
    ) -> Result<(), PrefsError> {
        self.save_recent(
            environment_id,
            &k8s_recent_key(resource_type),
            value,
            K8S_RECENTS_CAP,
        )
    }

    /// Forget recent values for a Kubernetes resource type.
    pub fn clear_k8s_recents(
        &self,
        environment_id: &str,
        resource_type: &str,
    ) -> Result<(), PrefsError> {
        self.clear_recents(environment_id, &k8s_recent_key(resource_type))
    }

    /// Recently used gadget URLs.
    pub fn get_gadget_url_recents(&self, environment_id: &str) -> Vec<String> {
        self.get_recents(environment_id, GADGET_URL_RECENT_KEY)
    }

    /// Record a recently used gadget URL.
    pub fn save_gadget_url_recent(
        &self,
        environment_id: &str,
        url: &str,
    ) -> Result<(), PrefsError> {
        self.save_recent(
            environment_id,
            GADGET_URL_RECENT_KEY,
            url,
            GADGET_URL_RECENTS_CAP,
        )
    }

    /// Forget recent gadget URLs.
    pub fn clear_gadget_url_recents(&self, environment_id: &str) -> Result<(), PrefsError> {
        self.clear_recents(environment_id, GADGET_URL_RECENT_KEY)
    }
}
