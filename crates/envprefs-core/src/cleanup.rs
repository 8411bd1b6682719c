// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bulk removal of an environment's preferences.

use tracing::info;

use crate::prefs::EnvPrefs;
use crate::store::KvStore;

impl<S> EnvPrefs<S>
where
    S: KvStore,
{
    /// Delete every key of `environment_id`; call once when the environment is removed.
    ///
    /// Returns the number of keys removed. Unknown or already-cleaned
    /// environments remove nothing.
    pub fn cleanup_environment(&self, environment_id: &str) -> usize {
        let keys = self.env_keys(environment_id);
        let removed = keys.iter().filter(|k| self.remove_key(k)).count();
        info!(environment_id, removed, "cleaned up environment preferences");
        removed
    }
}
