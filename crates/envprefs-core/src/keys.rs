// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Key namespacing: `env:{environment_id}:{key}`.
//!
//! Keys are built by plain concatenation. Neither the environment ID nor the key
//! is escaped, so an environment ID containing `:` can make one environment's
//! prefix a prefix of another's (`env:a:` vs `env:a:b:`). Enumeration and cleanup
//! inherit that ambiguity.

use crate::store::{KvStore, StoreError};

/// Prefix shared by every environment-scoped key.
pub const ENV_NAMESPACE: &str = "env:";

/// Key of the recent gadget URL list.
pub const GADGET_URL_RECENT_KEY: &str = "gadget-url-recent";

/// Key of the gadget run history.
pub const GADGET_HISTORY_KEY: &str = "gadget-history";

/// Build the fully-qualified key for `key` in `environment_id`.
pub fn build_key(environment_id: &str, key: &str) -> String {
    format!("{ENV_NAMESPACE}{environment_id}:{key}")
}

/// Prefix matching every key of `environment_id` (trailing `:` included).
pub fn env_prefix(environment_id: &str) -> String {
    format!("{ENV_NAMESPACE}{environment_id}:")
}

/// Split a fully-qualified key into `(environment_id, key)`.
///
/// Splits at the first `:` after the namespace, so environment IDs that contain
/// `:` do not round-trip.
pub fn parse_key(full_key: &str) -> Option<(&str, &str)> {
    full_key.strip_prefix(ENV_NAMESPACE)?.split_once(':')
}

/// Key of the recent-values list for a Kubernetes resource type.
pub fn k8s_recent_key(resource_type: &str) -> String {
    format!("k8s-recent:{resource_type}")
}

/// Enumerate every stored key belonging to `environment_id`, sorted.
///
/// Scans the whole key space; there is no secondary index.
pub fn list_keys<S>(store: &S, environment_id: &str) -> Result<Vec<String>, StoreError>
where
    S: KvStore + ?Sized,
{
    let prefix = env_prefix(environment_id);
    let mut keys: Vec<String> = store
        .keys()?
        .into_iter()
        .filter(|k| k.starts_with(&prefix))
        .collect();
    keys.sort();
    Ok(keys)
}
