// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Generic application settings with schema-supplied defaults.
//!
//! Settings are global (not environment-scoped) and persist as one JSON object
//! under [`SETTINGS_KEY`]. Stored values are merged over the schema defaults on
//! load, so settings added to the schema later pick up their defaults.
//! Stored entries that are not a bool, number or string are skipped on load
//! but written back untouched, so one odd value never costs the others.
//!
//! Successful writes are announced on the store's own [`ChangeBus`] with the
//! key [`SETTINGS_KEY`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::notify::{ChangeBus, ChangeKind, PrefChange, SubscriptionId};
use crate::store::KvStore;

/// Storage key of the persisted settings object.
pub const SETTINGS_KEY: &str = "ig-configuration";

/// A single setting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Toggle state.
    Bool(bool),
    /// Number or range value.
    Number(f64),
    /// Text or select value.
    Text(String),
}

impl SettingValue {
    /// The boolean, if this is a toggle value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is a numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Control type and default of a setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SettingKind {
    /// On/off switch.
    Toggle {
        /// Default state.
        default: bool,
    },
    /// One of a fixed set of options (value -> label).
    Select {
        /// Allowed values and their labels.
        options: BTreeMap<String, String>,
        /// Default value.
        default: String,
    },
    /// Free text.
    Text {
        /// Placeholder shown when empty.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        /// Default value.
        default: String,
    },
    /// Number input with optional bounds.
    Number {
        /// Lower bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Upper bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        /// Increment.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
        /// Default value.
        default: f64,
    },
    /// Slider.
    Range {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Increment.
        step: f64,
        /// Display unit (e.g. `%`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        /// Default value.
        default: f64,
    },
}

impl SettingKind {
    /// Default value as a [`SettingValue`].
    pub fn default_value(&self) -> SettingValue {
        match self {
            Self::Toggle { default } => SettingValue::Bool(*default),
            Self::Select { default, .. } | Self::Text { default, .. } => {
                SettingValue::Text(default.clone())
            }
            Self::Number { default, .. } | Self::Range { default, .. } => {
                SettingValue::Number(*default)
            }
        }
    }
}

/// One configurable setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    /// Storage key.
    pub key: String,
    /// Display name.
    pub title: String,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Control type and default.
    #[serde(flatten)]
    pub kind: SettingKind,
}

/// Group of settings shown together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon name.
    pub icon: String,
    /// Settings in display order.
    pub settings: Vec<Setting>,
}

/// Every setting the application knows about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsSchema {
    /// Categories in display order.
    pub categories: Vec<Category>,
}

impl SettingsSchema {
    /// Default value of every setting, keyed by setting key.
    pub fn defaults(&self) -> BTreeMap<String, SettingValue> {
        self.categories
            .iter()
            .flat_map(|c| &c.settings)
            .map(|s| (s.key.clone(), s.kind.default_value()))
            .collect()
    }
}

/// Settings values plus settings-panel visibility.
#[derive(Debug)]
pub struct SettingsStore<S> {
    store: S,
    defaults: BTreeMap<String, SettingValue>,
    values: BTreeMap<String, SettingValue>,
    unrecognized: Map<String, Value>,
    open: bool,
    bus: ChangeBus,
}

impl<S> SettingsStore<S>
where
    S: KvStore,
{
    /// Load settings from `store`, falling back to `schema` defaults.
    pub fn load(store: S, schema: &SettingsSchema) -> Self {
        let defaults = schema.defaults();
        let mut values = defaults.clone();
        let mut unrecognized = Map::new();
        for (key, raw) in read_stored(&store) {
            match serde_json::from_value::<SettingValue>(raw.clone()) {
                Ok(value) => {
                    values.insert(key, value);
                }
                Err(err) => {
                    debug!(key = %key, %err, "keeping unrecognized setting as-is");
                    unrecognized.insert(key, raw);
                }
            }
        }
        Self {
            store,
            defaults,
            values,
            unrecognized,
            open: false,
            bus: ChangeBus::new(),
        }
    }

    /// Change bus receiving a [`PrefChange`] after each persisted write.
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

    /// Current value of `key`.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Set `key` and persist.
    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) {
        self.values.insert(key.to_owned(), value.into());
        self.persist();
    }

    /// All current values.
    pub fn all(&self) -> &BTreeMap<String, SettingValue> {
        &self.values
    }

    /// Restore every setting to its default and persist.
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.unrecognized.clear();
        self.persist();
    }

    /// Restore one setting to its default. Returns false if `key` has no default.
    pub fn reset_key(&mut self, key: &str) -> bool {
        let Some(default) = self.defaults.get(key) else {
            return false;
        };
        self.values.insert(key.to_owned(), default.clone());
        self.persist();
        true
    }

    /// Whether the settings panel is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show the settings panel.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the settings panel.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Flip settings panel visibility.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Consume the settings and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn persist(&self) {
        let mut object = self.unrecognized.clone();
        for (key, value) in &self.values {
            match serde_json::to_value(value) {
                Ok(value) => {
                    object.insert(key.clone(), value);
                }
                Err(err) => {
                    warn!(key = %key, %err, "failed to encode setting");
                    return;
                }
            }
        }
        let raw = match serde_json::to_string(&object) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "failed to encode settings");
                return;
            }
        };
        if let Err(err) = self.store.set_item(SETTINGS_KEY, &raw) {
            warn!(%err, "failed to persist settings");
            return;
        }
        self.bus.publish(&PrefChange {
            key: SETTINGS_KEY.to_owned(),
            kind: ChangeKind::Written,
        });
    }
}

fn read_stored<S: KvStore>(store: &S) -> Map<String, Value> {
    let raw = match store.get_item(SETTINGS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Map::new(),
        Err(err) => {
            warn!(%err, "failed to load settings");
            return Map::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(%err, "ignoring unreadable settings");
        Map::new()
    })
}
