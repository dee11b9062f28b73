//! Free/Pro policy as compiled into the widget extension.
//!
//! The extension runs in its own process and cannot load the app's policy
//! tables, so the rules are restated here with plain `match` arms. Its build
//! mode comes from the extension bundle's metadata rather than the app's
//! build environment. Agreement with [`crate::policy::gate::FeatureGate`] is
//! enforced by the conformance fixture.

use crate::config::FEATURE_MODE_KEY;
use crate::policy::limits::{WidgetLimit, WidgetLimits, WidgetSize, WidgetType};
use crate::policy::mode::FeatureMode;
use crate::policy::GatePolicy;
use crate::GateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const FREE_HOME_WIDGETS: u32 = 1;
const FREE_LOCKSCREEN_WIDGETS: u32 = 1;

/// String metadata bundled with the widget extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleInfo {
    entries: BTreeMap<String, String>,
}

impl BundleInfo {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse metadata from a JSON object of string values.
    pub fn from_json(json: &str) -> Result<Self, GateError> {
        serde_json::from_str(json)
            .map_err(|e| GateError::ConfigError(format!("Invalid bundle metadata: {}", e)))
    }

    /// Set a metadata value.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Look up a metadata value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The bundled `FEATURE_MODE`, `Normal` when absent or unrecognized.
    /// Only the exact uppercase names are recognized.
    pub fn feature_mode(&self) -> FeatureMode {
        match self.get(FEATURE_MODE_KEY) {
            Some("FREE") => FeatureMode::Free,
            Some("PRO") => FeatureMode::Pro,
            Some("NORMAL") | Some("") | None => FeatureMode::Normal,
            Some(other) => {
                tracing::warn!(value = other, "unrecognized bundled FEATURE_MODE, using NORMAL");
                FeatureMode::Normal
            }
        }
    }
}

/// Policy evaluated inside the widget extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetPolicy {
    mode: FeatureMode,
}

impl WidgetPolicy {
    /// Policy for an explicit mode.
    pub fn new(mode: FeatureMode) -> Self {
        Self { mode }
    }

    /// Policy for the mode recorded in the extension's bundle metadata.
    pub fn from_bundle(info: &BundleInfo) -> Self {
        Self::new(info.feature_mode())
    }
}

impl GatePolicy for WidgetPolicy {
    fn build_mode(&self) -> FeatureMode {
        self.mode
    }

    fn is_pro_effective(&self, purchase_state: bool) -> bool {
        match self.mode {
            FeatureMode::Pro => true,
            FeatureMode::Free => false,
            FeatureMode::Normal => purchase_state,
        }
    }

    fn can_add_widget(
        &self,
        current_home_count: u32,
        current_lock_count: u32,
        widget_type: WidgetType,
        purchase_state: bool,
    ) -> bool {
        if self.is_pro_effective(purchase_state) {
            return true;
        }
        match widget_type {
            WidgetType::Home => current_home_count < FREE_HOME_WIDGETS,
            WidgetType::Lockscreen => current_lock_count < FREE_LOCKSCREEN_WIDGETS,
        }
    }

    fn can_show_seconds(&self, purchase_state: bool) -> bool {
        self.is_pro_effective(purchase_state)
    }

    fn is_widget_size_usable(&self, size: WidgetSize, purchase_state: bool) -> bool {
        match size {
            WidgetSize::Small => true,
            WidgetSize::Medium | WidgetSize::Large => self.is_pro_effective(purchase_state),
        }
    }

    fn is_widget_size_previewable(&self, _size: WidgetSize, _purchase_state: bool) -> bool {
        true
    }

    fn widget_limits(&self, purchase_state: bool) -> WidgetLimits {
        if self.is_pro_effective(purchase_state) {
            WidgetLimits {
                home: WidgetLimit::Unlimited,
                lockscreen: WidgetLimit::Unlimited,
            }
        } else {
            WidgetLimits {
                home: WidgetLimit::Finite(FREE_HOME_WIDGETS),
                lockscreen: WidgetLimit::Finite(FREE_LOCKSCREEN_WIDGETS),
            }
        }
    }
}
