//! Build-time feature modes and the effective mode they resolve to.

use crate::GateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Build-time override injected through `FEATURE_MODE`.
///
/// `Free` and `Pro` force the effective entitlement regardless of purchase
/// state. `Normal` defers to the runtime purchase flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FeatureMode {
    /// Always Free.
    Free,
    /// Always Pro.
    Pro,
    /// Follow the runtime purchase state.
    #[default]
    Normal,
}

impl FeatureMode {
    /// All modes, in declaration order.
    pub const ALL: [FeatureMode; 3] = [FeatureMode::Free, FeatureMode::Pro, FeatureMode::Normal];

    /// Canonical configuration value (`FREE`, `PRO`, `NORMAL`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Pro => "PRO",
            Self::Normal => "NORMAL",
        }
    }

    /// Resolve a raw configuration value, falling back to `Normal`.
    ///
    /// Unset, empty and unrecognized values all land on `Normal`. Matching
    /// is exact, so padded or lowercase values are unrecognized.
    pub fn from_config_value(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::Normal,
            Some(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!(value, "unrecognized FEATURE_MODE, falling back to NORMAL");
                Self::Normal
            }),
        }
    }
}

impl fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FeatureMode {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE" => Ok(Self::Free),
            "PRO" => Ok(Self::Pro),
            "NORMAL" => Ok(Self::Normal),
            other => Err(GateError::ConfigError(format!(
                "FEATURE_MODE must be FREE, PRO or NORMAL, got {:?}",
                other
            ))),
        }
    }
}

/// The resolved Free/Pro decision for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EffectiveMode {
    /// Free behavior.
    Free,
    /// Pro behavior.
    Pro,
}

impl EffectiveMode {
    /// Map an effective entitlement flag to its mode.
    pub fn from_entitlement(is_pro: bool) -> Self {
        if is_pro {
            Self::Pro
        } else {
            Self::Free
        }
    }

    /// Whether this is Pro.
    pub fn is_pro(&self) -> bool {
        matches!(self, Self::Pro)
    }
}

impl fmt::Display for EffectiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.pad("FREE"),
            Self::Pro => f.pad("PRO"),
        }
    }
}

/// Diagnostic snapshot of the build mode and what it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeReport {
    /// The mode baked into this binary.
    pub build_mode: FeatureMode,
    /// The entitlement applied for the queried purchase state.
    pub effective_mode: EffectiveMode,
}
