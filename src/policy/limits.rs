//! Widget kinds, per-tier limits, and denial reasons.
//!
//! The tier tables here are the single source of the app-side policy:
//!
//! | Tier | Home | Lock screen | Seconds | Usable sizes | Previewable sizes |
//! |------|------|-------------|---------|--------------|-------------------|
//! | Free | 1 | 1 | No | small | small, medium, large |
//! | Pro | Unlimited | Unlimited | Yes | small, medium, large | small, medium, large |

use crate::policy::mode::EffectiveMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a widget is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    /// Home-screen widget.
    Home,
    /// Lock-screen widget.
    Lockscreen,
}

impl WidgetType {
    /// All widget types.
    pub const ALL: [WidgetType; 2] = [WidgetType::Home, WidgetType::Lockscreen];

    /// Pick this type's count out of a (home, lock screen) pair.
    pub fn select(&self, home_count: u32, lock_count: u32) -> u32 {
        match self {
            Self::Home => home_count,
            Self::Lockscreen => lock_count,
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.pad("home"),
            Self::Lockscreen => f.pad("lockscreen"),
        }
    }
}

/// Widget size family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    /// Small square widget.
    Small,
    /// Medium, two columns wide.
    Medium,
    /// Large, two by two.
    Large,
}

impl WidgetSize {
    /// All sizes, smallest first.
    pub const ALL: [WidgetSize; 3] = [WidgetSize::Small, WidgetSize::Medium, WidgetSize::Large];
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => f.pad("small"),
            Self::Medium => f.pad("medium"),
            Self::Large => f.pad("large"),
        }
    }
}

/// Why a gated action was denied. Consumed by the upgrade prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitReason {
    /// Widget count limit reached.
    Widget,
    /// Seconds-level countdown is Pro only.
    Seconds,
}

impl fmt::Display for LimitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Widget => f.pad("widget"),
            Self::Seconds => f.pad("seconds"),
        }
    }
}

/// The gated action a caller is attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptType {
    /// Adding a widget.
    Widget,
    /// Turning on seconds display.
    Seconds,
}

/// Maximum number of widgets of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetLimit {
    /// At most this many.
    Finite(u32),
    /// No cap.
    Unlimited,
}

impl WidgetLimit {
    /// Whether one more widget fits on top of `current`.
    pub fn allows(&self, current: u32) -> bool {
        match self {
            Self::Finite(limit) => current < *limit,
            Self::Unlimited => true,
        }
    }

    /// Whether any cap exists.
    pub fn is_capped(&self) -> bool {
        matches!(self, Self::Finite(_))
    }
}

impl fmt::Display for WidgetLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(limit) => write!(f, "{}", limit),
            Self::Unlimited => f.pad("unlimited"),
        }
    }
}

/// Home and lock-screen widget limits for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetLimits {
    /// Home-screen limit.
    pub home: WidgetLimit,
    /// Lock-screen limit.
    pub lockscreen: WidgetLimit,
}

impl WidgetLimits {
    /// The limit that applies to `widget_type`.
    pub fn limit_for(&self, widget_type: WidgetType) -> WidgetLimit {
        match widget_type {
            WidgetType::Home => self.home,
            WidgetType::Lockscreen => self.lockscreen,
        }
    }

    /// Human-readable usage, e.g. `"1 of 1 used"`.
    pub fn usage_label(&self, widget_type: WidgetType, used: u32) -> String {
        format!("{} of {} used", used, self.limit_for(widget_type))
    }
}

/// Everything one tier is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    /// Widget count caps.
    pub widgets: WidgetLimits,
    /// Whether seconds-level countdowns are shown.
    pub can_show_seconds: bool,
    /// Sizes the user may actually place.
    pub allowed_widget_sizes: &'static [WidgetSize],
    /// Sizes the user may preview.
    pub previewable_widget_sizes: &'static [WidgetSize],
}

/// Free tier.
pub const FREE_LIMITS: TierLimits = TierLimits {
    widgets: WidgetLimits {
        home: WidgetLimit::Finite(1),
        lockscreen: WidgetLimit::Finite(1),
    },
    can_show_seconds: false,
    allowed_widget_sizes: &[WidgetSize::Small],
    previewable_widget_sizes: &WidgetSize::ALL,
};

/// Pro tier.
pub const PRO_LIMITS: TierLimits = TierLimits {
    widgets: WidgetLimits {
        home: WidgetLimit::Unlimited,
        lockscreen: WidgetLimit::Unlimited,
    },
    can_show_seconds: true,
    allowed_widget_sizes: &WidgetSize::ALL,
    previewable_widget_sizes: &WidgetSize::ALL,
};

impl TierLimits {
    /// Limits for an effective mode.
    pub fn for_mode(mode: EffectiveMode) -> &'static TierLimits {
        match mode {
            EffectiveMode::Free => &FREE_LIMITS,
            EffectiveMode::Pro => &PRO_LIMITS,
        }
    }

    /// Whether `size` may be placed.
    pub fn allows_size(&self, size: WidgetSize) -> bool {
        self.allowed_widget_sizes.contains(&size)
    }

    /// Whether `size` may be previewed.
    pub fn previews_size(&self, size: WidgetSize) -> bool {
        self.previewable_widget_sizes.contains(&size)
    }
}
