//! Free/Pro policy layer.
//!
//! The app-side [`gate::FeatureGate`] and the widget extension's
//! [`crate::widget::policy::WidgetPolicy`] are separate implementations of
//! the same rules. [`GatePolicy`] is the query surface they share; the
//! conformance fixture is written against it.

pub mod gate;
pub mod limits;
pub mod mode;

use limits::{WidgetLimits, WidgetSize, WidgetType};
use mode::FeatureMode;

/// Queries every runtime embedding the policy must answer identically.
pub trait GatePolicy: Send + Sync {
    /// The build mode compiled into this runtime.
    fn build_mode(&self) -> FeatureMode;

    /// Whether Pro behavior applies.
    fn is_pro_effective(&self, purchase_state: bool) -> bool;

    /// Whether another widget of `widget_type` may be added.
    fn can_add_widget(
        &self,
        current_home_count: u32,
        current_lock_count: u32,
        widget_type: WidgetType,
        purchase_state: bool,
    ) -> bool;

    /// Whether seconds may be displayed.
    fn can_show_seconds(&self, purchase_state: bool) -> bool;

    /// Whether `size` may be placed.
    fn is_widget_size_usable(&self, size: WidgetSize, purchase_state: bool) -> bool;

    /// Whether `size` may be previewed.
    fn is_widget_size_previewable(&self, size: WidgetSize, purchase_state: bool) -> bool;

    /// Widget count limits.
    fn widget_limits(&self, purchase_state: bool) -> WidgetLimits;
}
