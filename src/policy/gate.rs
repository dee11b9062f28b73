//! App-side feature gate.
//!
//! `FeatureGate` resolves the effective entitlement from the build mode it
//! was constructed with and the purchase state passed to each query, then
//! answers through the tier tables in [`crate::policy::limits`].
//!
//! Every query is a pure function of `(mode, purchase_state, args)`. The
//! gate holds no purchase state of its own.

use crate::policy::limits::{
    AttemptType, LimitReason, TierLimits, WidgetLimits, WidgetSize, WidgetType,
};
use crate::policy::mode::{EffectiveMode, FeatureMode, ModeReport};
use crate::policy::GatePolicy;

/// Free/Pro policy for the main application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureGate {
    mode: FeatureMode,
}

impl FeatureGate {
    /// Create a gate for a build mode.
    pub fn new(mode: FeatureMode) -> Self {
        Self { mode }
    }

    /// The build mode this gate was created with.
    pub fn build_mode(&self) -> FeatureMode {
        self.mode
    }

    /// Whether Pro behavior applies for `purchase_state`.
    ///
    /// `FREE` and `PRO` build modes win unconditionally; `NORMAL` returns
    /// `purchase_state` unchanged.
    pub fn is_pro_effective(&self, purchase_state: bool) -> bool {
        let is_pro = match self.mode {
            FeatureMode::Pro => true,
            FeatureMode::Free => false,
            FeatureMode::Normal => purchase_state,
        };
        tracing::trace!(mode = %self.mode, purchase_state, is_pro, "resolved entitlement");
        is_pro
    }

    fn limits(&self, purchase_state: bool) -> &'static TierLimits {
        TierLimits::for_mode(self.effective_mode(purchase_state))
    }

    fn effective_mode(&self, purchase_state: bool) -> EffectiveMode {
        EffectiveMode::from_entitlement(self.is_pro_effective(purchase_state))
    }

    /// Whether another widget of `widget_type` may be added.
    pub fn can_add_widget(
        &self,
        current_home_count: u32,
        current_lock_count: u32,
        widget_type: WidgetType,
        purchase_state: bool,
    ) -> bool {
        let current = widget_type.select(current_home_count, current_lock_count);
        self.limits(purchase_state)
            .widgets
            .limit_for(widget_type)
            .allows(current)
    }

    /// Whether the countdown may show seconds.
    pub fn can_show_seconds(&self, purchase_state: bool) -> bool {
        self.limits(purchase_state).can_show_seconds
    }

    /// Whether a widget of `size` may actually be placed.
    pub fn is_widget_size_usable(&self, size: WidgetSize, purchase_state: bool) -> bool {
        self.limits(purchase_state).allows_size(size)
    }

    /// Whether a widget of `size` may be previewed. Always true: users see
    /// what Pro unlocks before buying.
    pub fn is_widget_size_previewable(&self, size: WidgetSize, purchase_state: bool) -> bool {
        self.limits(purchase_state).previews_size(size)
    }

    /// Sizes that may be placed, smallest first.
    pub fn usable_widget_sizes(&self, purchase_state: bool) -> &'static [WidgetSize] {
        self.limits(purchase_state).allowed_widget_sizes
    }

    /// Home and lock-screen limits for display.
    pub fn widget_limits(&self, purchase_state: bool) -> WidgetLimits {
        self.limits(purchase_state).widgets
    }

    /// Why `attempt` would be denied, or `None` if it is allowed.
    ///
    /// A widget attempt without a `widget_type` has nothing to check and
    /// returns `None`.
    pub fn limit_reason(
        &self,
        current_home_count: u32,
        current_lock_count: u32,
        attempt: AttemptType,
        widget_type: Option<WidgetType>,
        purchase_state: bool,
    ) -> Option<LimitReason> {
        if self.is_pro_effective(purchase_state) {
            return None;
        }

        match (attempt, widget_type) {
            (AttemptType::Widget, Some(widget_type)) => {
                let can_add = self.can_add_widget(
                    current_home_count,
                    current_lock_count,
                    widget_type,
                    purchase_state,
                );
                (!can_add).then_some(LimitReason::Widget)
            }
            (AttemptType::Widget, None) => None,
            (AttemptType::Seconds, _) => {
                (!self.can_show_seconds(purchase_state)).then_some(LimitReason::Seconds)
            }
        }
    }

    /// Build mode and effective mode, for logging and debug screens.
    pub fn current_mode(&self, purchase_state: bool) -> ModeReport {
        ModeReport {
            build_mode: self.mode,
            effective_mode: self.effective_mode(purchase_state),
        }
    }
}

impl GatePolicy for FeatureGate {
    fn build_mode(&self) -> FeatureMode {
        self.mode
    }

    fn is_pro_effective(&self, purchase_state: bool) -> bool {
        FeatureGate::is_pro_effective(self, purchase_state)
    }

    fn can_add_widget(
        &self,
        current_home_count: u32,
        current_lock_count: u32,
        widget_type: WidgetType,
        purchase_state: bool,
    ) -> bool {
        FeatureGate::can_add_widget(
            self,
            current_home_count,
            current_lock_count,
            widget_type,
            purchase_state,
        )
    }

    fn can_show_seconds(&self, purchase_state: bool) -> bool {
        FeatureGate::can_show_seconds(self, purchase_state)
    }

    fn is_widget_size_usable(&self, size: WidgetSize, purchase_state: bool) -> bool {
        FeatureGate::is_widget_size_usable(self, size, purchase_state)
    }

    fn is_widget_size_previewable(&self, size: WidgetSize, purchase_state: bool) -> bool {
        FeatureGate::is_widget_size_previewable(self, size, purchase_state)
    }

    fn widget_limits(&self, purchase_state: bool) -> WidgetLimits {
        FeatureGate::widget_limits(self, purchase_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::limits::WidgetLimit;

    fn normal() -> FeatureGate {
        FeatureGate::new(FeatureMode::Normal)
    }

    #[test]
    fn test_build_override_wins() {
        for purchase_state in [true, false] {
            assert!(!FeatureGate::new(FeatureMode::Free).is_pro_effective(purchase_state));
            assert!(FeatureGate::new(FeatureMode::Pro).is_pro_effective(purchase_state));
            assert_eq!(normal().is_pro_effective(purchase_state), purchase_state);
        }
    }

    #[test]
    fn test_free_widget_ceiling() {
        let gate = normal();
        assert!(gate.can_add_widget(0, 0, WidgetType::Home, false));
        assert!(!gate.can_add_widget(1, 0, WidgetType::Home, false));
        assert!(gate.can_add_widget(1, 0, WidgetType::Lockscreen, false));
        assert!(!gate.can_add_widget(1, 1, WidgetType::Lockscreen, false));
    }

    #[test]
    fn test_pro_widget_ceiling() {
        let gate = normal();
        for n in [0, 1, 2, 1_000, u32::MAX] {
            assert!(gate.can_add_widget(n, n, WidgetType::Home, true));
            assert!(gate.can_add_widget(n, n, WidgetType::Lockscreen, true));
        }
    }

    #[test]
    fn test_free_mode_ignores_purchase() {
        let gate = FeatureGate::new(FeatureMode::Free);
        assert!(!gate.can_add_widget(1, 0, WidgetType::Home, true));
        assert!(!gate.can_show_seconds(true));
        assert!(!gate.is_widget_size_usable(WidgetSize::Large, true));
    }

    #[test]
    fn test_seconds_follow_entitlement() {
        let gate = normal();
        assert!(!gate.can_show_seconds(false));
        assert!(gate.can_show_seconds(true));
        assert!(FeatureGate::new(FeatureMode::Pro).can_show_seconds(false));
    }

    #[test]
    fn test_size_usable_vs_previewable() {
        let gate = normal();
        assert!(gate.is_widget_size_usable(WidgetSize::Small, false));
        assert!(!gate.is_widget_size_usable(WidgetSize::Medium, false));
        assert!(gate.is_widget_size_usable(WidgetSize::Medium, true));
        for size in WidgetSize::ALL {
            assert!(gate.is_widget_size_previewable(size, false));
            assert!(gate.is_widget_size_previewable(size, true));
        }
    }

    #[test]
    fn test_usable_widget_sizes() {
        let gate = normal();
        assert_eq!(gate.usable_widget_sizes(false), &[WidgetSize::Small]);
        assert_eq!(gate.usable_widget_sizes(true), &WidgetSize::ALL);
    }

    #[test]
    fn test_widget_limits() {
        let gate = normal();
        let free = gate.widget_limits(false);
        assert_eq!(free.home, WidgetLimit::Finite(1));
        assert_eq!(free.lockscreen, WidgetLimit::Finite(1));

        let pro = gate.widget_limits(true);
        assert_eq!(pro.home, WidgetLimit::Unlimited);
        assert_eq!(pro.lockscreen, WidgetLimit::Unlimited);
    }

    #[test]
    fn test_limit_reason_widget() {
        let gate = normal();
        assert_eq!(
            gate.limit_reason(1, 0, AttemptType::Widget, Some(WidgetType::Home), false),
            Some(LimitReason::Widget)
        );
        assert_eq!(
            gate.limit_reason(0, 0, AttemptType::Widget, Some(WidgetType::Home), false),
            None
        );
        assert_eq!(gate.limit_reason(5, 5, AttemptType::Widget, None, false), None);
    }

    #[test]
    fn test_limit_reason_seconds() {
        let gate = normal();
        assert_eq!(
            gate.limit_reason(0, 0, AttemptType::Seconds, None, false),
            Some(LimitReason::Seconds)
        );
        assert_eq!(gate.limit_reason(0, 0, AttemptType::Seconds, None, true), None);
    }

    #[test]
    fn test_limit_reason_none_when_pro() {
        let gate = FeatureGate::new(FeatureMode::Pro);
        for attempt in [AttemptType::Widget, AttemptType::Seconds] {
            assert_eq!(
                gate.limit_reason(99, 99, attempt, Some(WidgetType::Home), false),
                None
            );
        }
    }

    #[test]
    fn test_current_mode() {
        let report = normal().current_mode(true);
        assert_eq!(report.build_mode, FeatureMode::Normal);
        assert_eq!(report.effective_mode, EffectiveMode::Pro);

        let report = FeatureGate::new(FeatureMode::Free).current_mode(true);
        assert_eq!(report.build_mode, FeatureMode::Free);
        assert_eq!(report.effective_mode, EffectiveMode::Free);
    }

    #[test]
    fn test_default_gate_is_normal() {
        assert_eq!(FeatureGate::default().build_mode(), FeatureMode::Normal);
    }
}
