//! Policy properties checked over the whole input domain.

use countgate::{
    AttemptType, FeatureGate, FeatureMode, GatePolicy, LimitReason, WidgetPolicy, WidgetSize,
    WidgetType,
};

const PURCHASE_STATES: [bool; 2] = [false, true];
const COUNTS: [u32; 6] = [0, 1, 2, 3, 50, u32::MAX];

fn policies(mode: FeatureMode) -> [Box<dyn GatePolicy>; 2] {
    [Box::new(FeatureGate::new(mode)), Box::new(WidgetPolicy::new(mode))]
}

#[test]
fn build_mode_overrides_purchase_state() {
    for purchase_state in PURCHASE_STATES {
        for policy in policies(FeatureMode::Free) {
            assert!(!policy.is_pro_effective(purchase_state));
        }
        for policy in policies(FeatureMode::Pro) {
            assert!(policy.is_pro_effective(purchase_state));
        }
        for policy in policies(FeatureMode::Normal) {
            assert_eq!(policy.is_pro_effective(purchase_state), purchase_state);
        }
    }
}

#[test]
fn pro_is_a_superset_of_free() {
    for mode in FeatureMode::ALL {
        for purchase_state in PURCHASE_STATES {
            for policy in policies(mode) {
                if !policy.is_pro_effective(purchase_state) {
                    continue;
                }
                assert!(policy.can_show_seconds(purchase_state));
                for size in WidgetSize::ALL {
                    assert!(policy.is_widget_size_usable(size, purchase_state));
                }
            }
        }
    }
}

#[test]
fn free_ceiling() {
    for policy in policies(FeatureMode::Normal) {
        assert!(!policy.can_add_widget(1, 0, WidgetType::Home, false));
        assert!(policy.can_add_widget(0, 0, WidgetType::Home, false));
    }
}

#[test]
fn pro_ceiling() {
    for policy in policies(FeatureMode::Normal) {
        for n in COUNTS {
            for widget_type in WidgetType::ALL {
                assert!(policy.can_add_widget(n, n, widget_type, true));
            }
        }
    }
}

#[test]
fn preview_is_unrestricted_but_use_is_gated() {
    for mode in FeatureMode::ALL {
        for purchase_state in PURCHASE_STATES {
            for policy in policies(mode) {
                for size in WidgetSize::ALL {
                    assert!(policy.is_widget_size_previewable(size, purchase_state));
                }
            }
        }
    }
    for policy in policies(FeatureMode::Normal) {
        assert!(!policy.is_widget_size_usable(WidgetSize::Medium, false));
        assert!(policy.is_widget_size_usable(WidgetSize::Medium, true));
    }
}

#[test]
fn limit_reason_is_none_when_pro() {
    for mode in FeatureMode::ALL {
        let gate = FeatureGate::new(mode);
        for purchase_state in PURCHASE_STATES {
            if !gate.is_pro_effective(purchase_state) {
                continue;
            }
            for home in COUNTS {
                for lock in COUNTS {
                    for attempt in [AttemptType::Widget, AttemptType::Seconds] {
                        for widget_type in [None, Some(WidgetType::Home), Some(WidgetType::Lockscreen)] {
                            assert_eq!(
                                gate.limit_reason(home, lock, attempt, widget_type, purchase_state),
                                None
                            );
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn limit_reason_examples() {
    let gate = FeatureGate::new(FeatureMode::Normal);
    assert_eq!(
        gate.limit_reason(1, 0, AttemptType::Widget, Some(WidgetType::Home), false),
        Some(LimitReason::Widget)
    );
    assert_eq!(
        gate.limit_reason(0, 0, AttemptType::Widget, Some(WidgetType::Home), false),
        None
    );
    for (home, lock) in [(0, 0), (3, 9)] {
        assert_eq!(
            gate.limit_reason(home, lock, AttemptType::Seconds, None, false),
            Some(LimitReason::Seconds)
        );
        assert_eq!(gate.limit_reason(home, lock, AttemptType::Seconds, None, true), None);
    }
}

#[test]
fn limit_reason_agrees_with_can_add_widget() {
    let gate = FeatureGate::new(FeatureMode::Normal);
    for purchase_state in PURCHASE_STATES {
        for home in COUNTS {
            for lock in COUNTS {
                for widget_type in WidgetType::ALL {
                    let reason = gate.limit_reason(
                        home,
                        lock,
                        AttemptType::Widget,
                        Some(widget_type),
                        purchase_state,
                    );
                    let allowed = gate.can_add_widget(home, lock, widget_type, purchase_state);
                    assert_eq!(reason.is_none(), allowed);
                }
            }
        }
    }
}

#[test]
fn queries_are_idempotent() {
    for mode in FeatureMode::ALL {
        let gate = FeatureGate::new(mode);
        for purchase_state in PURCHASE_STATES {
            assert_eq!(gate.current_mode(purchase_state), gate.current_mode(purchase_state));
            assert_eq!(gate.widget_limits(purchase_state), gate.widget_limits(purchase_state));
            assert_eq!(
                gate.usable_widget_sizes(purchase_state),
                gate.usable_widget_sizes(purchase_state)
            );
            for size in WidgetSize::ALL {
                assert_eq!(
                    gate.is_widget_size_usable(size, purchase_state),
                    gate.is_widget_size_usable(size, purchase_state)
                );
            }
        }
    }
}

#[test]
fn alternating_purchase_state_never_reads_stale_entitlement() {
    let gate = FeatureGate::new(FeatureMode::Normal);
    for _ in 0..3 {
        assert!(gate.can_show_seconds(true));
        assert!(!gate.can_show_seconds(false));
        assert!(gate.can_add_widget(1, 1, WidgetType::Home, true));
        assert!(!gate.can_add_widget(1, 1, WidgetType::Home, false));
    }
}

#[test]
fn gate_is_shareable_across_threads() {
    let gate = FeatureGate::new(FeatureMode::Normal);
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let purchase_state = i % 2 == 0;
                (purchase_state, gate.can_show_seconds(purchase_state))
            })
        })
        .collect();
    for handle in handles {
        let (purchase_state, seconds) = handle.join().unwrap();
        assert_eq!(seconds, purchase_state);
    }
}
