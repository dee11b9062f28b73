//! Print what the gate allows for this build.
//!
//! # Running
//!
//! ```bash
//! FEATURE_MODE=FREE cargo run --example gate_report
//! ```
//!
//! # Note
//!
//! Shipped apps should read the mode with `GateConfig::from_build()`, which
//! uses the value compiled into the binary. This example reads the process
//! environment so different modes can be tried without rebuilding.

use countgate::store::events::{CountdownEvent, EventStore};
use countgate::store::kv::MemoryStore;
use countgate::store::placements::WidgetPlacements;
use countgate::{AttemptType, GateConfig, GateError, WidgetSize, WidgetType};

fn main() {
    let config = GateConfig::from_env();
    let gate = config.gate();

    for purchase_state in [false, true] {
        let report = gate.current_mode(purchase_state);
        println!(
            "purchased={} build={} effective={}",
            purchase_state, report.build_mode, report.effective_mode
        );

        let limits = gate.widget_limits(purchase_state);
        println!("  home:       {}", limits.usage_label(WidgetType::Home, 0));
        println!("  lockscreen: {}", limits.usage_label(WidgetType::Lockscreen, 0));
        println!("  seconds:    {}", gate.can_show_seconds(purchase_state));

        for size in WidgetSize::ALL {
            let usable = gate.is_widget_size_usable(size, purchase_state);
            println!("  {:<6} widget: {}", size, if usable { "usable" } else { "preview only" });
        }
    }

    // Walk a Free user into the widget limit.
    let mut events = EventStore::new(MemoryStore::new());
    if let Err(e) = events.add_event(CountdownEvent::new(
        "ive-comeback",
        "[IVE] Comeback",
        "2026-04-01T18:00:00+09:00",
        "#FF6B9D",
    )) {
        eprintln!("Could not save event: {}", e);
        std::process::exit(1);
    }

    let purchase_state = events.purchase_state().unwrap_or(false);
    let mut placements = WidgetPlacements::default();
    for attempt in 1..=2 {
        match placements.try_place(&gate, WidgetType::Home, purchase_state) {
            Ok(()) => println!("home widget #{} placed", attempt),
            Err(GateError::LimitReached { reason }) => {
                println!("home widget #{} denied ({}), show upgrade prompt", attempt, reason);
            }
            Err(e) => eprintln!("Unexpected error: {}", e),
        }
    }

    let reason = gate.limit_reason(
        placements.home,
        placements.lockscreen,
        AttemptType::Seconds,
        None,
        purchase_state,
    );
    println!("seconds limit reason: {:?}", reason);
}
