//! # Countgate
//!
//! **Free/Pro feature gating for an idol countdown app and its widgets.**
//!
//! Countgate decides which features a user gets from two inputs: a
//! build-time `FEATURE_MODE` (`FREE`, `PRO` or `NORMAL`) and the runtime
//! purchase state. The app and its widget extension run in separate
//! processes, so each embeds its own copy of the policy; a shared set of
//! test vectors keeps the two in agreement.
//!
//! ## Features
//!
//! - **Build override**: `FREE`/`PRO` builds ignore the purchase state,
//!   `NORMAL` builds follow it
//! - **Widget limits**: one home and one lock-screen widget on Free,
//!   unlimited on Pro
//! - **Widget sizes**: Free places small widgets only, every size can be
//!   previewed
//! - **Seconds countdown**: Pro only
//! - **Conformance vectors**: one fixture, run against every runtime
//!
//! ## Quickstart
//!
//! ```
//! use countgate::{AttemptType, GateConfig, LimitReason, WidgetType};
//!
//! let gate = GateConfig::from_mode_str(Some("NORMAL")).gate();
//! let purchased = false;
//!
//! assert!(gate.can_add_widget(0, 0, WidgetType::Home, purchased));
//! assert_eq!(
//!     gate.limit_reason(1, 0, AttemptType::Widget, Some(WidgetType::Home), purchased),
//!     Some(LimitReason::Widget)
//! );
//! assert!(!gate.can_show_seconds(purchased));
//! ```
//!
//! ## Configuration
//!
//! - `FEATURE_MODE`: baked in at compile time and read with
//!   [`GateConfig::from_build`]. Unset or unrecognized values mean `NORMAL`.
//! - `store_namespace`: data directory for persisted events and settings
//!
//! See [`GateConfig`] for full documentation.

#![warn(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;

// Policy layer
pub mod policy;

// Widget extension runtime
pub mod widget;

// Cross-runtime agreement
pub mod conformance;

// Collaborators
pub mod countdown;
pub mod purchase;
pub mod store;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::GateConfig;
pub use errors::GateError;
pub use policy::gate::FeatureGate;
pub use policy::limits::{
    AttemptType, LimitReason, WidgetLimit, WidgetLimits, WidgetSize, WidgetType,
};
pub use policy::mode::{EffectiveMode, FeatureMode, ModeReport};
pub use policy::GatePolicy;
pub use widget::policy::{BundleInfo, WidgetPolicy};

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
