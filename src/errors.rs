//! Countgate error types.

use crate::policy::limits::LimitReason;
use thiserror::Error;

/// Errors raised by the collaborators around the feature gate.
///
/// Gate queries themselves are total and never produce these.
#[derive(Debug, Error)]
pub enum GateError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Key-value store I/O error.
    #[error("Store I/O error: {0}")]
    StoreIO(String),

    /// A stored record does not match its digest or key.
    ///
    /// The digest is unkeyed, so this catches corruption and partial
    /// writes, not deliberate edits.
    #[error("Store integrity mismatch")]
    StoreIntegrity,

    /// No event with the given id exists.
    #[error("Event not found: {id}")]
    EventNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// An event with the given id already exists.
    #[error("Duplicate event id: {id}")]
    DuplicateEvent {
        /// The id that collided.
        id: String,
    },

    /// An event's date is neither RFC 3339 nor `YYYY-MM-DDTHH:MM`.
    #[error("Invalid date {date:?} on event {id}")]
    InvalidEventDate {
        /// The event id.
        id: String,
        /// The raw date value.
        date: String,
    },

    /// A gated action was denied for the current entitlement.
    #[error("Free limit reached: {reason}")]
    LimitReached {
        /// Why the action was denied, for the upgrade prompt.
        reason: LimitReason,
    },

    /// Only Pro users may use this feature.
    #[error("{feature} requires Pro")]
    ProRequired {
        /// What was attempted.
        feature: &'static str,
    },

    /// A custom preset list is full.
    #[error("At most {max} custom presets are allowed")]
    CustomPresetLimit {
        /// The cap.
        max: usize,
    },

    /// A custom preset name is empty or the id is unknown.
    #[error("Invalid custom preset: {0}")]
    InvalidPreset(String),

    /// In-app purchase is not available in this build.
    #[error("Pro purchase is not available yet")]
    PurchaseUnavailable,

    /// Conformance fixture could not be read or written.
    #[error("Fixture error: {0}")]
    FixtureError(String),
}
