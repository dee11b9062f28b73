//! Persisted app state: events, settings, and widget placements.

pub mod events;
pub mod kv;
pub mod placements;
pub mod presets;
