//! Placed widget counts, the input to `can_add_widget`.

use crate::policy::limits::{LimitReason, WidgetType};
use crate::policy::GatePolicy;
use crate::store::kv::KeyValueStore;
use crate::GateError;
use serde::{Deserialize, Serialize};

/// Storage key for widget placement counts.
pub const PLACEMENTS_KEY: &str = "idolCountdownWidgets";

/// How many widgets of each type are currently placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetPlacements {
    /// Home-screen widgets.
    pub home: u32,
    /// Lock-screen widgets.
    pub lockscreen: u32,
}

impl WidgetPlacements {
    /// Load counts from `store`, zero if never saved.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, GateError> {
        match store.get(PLACEMENTS_KEY)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                GateError::StoreIO(format!("Failed to parse widget placements: {}", e))
            }),
            None => Ok(Self::default()),
        }
    }

    /// Persist counts to `store`.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), GateError> {
        let json = serde_json::to_string(self).map_err(|e| {
            GateError::StoreIO(format!("Failed to serialize widget placements: {}", e))
        })?;
        store.set(PLACEMENTS_KEY, &json)
    }

    /// Count for one widget type.
    pub fn count(&self, widget_type: WidgetType) -> u32 {
        widget_type.select(self.home, self.lockscreen)
    }

    fn slot(&mut self, widget_type: WidgetType) -> &mut u32 {
        match widget_type {
            WidgetType::Home => &mut self.home,
            WidgetType::Lockscreen => &mut self.lockscreen,
        }
    }

    /// Record a new widget if the policy allows one more.
    ///
    /// On denial nothing changes and the error carries
    /// [`LimitReason::Widget`] for the upgrade prompt.
    pub fn try_place<P: GatePolicy + ?Sized>(
        &mut self,
        policy: &P,
        widget_type: WidgetType,
        purchase_state: bool,
    ) -> Result<(), GateError> {
        if !policy.can_add_widget(self.home, self.lockscreen, widget_type, purchase_state) {
            tracing::debug!(%widget_type, home = self.home, lockscreen = self.lockscreen, "widget limit reached");
            return Err(GateError::LimitReached {
                reason: LimitReason::Widget,
            });
        }
        let slot = self.slot(widget_type);
        *slot = slot.saturating_add(1);
        tracing::debug!(%widget_type, count = *slot, "placed widget");
        Ok(())
    }

    /// Record a removed widget. Never goes below zero.
    pub fn remove(&mut self, widget_type: WidgetType) {
        let slot = self.slot(widget_type);
        *slot = slot.saturating_sub(1);
    }
}
