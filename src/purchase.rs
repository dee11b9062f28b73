//! Purchase and restore entry points, plus upgrade-prompt state.
//!
//! There is no store integration: purchasing always reports
//! [`GateError::PurchaseUnavailable`], and restoring reads the purchase
//! flag already persisted in user settings.

use crate::policy::limits::LimitReason;
use crate::store::events::EventStore;
use crate::store::kv::KeyValueStore;
use crate::GateError;

/// Result of a restore attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A previous Pro purchase was found.
    Restored,
    /// Nothing to restore.
    NothingToRestore,
}

/// Source of purchase events that flip the runtime purchase state.
pub trait PurchaseProvider {
    /// Buy Pro.
    fn purchase_pro(&mut self) -> Result<(), GateError>;

    /// Restore an earlier Pro purchase.
    fn restore_purchases(&mut self) -> Result<RestoreOutcome, GateError>;
}

/// Placeholder provider backed by the event store's settings.
pub struct StubPurchaseProvider<'a, S> {
    store: &'a EventStore<S>,
}

impl<'a, S: KeyValueStore> StubPurchaseProvider<'a, S> {
    /// Wrap an event store.
    pub fn new(store: &'a EventStore<S>) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> PurchaseProvider for StubPurchaseProvider<'_, S> {
    fn purchase_pro(&mut self) -> Result<(), GateError> {
        tracing::debug!("purchase requested, store integration not available");
        Err(GateError::PurchaseUnavailable)
    }

    fn restore_purchases(&mut self) -> Result<RestoreOutcome, GateError> {
        let outcome = if self.store.purchase_state()? {
            RestoreOutcome::Restored
        } else {
            RestoreOutcome::NothingToRestore
        };
        tracing::debug!(?outcome, "restore purchases");
        Ok(outcome)
    }
}

/// Open/closed state of the upgrade prompt and why it was opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpgradePrompt {
    open: bool,
    reason: Option<LimitReason>,
}

impl UpgradePrompt {
    /// A closed prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the prompt, optionally for a specific denial.
    pub fn show(&mut self, reason: Option<LimitReason>) {
        self.open = true;
        self.reason = reason;
    }

    /// Open the prompt if `reason` is a denial; returns whether it opened.
    pub fn show_if_limited(&mut self, reason: Option<LimitReason>) -> bool {
        if reason.is_some() {
            self.show(reason);
        }
        reason.is_some()
    }

    /// Close the prompt and forget the reason.
    pub fn hide(&mut self) {
        self.open = false;
        self.reason = None;
    }

    /// Whether the prompt is showing.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The denial that opened the prompt, if any.
    pub fn reason(&self) -> Option<LimitReason> {
        self.reason
    }

    /// Headline for the current reason.
    pub fn headline(&self) -> &'static str {
        match self.reason {
            Some(LimitReason::Widget) => "Widget limit",
            Some(LimitReason::Seconds) => "Seconds countdown",
            None => "Upgrade to PRO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::events::UserSettings;
    use crate::store::kv::MemoryStore;

    #[test]
    fn test_purchase_is_unavailable() {
        let store = EventStore::new(MemoryStore::new());
        let mut provider = StubPurchaseProvider::new(&store);
        assert!(matches!(provider.purchase_pro(), Err(GateError::PurchaseUnavailable)));
    }

    #[test]
    fn test_restore_reads_settings() {
        let mut store = EventStore::new(MemoryStore::new());
        {
            let mut provider = StubPurchaseProvider::new(&store);
            assert_eq!(provider.restore_purchases().unwrap(), RestoreOutcome::NothingToRestore);
        }

        store
            .save_settings(&UserSettings {
                is_pro: true,
                ..UserSettings::default()
            })
            .unwrap();
        let mut provider = StubPurchaseProvider::new(&store);
        assert_eq!(provider.restore_purchases().unwrap(), RestoreOutcome::Restored);
    }

    #[test]
    fn test_prompt_show_hide() {
        let mut prompt = UpgradePrompt::new();
        assert!(!prompt.is_open());

        prompt.show(Some(LimitReason::Seconds));
        assert!(prompt.is_open());
        assert_eq!(prompt.reason(), Some(LimitReason::Seconds));
        assert_eq!(prompt.headline(), "Seconds countdown");

        prompt.hide();
        assert!(!prompt.is_open());
        assert_eq!(prompt.reason(), None);
    }

    #[test]
    fn test_prompt_show_if_limited() {
        let mut prompt = UpgradePrompt::new();
        assert!(!prompt.show_if_limited(None));
        assert!(!prompt.is_open());

        assert!(prompt.show_if_limited(Some(LimitReason::Widget)));
        assert_eq!(prompt.headline(), "Widget limit");
    }
}
