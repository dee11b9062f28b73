//! Built-in event type and artist presets, plus user-defined ones.

use crate::clock::Clock;
use crate::policy::GatePolicy;
use crate::store::kv::KeyValueStore;
use crate::GateError;
use serde::{Deserialize, Serialize};

/// Cap on user-defined presets of each kind.
pub const MAX_CUSTOM_PRESETS: usize = 10;

/// Storage key for custom artists.
pub const CUSTOM_ARTISTS_KEY: &str = "idolCountdownCustomArtists";

/// Storage key for custom event types.
pub const CUSTOM_EVENT_TYPES_KEY: &str = "idolCountdownCustomEventTypes";

/// A selectable preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Stable id stored on events.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Default accent color.
    pub color: &'static str,
    /// Whether only Pro users may pick it.
    pub pro_only: bool,
}

impl Preset {
    const fn free(id: &'static str, label: &'static str, color: &'static str) -> Self {
        Self {
            id,
            label,
            color,
            pro_only: false,
        }
    }

    const fn pro(id: &'static str, label: &'static str, color: &'static str) -> Self {
        Self {
            id,
            label,
            color,
            pro_only: true,
        }
    }

    /// Whether the preset may be selected for `purchase_state`.
    pub fn is_usable<P: GatePolicy + ?Sized>(&self, policy: &P, purchase_state: bool) -> bool {
        !self.pro_only || policy.is_pro_effective(purchase_state)
    }
}

/// Event type presets.
pub const EVENT_TYPE_PRESETS: [Preset; 8] = [
    Preset::free("comeback", "Comeback", "#FF6B9D"),
    Preset::free("album", "Album Release", "#C44DFF"),
    Preset::free("concert", "Concert", "#4D9DFF"),
    Preset::free("fanmeeting", "Fanmeeting", "#FFB3D9"),
    Preset::free("debut", "Debut Anniversary", "#FFD84D"),
    Preset::free("discharge", "Military Discharge", "#FFD700"),
    Preset::free("birthday", "Birthday", "#FF6B4D"),
    Preset::pro("custom", "Custom", "#4DFFDF"),
];

/// Artist presets.
pub const ARTIST_PRESETS: [Preset; 5] = [
    Preset::free("bts", "BTS", "#C9B7FF"),
    Preset::free("ive", "IVE", "#FF6B9D"),
    Preset::free("newjeans", "NewJeans", "#A8D8FF"),
    Preset::free("seventeen", "SEVENTEEN", "#FFB8D1"),
    Preset::pro("custom", "Custom", "#E0E0E0"),
];

/// Find an event type preset by id.
pub fn event_type_preset(id: &str) -> Option<&'static Preset> {
    EVENT_TYPE_PRESETS.iter().find(|p| p.id == id)
}

/// Find an artist preset by id.
pub fn artist_preset(id: &str) -> Option<&'static Preset> {
    ARTIST_PRESETS.iter().find(|p| p.id == id)
}

/// Which preset list a custom entry extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    /// Artists.
    Artist,
    /// Event types.
    EventType,
}

impl PresetKind {
    /// Storage key for this kind's custom list.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Artist => CUSTOM_ARTISTS_KEY,
            Self::EventType => CUSTOM_EVENT_TYPES_KEY,
        }
    }

    /// Built-in presets of this kind.
    pub fn builtin(&self) -> &'static [Preset] {
        match self {
            Self::Artist => &ARTIST_PRESETS,
            Self::EventType => &EVENT_TYPE_PRESETS,
        }
    }

    /// Icon given to new entries.
    fn default_icon(&self) -> &'static str {
        match self {
            Self::Artist => "star",
            Self::EventType => "musical-notes",
        }
    }
}

/// A user-defined artist or event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPreset {
    /// `custom-<unix millis>`.
    pub id: String,
    /// Display name.
    #[serde(alias = "label")]
    pub name: String,
    /// Accent color, `#RRGGBB`.
    pub color: String,
    /// Icon name.
    #[serde(alias = "emoji")]
    pub icon: String,
}

/// The persisted custom list for one [`PresetKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomPresets {
    kind: PresetKind,
    items: Vec<CustomPreset>,
}

impl CustomPresets {
    /// Load the list for `kind`, empty if never saved.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, kind: PresetKind) -> Result<Self, GateError> {
        let items = match store.get(kind.storage_key())? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                GateError::StoreIO(format!("Failed to parse custom presets: {}", e))
            })?,
            None => Vec::new(),
        };
        Ok(Self { kind, items })
    }

    /// Persist the list.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), GateError> {
        let json = serde_json::to_string(&self.items).map_err(|e| {
            GateError::StoreIO(format!("Failed to serialize custom presets: {}", e))
        })?;
        store.set(self.kind.storage_key(), &json)
    }

    /// Entries in insertion order.
    pub fn items(&self) -> &[CustomPreset] {
        &self.items
    }

    /// Whether another entry fits.
    pub fn has_room(&self) -> bool {
        self.items.len() < MAX_CUSTOM_PRESETS
    }

    /// Add an entry and return it.
    ///
    /// Requires Pro, a non-blank name, and room under [`MAX_CUSTOM_PRESETS`].
    pub fn add<P: GatePolicy + ?Sized>(
        &mut self,
        policy: &P,
        purchase_state: bool,
        name: &str,
        color: &str,
        clock: &dyn Clock,
    ) -> Result<&CustomPreset, GateError> {
        if !policy.is_pro_effective(purchase_state) {
            return Err(GateError::ProRequired {
                feature: "custom presets",
            });
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(GateError::InvalidPreset("name cannot be empty".to_string()));
        }
        if !self.has_room() {
            return Err(GateError::CustomPresetLimit {
                max: MAX_CUSTOM_PRESETS,
            });
        }

        let mut id = format!("custom-{}", clock.now_utc().timestamp_millis());
        while self.items.iter().any(|p| p.id == id) {
            id.push('-');
        }
        tracing::debug!(%id, kind = ?self.kind, "adding custom preset");
        let index = self.items.len();
        self.items.push(CustomPreset {
            id,
            name: name.to_string(),
            color: color.to_string(),
            icon: self.kind.default_icon().to_string(),
        });
        Ok(&self.items[index])
    }

    /// Rename and recolor an entry.
    pub fn update(&mut self, id: &str, name: &str, color: &str) -> Result<(), GateError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GateError::InvalidPreset("name cannot be empty".to_string()));
        }
        let item = self
            .items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| GateError::InvalidPreset(format!("unknown id {:?}", id)))?;
        item.name = name.to_string();
        item.color = color.to_string();
        Ok(())
    }

    /// Remove an entry, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<CustomPreset> {
        let index = self.items.iter().position(|p| p.id == id)?;
        Some(self.items.remove(index))
    }

    /// Id to fall back to after removing the selected entry.
    pub fn fallback_id(&self) -> &'static str {
        self.kind.builtin()[0].id
    }
}
