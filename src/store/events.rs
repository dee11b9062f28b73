//! Countdown events and user settings over a key-value store.

use crate::policy::limits::LimitReason;
use crate::policy::GatePolicy;
use crate::store::kv::KeyValueStore;
use crate::GateError;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Storage key for the event list.
pub const EVENTS_KEY: &str = "idolCountdownEvents";

/// Storage key for user settings.
pub const SETTINGS_KEY: &str = "idolCountdownSettings";

/// Prefix of the per-event widget seconds keys.
pub const WIDGET_SECONDS_KEY_PREFIX: &str = "widget_showSeconds_";

/// Offset-less formats written by the app's date picker.
const LOCAL_DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Storage key for one event's widget seconds preference.
pub fn widget_seconds_key(event_id: &str) -> String {
    format!("{}{}", WIDGET_SECONDS_KEY_PREFIX, event_id)
}

/// A tracked countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownEvent {
    /// Unique id.
    pub id: String,
    /// Display title, e.g. `"[IVE] Comeback"`.
    pub title: String,
    /// Secondary line under the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Target timestamp, RFC 3339.
    pub date: String,
    /// Accent color, `#RRGGBB`.
    pub color: String,
    /// Icon name or emoji.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Event type preset id (comeback, concert, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Artist preset id (bts, ive, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_preset: Option<String>,
    /// Free-text artist, used with the Pro-only custom artist preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_artist_name: Option<String>,
    /// Free-text event type, used with the Pro-only custom event preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_event_name: Option<String>,
}

impl CountdownEvent {
    /// Event with only the required fields set.
    pub fn new(id: &str, title: &str, date: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: None,
            date: date.to_string(),
            color: color.to_string(),
            emoji: None,
            event_type: None,
            artist_preset: None,
            custom_artist_name: None,
            custom_event_name: None,
        }
    }

    /// Parse the target timestamp, reading offset-less dates in local time.
    pub fn target(&self) -> Result<DateTime<FixedOffset>, GateError> {
        self.target_in(&Local)
    }

    /// Parse the target timestamp.
    ///
    /// RFC 3339 dates carry their own offset. `YYYY-MM-DDTHH:MM[:SS]` dates
    /// are wall-clock times in `tz`.
    pub fn target_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<FixedOffset>, GateError> {
        if let Ok(target) = DateTime::parse_from_rfc3339(&self.date) {
            return Ok(target);
        }

        let naive = LOCAL_DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&self.date, format).ok())
            .ok_or_else(|| self.invalid_date())?;
        let local = tz
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| self.invalid_date())?;
        Ok(local.with_timezone(&local.offset().fix()))
    }

    fn invalid_date(&self) -> GateError {
        GateError::InvalidEventDate {
            id: self.id.clone(),
            date: self.date.clone(),
        }
    }

    /// Artist name from a bracketed title prefix, `"[IVE] Comeback"` -> `"IVE"`.
    pub fn artist_name(&self) -> Option<&str> {
        let rest = self.title.strip_prefix('[')?;
        let end = rest.find(']')?;
        Some(&rest[..end])
    }

    /// Title without the bracketed artist prefix.
    pub fn event_title(&self) -> &str {
        match self.artist_name() {
            Some(artist) => self.title[artist.len() + 2..].trim_start(),
            None => &self.title,
        }
    }
}

/// Persisted user preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    /// Runtime purchase flag fed to the gate.
    pub is_pro: bool,
    /// Theme ids the user has unlocked.
    pub unlocked_themes: Vec<String>,
    /// User wants seconds shown; still subject to the gate.
    pub show_seconds: bool,
    /// Lock-screen widget enabled.
    pub lock_screen_widget: bool,
}

/// Event list and settings persisted in a [`KeyValueStore`].
pub struct EventStore<S> {
    store: S,
}

impl<S: KeyValueStore> EventStore<S> {
    /// Wrap a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Give back the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, GateError> {
        match self.store.get(key)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| GateError::StoreIO(format!("Failed to parse {}: {}", key, e))),
            None => Ok(T::default()),
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), GateError> {
        let json = serde_json::to_string(value)
            .map_err(|e| GateError::StoreIO(format!("Failed to serialize {}: {}", key, e)))?;
        self.store.set(key, &json)
    }

    /// All events, in insertion order.
    pub fn events(&self) -> Result<Vec<CountdownEvent>, GateError> {
        self.load(EVENTS_KEY)
    }

    /// All events ordered by target instant. Equal targets keep insertion
    /// order.
    pub fn upcoming<Tz: TimeZone>(&self, tz: &Tz) -> Result<Vec<CountdownEvent>, GateError> {
        Ok(self
            .sorted_with_targets(tz)?
            .into_iter()
            .map(|(_, event)| event)
            .collect())
    }

    /// The soonest event that has not started yet as of `now`.
    pub fn next_event(
        &self,
        now: &DateTime<FixedOffset>,
    ) -> Result<Option<CountdownEvent>, GateError> {
        Ok(self
            .sorted_with_targets(&now.timezone())?
            .into_iter()
            .find(|(target, _)| target >= now)
            .map(|(_, event)| event))
    }

    fn sorted_with_targets<Tz: TimeZone>(
        &self,
        tz: &Tz,
    ) -> Result<Vec<(DateTime<FixedOffset>, CountdownEvent)>, GateError> {
        let mut pairs = self
            .events()?
            .into_iter()
            .map(|event| Ok((event.target_in(tz)?, event)))
            .collect::<Result<Vec<_>, GateError>>()?;
        pairs.sort_by_key(|(target, _)| *target);
        Ok(pairs)
    }

    /// Look up one event.
    pub fn event(&self, id: &str) -> Result<Option<CountdownEvent>, GateError> {
        Ok(self.events()?.into_iter().find(|e| e.id == id))
    }

    /// Append an event. Ids must be unique.
    pub fn add_event(&mut self, event: CountdownEvent) -> Result<(), GateError> {
        let mut events = self.events()?;
        if events.iter().any(|e| e.id == event.id) {
            return Err(GateError::DuplicateEvent { id: event.id });
        }
        tracing::debug!(id = %event.id, "adding event");
        events.push(event);
        self.save(EVENTS_KEY, &events)
    }

    /// Replace the event with the same id.
    pub fn update_event(&mut self, event: CountdownEvent) -> Result<(), GateError> {
        let mut events = self.events()?;
        let slot = events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| GateError::EventNotFound {
                id: event.id.clone(),
            })?;
        *slot = event;
        self.save(EVENTS_KEY, &events)
    }

    /// Delete an event by id and return it.
    pub fn delete_event(&mut self, id: &str) -> Result<CountdownEvent, GateError> {
        let mut events = self.events()?;
        let index = events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| GateError::EventNotFound { id: id.to_string() })?;
        let removed = events.remove(index);
        tracing::debug!(id, "deleted event");
        self.save(EVENTS_KEY, &events)?;
        self.store.remove(&widget_seconds_key(id))?;
        Ok(removed)
    }

    /// Current settings, defaults if none were saved.
    pub fn settings(&self) -> Result<UserSettings, GateError> {
        self.load(SETTINGS_KEY)
    }

    /// Persist settings.
    pub fn save_settings(&mut self, settings: &UserSettings) -> Result<(), GateError> {
        self.save(SETTINGS_KEY, settings)
    }

    /// The runtime purchase flag to pass to the gate.
    pub fn purchase_state(&self) -> Result<bool, GateError> {
        Ok(self.settings()?.is_pro)
    }

    /// Turn the seconds preference on or off.
    ///
    /// Turning it on when the gate denies seconds fails with
    /// `LimitReached { reason: Seconds }` and leaves settings untouched.
    pub fn set_show_seconds<P: GatePolicy + ?Sized>(
        &mut self,
        policy: &P,
        show_seconds: bool,
    ) -> Result<(), GateError> {
        let mut settings = self.settings()?;
        if show_seconds && !policy.can_show_seconds(settings.is_pro) {
            return Err(GateError::LimitReached {
                reason: LimitReason::Seconds,
            });
        }
        settings.show_seconds = show_seconds;
        self.save_settings(&settings)
    }

    /// Whether the widget for `event` should tick seconds as of `now`.
    ///
    /// Past events never do. Unset preferences default to off.
    pub fn widget_show_seconds(
        &self,
        event: &CountdownEvent,
        now: &DateTime<FixedOffset>,
    ) -> Result<bool, GateError> {
        if event.target_in(&now.timezone())? < *now {
            return Ok(false);
        }
        let key = widget_seconds_key(&event.id);
        match self.store.get(&key)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| GateError::StoreIO(format!("Failed to parse {}: {}", key, e))),
            None => Ok(false),
        }
    }

    /// Set the widget seconds preference for one event.
    ///
    /// Turning it on when the gate denies seconds fails with
    /// `LimitReached { reason: Seconds }`. Turning it off always succeeds.
    pub fn set_widget_show_seconds<P: GatePolicy + ?Sized>(
        &mut self,
        policy: &P,
        event_id: &str,
        show_seconds: bool,
    ) -> Result<(), GateError> {
        if self.event(event_id)?.is_none() {
            return Err(GateError::EventNotFound {
                id: event_id.to_string(),
            });
        }
        if show_seconds && !policy.can_show_seconds(self.purchase_state()?) {
            return Err(GateError::LimitReached {
                reason: LimitReason::Seconds,
            });
        }
        self.save(&widget_seconds_key(event_id), &show_seconds)
    }
}
