use serde::{Deserialize, Serialize};

use super::{
    decode, encode, KeyValueStore, StorageResult, ALL_KEYS, APP_STATE_KEY, PROFILES_KEY,
    SETTINGS_KEY, SHORTCUTS_KEY, THEME_COLORS_KEY, THEME_KEY,
};
use crate::input::ShortcutBinding;
use crate::profile::Profile;
use crate::settings::SettingsPatch;
use crate::theme::ThemeColors;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelPosition {
    pub x: f64,
    pub y: f64,
}

/// Side-channel record so window placement does not ride on the settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppStateRecord {
    pub active_profile: Option<String>,
    pub panel_position: Option<PanelPosition>,
    pub auto_activate: bool,
}

/// Everything found in the store at startup. Absent or undecodable keys
/// stay `None`.
#[derive(Debug, Clone, Default)]
pub struct StoredState {
    pub settings: Option<SettingsPatch>,
    pub profiles: Option<Vec<Profile>>,
    pub theme: Option<String>,
    pub theme_colors: Option<ThemeColors>,
    pub app_state: Option<AppStateRecord>,
    pub shortcuts: Option<Vec<ShortcutBinding>>,
}

/// Typed, fire-and-forget wrapper over a [`KeyValueStore`].
#[derive(Debug)]
pub struct SettingsStore<S> {
    backend: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn load(&self) -> StoredState {
        let record = match self.backend.get(&ALL_KEYS) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(?err, "failed to load stored state; starting from defaults");
                return StoredState::default();
            }
        };
        StoredState {
            settings: decode(&record, SETTINGS_KEY),
            profiles: decode(&record, PROFILES_KEY),
            theme: decode(&record, THEME_KEY),
            theme_colors: decode(&record, THEME_COLORS_KEY),
            app_state: decode(&record, APP_STATE_KEY),
            shortcuts: decode(&record, SHORTCUTS_KEY),
        }
    }

    /// Writes one key. Failures are logged; in-memory state stays
    /// authoritative and the next save overwrites the whole value anyway.
    pub fn persist<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let result = encode(key, value).and_then(|record| self.backend.set(record));
        match result {
            Ok(()) => tracing::trace!(key, "persisted"),
            Err(err) => tracing::warn!(?err, key, "failed to persist value"),
        }
    }

    pub fn forget_all(&mut self) -> StorageResult<()> {
        for key in ALL_KEYS {
            self.backend.remove(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn load_collects_each_key_independently() {
        let mut store = SettingsStore::new(MemoryStore::new());
        store.persist(THEME_KEY, "light");
        store.persist(APP_STATE_KEY, &json!({"panelPosition": {"x": 10.0, "y": 20.0}}));
        store.persist(PROFILES_KEY, &json!("not a list"));

        let loaded = store.load();
        assert_eq!(loaded.theme.as_deref(), Some("light"));
        assert_eq!(
            loaded.app_state,
            Some(AppStateRecord {
                active_profile: None,
                panel_position: Some(PanelPosition { x: 10.0, y: 20.0 }),
                auto_activate: false,
            })
        );
        assert!(loaded.profiles.is_none());
        assert!(loaded.settings.is_none());
    }

    #[test]
    fn persist_swallows_backend_failures() {
        let mut store = SettingsStore::new(MemoryStore::new());
        store.backend_mut().set_unavailable(true);
        store.persist(THEME_KEY, "dark");

        store.backend_mut().set_unavailable(false);
        assert!(store.backend().raw(THEME_KEY).is_none());
        assert!(store.load().theme.is_none());
    }

    #[test]
    fn forget_all_removes_every_key() {
        let mut store = SettingsStore::new(MemoryStore::new());
        store.persist(THEME_KEY, "dark");
        store.persist(SETTINGS_KEY, &json!({"brightness": 1}));

        store.forget_all().expect("memory store should remove keys");
        assert!(store.backend().raw(THEME_KEY).is_none());
        assert!(store.backend().raw(SETTINGS_KEY).is_none());
    }
}
