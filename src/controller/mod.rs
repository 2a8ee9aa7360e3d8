use crate::apply::FilterApplier;
use crate::bundle::{parse_import, ExportBundle};
use crate::config::AppConfig;
use crate::dom::{DomTree, MutationRecord};
use crate::error::{AppError, AppResult};
use crate::input::{ShortcutAction, ShortcutBinding, ShortcutCombo, ShortcutTable};
use crate::media::MediaLocator;
use crate::profile::{load_into, Profile, ProfileList, ProfileSelection};
use crate::settings::{Control, Flag, Settings};
use crate::state::{PanelEvent, PanelState, PanelStateMachine, SubPanel};
use crate::storage::{
    AppStateRecord, KeyValueStore, PanelPosition, SettingsStore, APP_STATE_KEY, PROFILES_KEY,
    SETTINGS_KEY, SHORTCUTS_KEY, THEME_COLORS_KEY, THEME_KEY,
};
use crate::theme::{render_stylesheet, HueTarget, ThemeState, THEME_STYLE_ID};

mod messaging;
mod notice;

pub use messaging::{Command, StatusResponse};
pub use notice::{Notice, NoticeLevel};

/// Owns the live settings, profiles and theme for one page, and pushes every
/// change out to the document and the store.
#[derive(Debug)]
pub struct SettingsController<D, S> {
    dom: D,
    store: SettingsStore<S>,
    settings: Settings,
    profiles: ProfileList,
    theme: ThemeState,
    shortcuts: ShortcutTable,
    panel: PanelStateMachine,
    locator: MediaLocator,
    applier: FilterApplier,
    app_state: AppStateRecord,
    notices: Vec<Notice>,
    disposed: bool,
}

impl<D: DomTree, S: KeyValueStore> SettingsController<D, S> {
    pub fn new(dom: D, store: S, config: &AppConfig) -> Self {
        let shortcuts = match config
            .toggle_shortcut
            .as_deref()
            .map(str::parse::<ShortcutCombo>)
        {
            Some(Ok(combo)) => ShortcutTable::with_toggle(combo),
            Some(Err(err)) => {
                tracing::warn!(?err, "invalid toggle_shortcut in config; using default");
                ShortcutTable::default()
            }
            None => ShortcutTable::default(),
        };

        Self {
            dom,
            store: SettingsStore::new(store),
            settings: Settings::default(),
            profiles: ProfileList::default(),
            theme: ThemeState::default(),
            shortcuts,
            panel: PanelStateMachine::new(),
            locator: MediaLocator::new(),
            applier: FilterApplier::new(),
            app_state: AppStateRecord::default(),
            notices: Vec::new(),
            disposed: false,
        }
    }

    /// Overlays persisted state, starts watching for inserted media and
    /// applies filters when they are active.
    pub fn load(&mut self) {
        let stored = self.store.load();
        let had_settings = stored.settings.is_some();

        if let Some(patch) = &stored.settings {
            self.settings.apply_patch(patch);
        }
        if let Some(profiles) = stored.profiles {
            match ProfileList::from_profiles(profiles) {
                Ok(list) => self.profiles = list,
                Err(err) => tracing::warn!(?err, "ignoring stored profile list"),
            }
        }
        if let Some(colors) = stored.theme_colors {
            self.theme.merge_colors(colors);
        }
        if let Some(theme) = &stored.theme {
            self.theme.restore_active(theme);
        }
        if let Some(app_state) = stored.app_state {
            if !had_settings {
                self.settings.active_profile = app_state.active_profile.clone();
                self.settings.auto_activate = app_state.auto_activate;
            }
            self.app_state = app_state;
        }
        if let Some(bindings) = stored.shortcuts {
            self.shortcuts.replace_bindings(bindings);
        }
        self.drop_dangling_profile();

        tracing::info!(
            profiles = self.profiles.len(),
            theme = self.theme.active(),
            active_profile = ?self.settings.active_profile,
            "loaded stored state"
        );

        self.inject_theme();
        self.locator.observe(&mut self.dom);
        self.sync_filters();
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn store(&self) -> &SettingsStore<S> {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn profiles(&self) -> &ProfileList {
        &self.profiles
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    pub fn panel(&self) -> &PanelStateMachine {
        &self.panel
    }

    pub fn app_state(&self) -> &AppStateRecord {
        &self.app_state
    }

    pub fn video_count(&self) -> usize {
        self.locator.count_videos(&self.dom)
    }

    /// Filters are live while the panel is open or auto-activation is on.
    pub fn filters_active(&self) -> bool {
        self.panel.is_visible() || self.settings.auto_activate
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Slider or text-box input. Unparseable input is ignored.
    pub fn update_control(&mut self, control: Control, raw: &str) -> bool {
        if !self.settings.set_from_input(control, raw) {
            tracing::debug!(?control, raw, "ignoring non-numeric control input");
            return false;
        }
        tracing::debug!(?control, value = self.settings.get(control), "control updated");
        self.commit_settings();
        true
    }

    pub fn update_control_by_name(&mut self, name: &str, raw: &str) -> bool {
        match Control::from_name(name) {
            Some(control) => self.update_control(control, raw),
            None => {
                tracing::debug!(name, "ignoring unknown control");
                false
            }
        }
    }

    pub fn set_control(&mut self, control: Control, value: f64) -> bool {
        if !self.settings.set_clamped(control, value) {
            return false;
        }
        self.commit_settings();
        true
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.settings.set_flag(flag, value);
        tracing::debug!(?flag, value, "flag updated");
        self.commit_settings();
    }

    pub fn reset_all(&mut self) {
        self.settings.reset_filters();
        tracing::info!("reset all filters");
        self.commit_settings();
    }

    pub fn reset_single(&mut self, control: Control) {
        self.settings.reset_control(control);
        self.commit_settings();
    }

    pub fn set_speed(&mut self, speed: f64) -> bool {
        self.set_control(Control::Speed, speed)
    }

    /// Steps the playback rate, rounded to hundredths.
    pub fn adjust_speed(&mut self, delta: f64) -> bool {
        let target = ((self.settings.speed + delta) * 100.0).round() / 100.0;
        self.set_speed(target)
    }

    /// Loads a stored profile by name; `DEFAULT` restores identity values.
    pub fn load_profile(&mut self, name: &str) -> AppResult<()> {
        let selected: Option<Profile> = match self.profiles.select(name) {
            Ok(ProfileSelection::Default) => None,
            Ok(ProfileSelection::Stored(profile)) => Some(profile.clone()),
            Err(err) => return Err(self.reject(err)),
        };
        self.apply_selection(selected.as_ref());
        Ok(())
    }

    pub fn create_profile(&mut self, name: Option<&str>) -> AppResult<String> {
        let created = match self.profiles.create(name, &self.settings) {
            Ok(profile) => profile.name.clone(),
            Err(err) => return Err(self.reject(err)),
        };
        tracing::info!(profile = %created, "created profile");
        self.settings.active_profile = Some(created.clone());
        self.notices
            .push(Notice::info(format!("Saved profile \"{created}\"")));
        self.persist_profiles();
        self.persist_settings();
        Ok(created)
    }

    pub fn delete_profile(&mut self, index: usize) -> AppResult<Profile> {
        let removed = self.profiles.delete(index).map_err(|err| self.reject(err))?;
        tracing::info!(profile = %removed.name, "deleted profile");
        self.persist_profiles();
        if self.settings.active_profile.as_deref() == Some(removed.name.as_str()) {
            self.apply_selection(None);
        }
        Ok(removed)
    }

    pub fn next_profile(&mut self) -> Option<String> {
        self.cycle_profile(true)
    }

    pub fn previous_profile(&mut self) -> Option<String> {
        self.cycle_profile(false)
    }

    fn cycle_profile(&mut self, forward: bool) -> Option<String> {
        let selected = match self
            .profiles
            .cycle(self.settings.active_profile.as_deref(), forward)
        {
            ProfileSelection::Default => None,
            ProfileSelection::Stored(profile) => Some(profile.clone()),
        };
        self.apply_selection(selected.as_ref());
        self.settings.active_profile.clone()
    }

    fn apply_selection(&mut self, profile: Option<&Profile>) {
        let selection = profile.map_or(ProfileSelection::Default, ProfileSelection::Stored);
        load_into(&mut self.settings, selection);
        tracing::info!(profile = ?self.settings.active_profile, "loaded profile");
        self.commit_settings();
    }

    pub fn is_profile_modified(&self) -> bool {
        self.profiles.is_modified(&self.settings)
    }

    pub fn change_theme(&mut self, name: &str) -> AppResult<()> {
        self.theme.change_theme(name).map_err(|err| self.reject(err))?;
        tracing::debug!(theme = name, "changed theme");
        self.inject_theme();
        self.store.persist(THEME_KEY, self.theme.active());
        Ok(())
    }

    pub fn set_font_hue(&mut self, hue: f64) -> bool {
        self.set_hue(HueTarget::Font, hue)
    }

    pub fn set_background_hue(&mut self, hue: f64) -> bool {
        self.set_hue(HueTarget::Background, hue)
    }

    fn set_hue(&mut self, target: HueTarget, hue: f64) -> bool {
        if !self.theme.set_hue(target, hue) {
            return false;
        }
        self.inject_theme();
        self.store.persist(THEME_COLORS_KEY, self.theme.colors());
        true
    }

    fn inject_theme(&mut self) {
        let css = render_stylesheet(self.theme.active_hsl());
        if let Err(err) = self.dom.replace_stylesheet(THEME_STYLE_ID, &css) {
            tracing::warn!(?err, "failed to inject theme stylesheet");
        }
    }

    pub fn show_panel(&mut self) -> AppResult<PanelState> {
        self.panel_event(PanelEvent::Show)
    }

    pub fn hide_panel(&mut self) -> AppResult<PanelState> {
        self.panel_event(PanelEvent::Hide)
    }

    pub fn toggle_panel(&mut self) -> PanelState {
        match self.panel_event(PanelEvent::Toggle) {
            Ok(state) => state,
            Err(err) => {
                tracing::debug!(?err, "panel toggle rejected");
                self.panel.state()
            }
        }
    }

    fn panel_event(&mut self, event: PanelEvent) -> AppResult<PanelState> {
        let state = self.panel.transition(event)?;
        tracing::debug!(?state, "panel state changed");
        self.sync_filters();
        Ok(state)
    }

    pub fn toggle_sub_panel(&mut self, panel: SubPanel) -> Option<SubPanel> {
        self.panel.toggle_sub_panel(panel)
    }

    pub fn set_panel_position(&mut self, position: PanelPosition) {
        self.app_state.panel_position = Some(position);
        self.store.persist(APP_STATE_KEY, &self.app_state);
    }

    /// Returns whether the combo was bound to an action.
    pub fn handle_key(&mut self, combo: &ShortcutCombo) -> bool {
        let Some(action) = self.shortcuts.resolve(combo) else {
            return false;
        };
        tracing::debug!(%combo, ?action, "shortcut pressed");
        if let Err(err) = self.run_action(action) {
            tracing::debug!(?err, "shortcut action failed");
        }
        true
    }

    pub fn run_action(&mut self, action: ShortcutAction) -> AppResult<()> {
        match action {
            ShortcutAction::TogglePanel => {
                self.toggle_panel();
            }
            ShortcutAction::NextProfile => {
                self.next_profile();
            }
            ShortcutAction::PreviousProfile => {
                self.previous_profile();
            }
            ShortcutAction::SetProfile(name) => self.load_profile(&name)?,
            ShortcutAction::SetSpeed(speed) => {
                self.set_speed(speed);
            }
            ShortcutAction::AdjustSpeed(delta) => {
                self.adjust_speed(delta);
            }
        }
        Ok(())
    }

    pub fn bind_shortcut(&mut self, binding: ShortcutBinding) -> AppResult<()> {
        self.shortcuts.bind(binding).map_err(|err| self.reject(err))?;
        self.store.persist(SHORTCUTS_KEY, self.shortcuts.bindings());
        Ok(())
    }

    pub fn unbind_shortcut(&mut self, combo: &ShortcutCombo) -> bool {
        let removed = self.shortcuts.unbind(combo);
        if removed {
            self.store.persist(SHORTCUTS_KEY, self.shortcuts.bindings());
        }
        removed
    }

    /// Re-applies when the host reports inserted media. Returns whether a
    /// pass ran.
    pub fn on_mutation(&mut self, record: &MutationRecord) -> bool {
        if self.disposed || !self.filters_active() {
            return false;
        }
        if !self
            .locator
            .mutation_adds_media(&self.dom, record, self.settings.work_on_images)
        {
            return false;
        }
        tracing::trace!(added = record.added.len(), "media inserted");
        self.applier
            .apply(&mut self.dom, &self.locator, &self.settings);
        true
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.locator.disconnect(&mut self.dom);
        if !self.filters_active() {
            self.applier.remove_filters(&mut self.dom, &self.locator);
        }
        self.disposed = true;
        tracing::debug!("controller disposed");
    }

    fn sync_filters(&mut self) {
        if self.disposed {
            return;
        }
        if self.filters_active() {
            self.applier
                .apply(&mut self.dom, &self.locator, &self.settings);
        } else if self.applier.last_chain().is_some() {
            self.applier.remove_filters(&mut self.dom, &self.locator);
        }
    }

    pub fn export_bundle(&self) -> ExportBundle {
        ExportBundle::new(
            &self.settings,
            &self.profiles,
            self.theme.active(),
            self.theme.colors(),
            &self.app_state,
        )
    }

    pub fn export_json(&self) -> AppResult<String> {
        Ok(self.export_bundle().to_json()?)
    }

    /// Validates the whole file before touching any live state.
    pub fn import_json(&mut self, serialized: &str) -> AppResult<()> {
        let bundle = parse_import(serialized).map_err(|err| self.reject(err))?;
        tracing::info!(version = ?bundle.version, "importing settings bundle");

        if let Some(patch) = &bundle.settings {
            self.settings.apply_patch(patch);
        }
        if let Some(profiles) = bundle.profiles {
            self.profiles = profiles;
            self.persist_profiles();
        }
        match (bundle.theme, bundle.theme_colors) {
            (theme, Some(colors)) => {
                let active = theme.unwrap_or_else(|| self.theme.active().to_string());
                self.theme.replace(&active, colors);
            }
            (Some(theme), None) => self.theme.restore_active(&theme),
            (None, None) => {}
        }
        if let Some(app_state) = bundle.app_state {
            self.app_state.panel_position = app_state.panel_position;
        }
        self.drop_dangling_profile();

        self.store.persist(THEME_KEY, self.theme.active());
        self.store.persist(THEME_COLORS_KEY, self.theme.colors());
        self.inject_theme();
        self.commit_settings();
        self.notices.push(Notice::info("Settings imported"));
        Ok(())
    }

    pub fn forget_saved_data(&mut self) -> AppResult<()> {
        self.store.forget_all()?;
        tracing::info!("removed all saved data");
        Ok(())
    }

    fn commit_settings(&mut self) {
        self.sync_filters();
        self.persist_settings();
    }

    fn persist_settings(&mut self) {
        self.store.persist(SETTINGS_KEY, &self.settings);
        self.app_state.active_profile = self.settings.active_profile.clone();
        self.app_state.auto_activate = self.settings.auto_activate;
        self.store.persist(APP_STATE_KEY, &self.app_state);
    }

    fn persist_profiles(&mut self) {
        self.store.persist(PROFILES_KEY, &self.profiles);
    }

    fn drop_dangling_profile(&mut self) {
        let dangling = self
            .settings
            .active_profile
            .as_deref()
            .is_some_and(|name| self.profiles.find(name).is_none());
        if dangling {
            tracing::warn!(
                profile = ?self.settings.active_profile,
                "active profile no longer exists"
            );
            self.settings.active_profile = None;
        }
    }

    fn reject(&mut self, err: impl Into<AppError>) -> AppError {
        let err = err.into();
        tracing::warn!(%err, "rejected request");
        self.notices.push(Notice::error(err.to_string()));
        err
    }
}
