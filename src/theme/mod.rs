use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod stylesheet;

pub use stylesheet::{render_stylesheet, THEME_STYLE_ID};

pub const DEFAULT_THEME: &str = "dark";
const HUE_MAX: f64 = 360.0;

pub type ThemeResult<T> = std::result::Result<T, ThemeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("unknown theme \"{0}\"")]
    UnknownTheme(String),
}

/// HSL tuple the panel stylesheet is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeHsl {
    pub font_hue: f64,
    pub background_hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl ThemeHsl {
    pub const fn new(font_hue: f64, background_hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            font_hue,
            background_hue,
            saturation,
            lightness,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.lightness < 50.0
    }
}

/// Theme name to HSL tuple.
pub type ThemeColors = BTreeMap<String, ThemeHsl>;

const DARK: ThemeHsl = ThemeHsl::new(210.0, 220.0, 15.0, 12.0);

pub fn builtin_theme_colors() -> ThemeColors {
    BTreeMap::from([
        (DEFAULT_THEME.to_string(), DARK),
        ("light".to_string(), ThemeHsl::new(220.0, 210.0, 20.0, 96.0)),
        ("sunset".to_string(), ThemeHsl::new(35.0, 15.0, 45.0, 18.0)),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HueTarget {
    Font,
    Background,
}

/// Active theme name plus the editable color map.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeState {
    active: String,
    colors: ThemeColors,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            active: DEFAULT_THEME.to_string(),
            colors: builtin_theme_colors(),
        }
    }
}

impl ThemeState {
    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn colors(&self) -> &ThemeColors {
        &self.colors
    }

    pub fn active_hsl(&self) -> ThemeHsl {
        self.colors
            .get(&self.active)
            .copied()
            .unwrap_or(DARK)
    }

    pub fn change_theme(&mut self, name: &str) -> ThemeResult<()> {
        if !self.colors.contains_key(name) {
            return Err(ThemeError::UnknownTheme(name.to_string()));
        }
        self.active = name.to_string();
        Ok(())
    }

    /// Overlays stored colors on the built-ins; stored entries win.
    pub fn merge_colors(&mut self, stored: ThemeColors) {
        self.colors.extend(stored);
    }

    /// Restores a persisted theme name, falling back to the default when the
    /// name is no longer known.
    pub fn restore_active(&mut self, name: &str) {
        if self.change_theme(name).is_err() {
            tracing::warn!(theme = name, "stored theme is unknown; using default");
            self.active = DEFAULT_THEME.to_string();
        }
    }

    /// Mutates only the active theme's entry.
    pub fn set_hue(&mut self, target: HueTarget, hue: f64) -> bool {
        if !hue.is_finite() {
            return false;
        }
        let hue = hue.clamp(0.0, HUE_MAX);
        let mut hsl = self.active_hsl();
        match target {
            HueTarget::Font => hsl.font_hue = hue,
            HueTarget::Background => hsl.background_hue = hue,
        }
        self.colors.insert(self.active.clone(), hsl);
        true
    }

    /// Swaps in an imported color map on top of the built-ins.
    pub fn replace(&mut self, active: &str, colors: ThemeColors) {
        self.colors = builtin_theme_colors();
        self.colors.extend(colors);
        self.restore_active(active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_uses_builtin_dark_theme() {
        let state = ThemeState::default();
        assert_eq!(state.active(), "dark");
        assert!(state.active_hsl().is_dark());
        assert_eq!(state.colors().len(), 3);
    }

    #[test]
    fn change_theme_rejects_unknown_names() {
        let mut state = ThemeState::default();
        assert_eq!(
            state.change_theme("neon"),
            Err(ThemeError::UnknownTheme("neon".into()))
        );
        assert_eq!(state.active(), "dark");

        state.change_theme("light").expect("light should exist");
        assert!(!state.active_hsl().is_dark());
    }

    #[test]
    fn set_hue_touches_only_active_entry() {
        let mut state = ThemeState::default();
        let light_before = state.colors()["light"];

        assert!(state.set_hue(HueTarget::Font, 400.0));
        assert!(state.set_hue(HueTarget::Background, 42.0));
        assert!(!state.set_hue(HueTarget::Background, f64::NAN));

        let dark = state.colors()["dark"];
        assert_eq!(dark.font_hue, 360.0);
        assert_eq!(dark.background_hue, 42.0);
        assert_eq!(state.colors()["light"], light_before);
    }

    #[test]
    fn restore_active_falls_back_for_unknown_theme() {
        let mut state = ThemeState::default();
        state.restore_active("vanished");
        assert_eq!(state.active(), DEFAULT_THEME);
    }

    #[test]
    fn merge_colors_keeps_stored_custom_entries() {
        let mut state = ThemeState::default();
        state.merge_colors(BTreeMap::from([
            ("custom".to_string(), ThemeHsl::new(1.0, 2.0, 3.0, 4.0)),
            ("dark".to_string(), ThemeHsl::new(5.0, 6.0, 7.0, 8.0)),
        ]));

        assert_eq!(state.colors().len(), 4);
        assert_eq!(state.colors()["dark"].font_hue, 5.0);
        state.change_theme("custom").expect("custom should be known");
    }

    #[test]
    fn theme_colors_serialize_camel_case() {
        let json = serde_json::to_value(builtin_theme_colors()).unwrap();
        assert_eq!(json["dark"]["fontHue"], 210.0);
        assert_eq!(json["light"]["backgroundHue"], 210.0);
    }
}
