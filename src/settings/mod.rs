use serde::{Deserialize, Serialize};

mod limits;

pub use limits::{Limits, ValueRange, EXTENDED_LIMITS, STANDARD_LIMITS};

/// Every numeric field a slider or text box can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Control {
    Brightness,
    Contrast,
    Saturation,
    Gamma,
    ColorTemp,
    Sharpness,
    Speed,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Control::Brightness,
        Control::Contrast,
        Control::Saturation,
        Control::Gamma,
        Control::ColorTemp,
        Control::Sharpness,
        Control::Speed,
    ];

    /// Controls compared when deciding whether the active profile was modified.
    pub const TRACKED: [Control; 6] = [
        Control::Brightness,
        Control::Contrast,
        Control::Saturation,
        Control::Gamma,
        Control::ColorTemp,
        Control::Sharpness,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "brightness" => Some(Self::Brightness),
            "contrast" => Some(Self::Contrast),
            "saturation" => Some(Self::Saturation),
            "gamma" => Some(Self::Gamma),
            "colorTemp" => Some(Self::ColorTemp),
            "sharpness" => Some(Self::Sharpness),
            "speed" => Some(Self::Speed),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::Gamma => "gamma",
            Self::ColorTemp => "colorTemp",
            Self::Sharpness => "sharpness",
            Self::Speed => "speed",
        }
    }

    pub const fn default_value(self) -> f64 {
        match self {
            Self::Gamma | Self::Speed => 1.0,
            _ => 0.0,
        }
    }
}

/// Boolean preferences stored alongside the filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    AutoActivate,
    WorkOnImages,
    ExtendedLimits,
    CompareMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub gamma: f64,
    pub color_temp: f64,
    pub sharpness: f64,
    pub speed: f64,
    pub auto_activate: bool,
    #[serde(rename = "workOnImagesActivate", alias = "workOnImages")]
    pub work_on_images: bool,
    pub extended_limits: bool,
    pub compare_mode: bool,
    pub active_profile: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            gamma: 1.0,
            color_temp: 0.0,
            sharpness: 0.0,
            speed: 1.0,
            auto_activate: false,
            work_on_images: false,
            extended_limits: false,
            compare_mode: false,
            active_profile: None,
        }
    }
}

impl Settings {
    pub fn limits(&self) -> &'static Limits {
        if self.extended_limits {
            &EXTENDED_LIMITS
        } else {
            &STANDARD_LIMITS
        }
    }

    pub fn get(&self, control: Control) -> f64 {
        match control {
            Control::Brightness => self.brightness,
            Control::Contrast => self.contrast,
            Control::Saturation => self.saturation,
            Control::Gamma => self.gamma,
            Control::ColorTemp => self.color_temp,
            Control::Sharpness => self.sharpness,
            Control::Speed => self.speed,
        }
    }

    fn slot_mut(&mut self, control: Control) -> &mut f64 {
        match control {
            Control::Brightness => &mut self.brightness,
            Control::Contrast => &mut self.contrast,
            Control::Saturation => &mut self.saturation,
            Control::Gamma => &mut self.gamma,
            Control::ColorTemp => &mut self.color_temp,
            Control::Sharpness => &mut self.sharpness,
            Control::Speed => &mut self.speed,
        }
    }

    /// Writes `value` clamped to the active domain. Non-finite input is
    /// dropped and `false` is returned.
    pub fn set_clamped(&mut self, control: Control, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let clamped = self.limits().range(control).clamp(value);
        *self.slot_mut(control) = clamped;
        true
    }

    /// Parses slider or text-box input; anything that is not a number leaves
    /// the settings untouched.
    pub fn set_from_input(&mut self, control: Control, raw: &str) -> bool {
        match raw.trim().parse::<f64>() {
            Ok(value) => self.set_clamped(control, value),
            Err(_) => false,
        }
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::AutoActivate => self.auto_activate,
            Flag::WorkOnImages => self.work_on_images,
            Flag::ExtendedLimits => self.extended_limits,
            Flag::CompareMode => self.compare_mode,
        }
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::AutoActivate => self.auto_activate = value,
            Flag::WorkOnImages => self.work_on_images = value,
            Flag::ExtendedLimits => {
                self.extended_limits = value;
                self.clamp_all();
            }
            Flag::CompareMode => self.compare_mode = value,
        }
    }

    pub fn clamp_all(&mut self) {
        let limits = self.limits();
        for control in Control::ALL {
            let range = limits.range(control);
            let slot = self.slot_mut(control);
            *slot = if slot.is_finite() {
                range.clamp(*slot)
            } else {
                control.default_value()
            };
        }
    }

    pub fn reset_control(&mut self, control: Control) {
        *self.slot_mut(control) = control.default_value();
    }

    /// Restores filter state while keeping the session preferences.
    pub fn reset_filters(&mut self) {
        *self = Settings {
            auto_activate: self.auto_activate,
            work_on_images: self.work_on_images,
            extended_limits: self.extended_limits,
            ..Settings::default()
        };
    }

    /// Which filter values are worth storing in a profile.
    pub fn snapshot(&self) -> SettingsPatch {
        SettingsPatch {
            brightness: Some(self.brightness),
            contrast: Some(self.contrast),
            saturation: Some(self.saturation),
            gamma: Some(self.gamma),
            color_temp: Some(self.color_temp),
            sharpness: Some(self.sharpness),
            speed: Some(self.speed),
            ..SettingsPatch::default()
        }
    }

    /// Overlays only the keys present in `patch`, then re-clamps.
    pub fn apply_patch(&mut self, patch: &SettingsPatch) {
        if let Some(extended) = patch.extended_limits {
            self.extended_limits = extended;
        }
        for control in Control::ALL {
            if let Some(value) = patch.get(control) {
                *self.slot_mut(control) = value;
            }
        }
        if let Some(auto_activate) = patch.auto_activate {
            self.auto_activate = auto_activate;
        }
        if let Some(work_on_images) = patch.work_on_images {
            self.work_on_images = work_on_images;
        }
        if let Some(compare_mode) = patch.compare_mode {
            self.compare_mode = compare_mode;
        }
        if let Some(active_profile) = &patch.active_profile {
            self.active_profile = active_profile.clone();
        }
        self.clamp_all();
    }

    /// True when none of the tracked values differ from `patch`. Fields the
    /// patch does not carry are not compared.
    pub fn matches_tracked(&self, patch: &SettingsPatch) -> bool {
        Control::TRACKED.into_iter().all(|control| {
            patch
                .get(control)
                .is_none_or(|stored| stored == self.get(control))
        })
    }

    pub fn tracked_are_identity(&self) -> bool {
        Control::TRACKED
            .into_iter()
            .all(|control| self.get(control) == control.default_value())
    }
}

/// A partial settings record. Absent keys mean "leave the live value alone".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharpness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_activate: Option<bool>,
    #[serde(
        default,
        rename = "workOnImagesActivate",
        alias = "workOnImages",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_on_images: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_limits: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_mode: Option<bool>,
    #[serde(
        default,
        with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_profile: Option<Option<String>>,
}

impl SettingsPatch {
    pub fn get(&self, control: Control) -> Option<f64> {
        match control {
            Control::Brightness => self.brightness,
            Control::Contrast => self.contrast,
            Control::Saturation => self.saturation,
            Control::Gamma => self.gamma,
            Control::ColorTemp => self.color_temp,
            Control::Sharpness => self.sharpness,
            Control::Speed => self.speed,
        }
    }

    pub fn has_filter_values(&self) -> bool {
        Control::ALL
            .into_iter()
            .any(|control| self.get(control).is_some())
    }
}

impl From<&Settings> for SettingsPatch {
    fn from(settings: &Settings) -> Self {
        SettingsPatch {
            auto_activate: Some(settings.auto_activate),
            work_on_images: Some(settings.work_on_images),
            extended_limits: Some(settings.extended_limits),
            compare_mode: Some(settings.compare_mode),
            active_profile: Some(settings.active_profile.clone()),
            ..settings.snapshot()
        }
    }
}

// `null` must survive as "clear the active profile", distinct from "absent".
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S>(
        value: &Option<Option<String>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_never_leave_the_active_domain() {
        let mut settings = Settings::default();
        for raw in [-1000.0, -150.0, -100.0, 0.0, 55.5, 100.0, 150.0, 1000.0] {
            for control in [Control::Brightness, Control::Contrast] {
                assert!(settings.set_clamped(control, raw));
                let value = settings.get(control);
                assert!((-100.0..=100.0).contains(&value), "{control:?}={value}");
            }
        }

        settings.set_flag(Flag::ExtendedLimits, true);
        settings.set_clamped(Control::Brightness, 150.0);
        assert_eq!(settings.brightness, 150.0);
        settings.set_clamped(Control::Brightness, 500.0);
        assert_eq!(settings.brightness, 200.0);
    }

    #[test]
    fn disabling_extended_limits_reclamps_values() {
        let mut settings = Settings {
            extended_limits: true,
            ..Settings::default()
        };
        settings.set_clamped(Control::Saturation, 250.0);
        settings.set_clamped(Control::Gamma, 4.5);
        settings.set_flag(Flag::ExtendedLimits, false);

        assert_eq!(settings.saturation, 100.0);
        assert_eq!(settings.gamma, 3.0);
    }

    #[test]
    fn non_numeric_input_is_ignored() {
        let mut settings = Settings::default();
        settings.set_clamped(Control::Contrast, 12.0);

        assert!(!settings.set_from_input(Control::Contrast, "abc"));
        assert!(!settings.set_from_input(Control::Contrast, ""));
        assert!(!settings.set_clamped(Control::Contrast, f64::NAN));
        assert_eq!(settings.contrast, 12.0);

        assert!(settings.set_from_input(Control::Contrast, " -20 "));
        assert_eq!(settings.contrast, -20.0);
    }

    #[test]
    fn reset_single_gamma_restores_identity() {
        let mut settings = Settings::default();
        settings.set_clamped(Control::Gamma, 2.4);
        settings.set_clamped(Control::Brightness, 30.0);

        settings.reset_control(Control::Gamma);

        assert_eq!(settings.gamma, 1.0);
        assert_eq!(settings.brightness, 30.0);
    }

    #[test]
    fn reset_filters_keeps_session_preferences() {
        let mut settings = Settings {
            brightness: 40.0,
            gamma: 2.0,
            speed: 2.5,
            auto_activate: true,
            work_on_images: true,
            extended_limits: true,
            compare_mode: true,
            active_profile: Some("Night".into()),
            ..Settings::default()
        };

        settings.reset_filters();

        assert_eq!(settings.brightness, 0.0);
        assert_eq!(settings.gamma, 1.0);
        assert_eq!(settings.speed, 1.0);
        assert!(settings.auto_activate);
        assert!(settings.work_on_images);
        assert!(settings.extended_limits);
        assert!(!settings.compare_mode);
        assert!(settings.active_profile.is_none());
    }

    #[test]
    fn patch_overlays_only_present_keys() {
        let mut settings = Settings {
            sharpness: 35.0,
            ..Settings::default()
        };
        let patch: SettingsPatch = serde_json::from_str(r#"{"brightness": 15, "contrast": 400}"#)
            .expect("patch should parse");

        settings.apply_patch(&patch);

        assert_eq!(settings.brightness, 15.0);
        assert_eq!(settings.contrast, 100.0);
        assert_eq!(settings.sharpness, 35.0);
    }

    #[test]
    fn patch_distinguishes_null_profile_from_absent() {
        let cleared: SettingsPatch =
            serde_json::from_str(r#"{"activeProfile": null}"#).expect("patch should parse");
        let absent: SettingsPatch = serde_json::from_str("{}").expect("patch should parse");

        assert_eq!(cleared.active_profile, Some(None));
        assert_eq!(absent.active_profile, None);
    }

    #[test]
    fn settings_accept_legacy_work_on_images_key() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"workOnImages": true}"#).expect("patch should parse");
        assert_eq!(patch.work_on_images, Some(true));

        let json = serde_json::to_value(Settings::default()).expect("settings should serialize");
        assert!(json.get("workOnImagesActivate").is_some());
        assert!(json.get("colorTemp").is_some());
    }

    #[test]
    fn tracked_comparison_is_exact() {
        let mut settings = Settings::default();
        assert!(settings.tracked_are_identity());

        settings.gamma = 1.0 + f64::EPSILON;
        assert!(!settings.tracked_are_identity());

        let snapshot = settings.snapshot();
        assert!(settings.matches_tracked(&snapshot));
        settings.gamma = 1.0;
        assert!(!settings.matches_tracked(&snapshot));
    }
}
