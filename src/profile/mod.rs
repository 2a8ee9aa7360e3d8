use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::{Settings, SettingsPatch};

pub const DEFAULT_PROFILE_NAME: &str = "DEFAULT";
const AUTO_NAME_PREFIX: &str = "Profile_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("a profile named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("\"{0}\" is reserved for the default profile")]
    ReservedName(String),
    #[error("profile index {index} is out of range for {len} profiles")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no profile named \"{0}\"")]
    UnknownProfile(String),
}

pub type ProfileResult<T> = std::result::Result<T, ProfileError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub settings: SettingsPatch,
}

/// What `load` should overlay: the sentinel or one stored profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileSelection<'a> {
    Default,
    Stored(&'a Profile),
}

impl ProfileSelection<'_> {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Default => None,
            Self::Stored(profile) => Some(profile.name.as_str()),
        }
    }
}

/// Ordered, name-unique profile list. Deserialize through
/// [`ProfileList::from_profiles`] so uniqueness is checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProfileList {
    profiles: Vec<Profile>,
}

impl ProfileList {
    /// Builds a list, rejecting duplicate or reserved names.
    pub fn from_profiles(profiles: Vec<Profile>) -> ProfileResult<Self> {
        let mut list = Self::default();
        for profile in profiles {
            list.validate_new_name(&profile.name)?;
            list.profiles.push(profile);
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn as_slice(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn get(&self, index: usize) -> Option<&Profile> {
        self.profiles.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.profiles.iter().position(|profile| profile.name == name)
    }

    fn validate_new_name(&self, name: &str) -> ProfileResult<()> {
        if name == DEFAULT_PROFILE_NAME {
            return Err(ProfileError::ReservedName(name.to_string()));
        }
        if self.find(name).is_some() {
            return Err(ProfileError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn next_auto_name(&self) -> String {
        let mut n = self.profiles.len() + 1;
        loop {
            let candidate = format!("{AUTO_NAME_PREFIX}{n}");
            if self.find(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Snapshots `settings` under `name`, or an auto-generated `Profile_N`.
    pub fn create(&mut self, name: Option<&str>, settings: &Settings) -> ProfileResult<&Profile> {
        let name = match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => {
                self.validate_new_name(name)?;
                name.to_string()
            }
            None => self.next_auto_name(),
        };
        self.profiles.push(Profile {
            name,
            settings: settings.snapshot(),
        });
        let index = self.profiles.len() - 1;
        Ok(&self.profiles[index])
    }

    pub fn delete(&mut self, index: usize) -> ProfileResult<Profile> {
        if index >= self.profiles.len() {
            return Err(ProfileError::IndexOutOfRange {
                index,
                len: self.profiles.len(),
            });
        }
        Ok(self.profiles.remove(index))
    }

    /// Resolves a name, treating `DEFAULT` as the sentinel.
    pub fn select(&self, name: &str) -> ProfileResult<ProfileSelection<'_>> {
        if name == DEFAULT_PROFILE_NAME {
            return Ok(ProfileSelection::Default);
        }
        self.find(name)
            .map(ProfileSelection::Stored)
            .ok_or_else(|| ProfileError::UnknownProfile(name.to_string()))
    }

    /// Steps through `[DEFAULT, p0, p1, ...]` with wrap-around.
    pub fn cycle(&self, active: Option<&str>, forward: bool) -> ProfileSelection<'_> {
        let slots = self.profiles.len() + 1;
        let current = active
            .and_then(|name| self.position(name))
            .map_or(0, |index| index + 1);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        match next {
            0 => ProfileSelection::Default,
            slot => ProfileSelection::Stored(&self.profiles[slot - 1]),
        }
    }

    /// Whether the live tracked values drifted from the active profile's
    /// snapshot, or from identity when no profile is active.
    pub fn is_modified(&self, settings: &Settings) -> bool {
        match settings.active_profile.as_deref().and_then(|name| self.find(name)) {
            Some(profile) => !settings.matches_tracked(&profile.settings),
            None => !settings.tracked_are_identity(),
        }
    }
}

/// Overlays a profile onto the live settings, keeping the session's
/// activation preferences unless the profile names `autoActivate`.
pub fn load_into(settings: &mut Settings, selection: ProfileSelection<'_>) {
    let auto_activate = settings.auto_activate;
    let work_on_images = settings.work_on_images;
    match selection {
        ProfileSelection::Default => {
            *settings = Settings {
                extended_limits: settings.extended_limits,
                compare_mode: settings.compare_mode,
                ..Settings::default()
            };
            settings.auto_activate = auto_activate;
        }
        ProfileSelection::Stored(profile) => {
            settings.apply_patch(&profile.settings);
            settings.auto_activate = profile.settings.auto_activate.unwrap_or(auto_activate);
        }
    }
    settings.work_on_images = work_on_images;
    settings.active_profile = selection.name().map(str::to_string);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(names: &[&str]) -> ProfileList {
        let mut list = ProfileList::default();
        for name in names {
            list.create(Some(*name), &Settings::default())
                .expect("profile should be created");
        }
        list
    }

    #[test]
    fn create_auto_names_from_count() {
        let mut list = list_with(&["Night"]);
        let created = list
            .create(None, &Settings::default())
            .expect("auto profile should be created");
        assert_eq!(created.name, "Profile_2");

        let created = list
            .create(Some("   "), &Settings::default())
            .expect("blank name should fall back to auto");
        assert_eq!(created.name, "Profile_3");
    }

    #[test]
    fn auto_name_skips_taken_names() {
        let mut list = list_with(&["Profile_2"]);
        let created = list.create(None, &Settings::default()).unwrap();
        assert_eq!(created.name, "Profile_3");
    }

    #[test]
    fn duplicate_names_are_rejected_without_mutation() {
        let mut list = list_with(&["Movie"]);
        let err = list
            .create(Some("Movie"), &Settings::default())
            .expect_err("duplicate should fail");

        assert_eq!(err, ProfileError::DuplicateName("Movie".into()));
        assert_eq!(list.len(), 1);

        let err = list
            .create(Some(DEFAULT_PROFILE_NAME), &Settings::default())
            .expect_err("sentinel name should be reserved");
        assert_eq!(err, ProfileError::ReservedName("DEFAULT".into()));
    }

    #[test]
    fn delete_reports_out_of_range() {
        let mut list = list_with(&["A"]);
        assert_eq!(
            list.delete(3),
            Err(ProfileError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(list.delete(0).unwrap().name, "A");
        assert!(list.is_empty());
    }

    #[test]
    fn cycle_wraps_through_default() {
        let list = list_with(&["A", "B"]);

        assert_eq!(list.cycle(None, true).name(), Some("A"));
        assert_eq!(list.cycle(Some("A"), true).name(), Some("B"));
        assert_eq!(list.cycle(Some("B"), true).name(), None);
        assert_eq!(list.cycle(None, false).name(), Some("B"));
        assert_eq!(list.cycle(Some("A"), false).name(), None);
        assert_eq!(list.cycle(Some("missing"), true).name(), Some("A"));
    }

    #[test]
    fn load_overlays_partial_profile() {
        let profile = Profile {
            name: "Old".into(),
            settings: serde_json::from_str(r#"{"brightness": 10, "gamma": 1.3}"#).unwrap(),
        };
        let mut settings = Settings {
            sharpness: 25.0,
            auto_activate: true,
            work_on_images: true,
            ..Settings::default()
        };

        load_into(&mut settings, ProfileSelection::Stored(&profile));

        assert_eq!(settings.brightness, 10.0);
        assert_eq!(settings.gamma, 1.3);
        assert_eq!(settings.sharpness, 25.0);
        assert!(settings.auto_activate);
        assert!(settings.work_on_images);
        assert_eq!(settings.active_profile.as_deref(), Some("Old"));
    }

    #[test]
    fn load_adopts_explicit_auto_activate() {
        let profile = Profile {
            name: "Auto".into(),
            settings: serde_json::from_str(r#"{"autoActivate": false, "workOnImages": false}"#)
                .unwrap(),
        };
        let mut settings = Settings {
            auto_activate: true,
            work_on_images: true,
            ..Settings::default()
        };

        load_into(&mut settings, ProfileSelection::Stored(&profile));

        assert!(!settings.auto_activate);
        assert!(settings.work_on_images);
    }

    #[test]
    fn load_default_restores_identity_and_clears_name() {
        let mut settings = Settings {
            brightness: 50.0,
            auto_activate: true,
            extended_limits: true,
            active_profile: Some("A".into()),
            ..Settings::default()
        };

        load_into(&mut settings, ProfileSelection::Default);

        assert!(settings.tracked_are_identity());
        assert!(settings.auto_activate);
        assert!(settings.extended_limits);
        assert!(settings.active_profile.is_none());
    }

    #[test]
    fn modified_detection_tracks_each_field() {
        let list = ProfileList::default();
        let mut settings = Settings::default();
        assert!(!list.is_modified(&settings));

        settings.sharpness = 1.0;
        assert!(list.is_modified(&settings));
        settings.sharpness = 0.0;
        settings.color_temp = -5.0;
        assert!(list.is_modified(&settings));
        settings.color_temp = 0.0;

        settings.speed = 3.0;
        assert!(!list.is_modified(&settings));
    }

    #[test]
    fn modified_detection_compares_against_active_snapshot() {
        let mut list = ProfileList::default();
        let settings = Settings {
            contrast: 15.0,
            ..Settings::default()
        };
        list.create(Some("Punchy"), &settings).unwrap();
        let mut live = Settings {
            active_profile: Some("Punchy".into()),
            ..settings
        };
        assert!(!list.is_modified(&live));

        live.contrast = 16.0;
        assert!(list.is_modified(&live));
    }
}
