use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::profile::{Profile, ProfileError, ProfileList};
use crate::settings::{Settings, SettingsPatch};
use crate::storage::AppStateRecord;
use crate::theme::ThemeColors;

pub const BUNDLE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import file is not valid JSON")]
    Syntax(#[source] serde_json::Error),
    #[error("import file must contain a JSON object")]
    NotAnObject,
    #[error("import file must contain \"settings\" or \"profiles\"")]
    MissingSections,
    #[error("\"settings\" must be an object holding at least one filter value")]
    NoFilterValues,
    #[error("\"profiles\" must be a list")]
    ProfilesNotList,
    #[error("profile #{index} needs a non-empty name and a settings object")]
    InvalidProfile { index: usize },
    #[error("\"timestamp\" is not an ISO-8601 date: {0}")]
    InvalidTimestamp(String),
    #[error("\"{section}\" has an unexpected shape")]
    Shape {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Profiles(#[from] ProfileError),
}

pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Everything a user can move between machines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub version: String,
    pub timestamp: String,
    pub settings: Settings,
    pub profiles: Vec<Profile>,
    pub theme: String,
    pub theme_colors: ThemeColors,
    pub app_state: AppStateRecord,
}

impl ExportBundle {
    pub fn new(
        settings: &Settings,
        profiles: &ProfileList,
        theme: &str,
        theme_colors: &ThemeColors,
        app_state: &AppStateRecord,
    ) -> Self {
        Self {
            version: BUNDLE_VERSION.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            settings: settings.clone(),
            profiles: profiles.as_slice().to_vec(),
            theme: theme.to_string(),
            theme_colors: theme_colors.clone(),
            app_state: app_state.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A validated import. Sections missing from the file stay `None` and leave
/// the live state alone.
#[derive(Debug, Clone, Default)]
pub struct ImportBundle {
    pub version: Option<String>,
    pub settings: Option<SettingsPatch>,
    pub profiles: Option<ProfileList>,
    pub theme: Option<String>,
    pub theme_colors: Option<ThemeColors>,
    pub app_state: Option<AppStateRecord>,
}

pub fn parse_import(serialized: &str) -> ImportResult<ImportBundle> {
    let root: Value = serde_json::from_str(serialized).map_err(ImportError::Syntax)?;
    let Value::Object(root) = root else {
        return Err(ImportError::NotAnObject);
    };
    if !root.contains_key("settings") && !root.contains_key("profiles") {
        return Err(ImportError::MissingSections);
    }

    if let Some(timestamp) = root.get("timestamp").and_then(Value::as_str) {
        DateTime::parse_from_rfc3339(timestamp)
            .map_err(|_| ImportError::InvalidTimestamp(timestamp.to_string()))?;
    }

    let settings = root.get("settings").map(validate_settings).transpose()?;
    let profiles = root.get("profiles").map(validate_profiles).transpose()?;

    Ok(ImportBundle {
        version: root
            .get("version")
            .and_then(Value::as_str)
            .map(str::to_string),
        settings,
        profiles,
        theme: root.get("theme").and_then(Value::as_str).map(str::to_string),
        theme_colors: section(&root, "themeColors")?,
        app_state: section(&root, "appState")?,
    })
}

fn validate_settings(value: &Value) -> ImportResult<SettingsPatch> {
    if !value.is_object() {
        return Err(ImportError::NoFilterValues);
    }
    let patch: SettingsPatch =
        serde_json::from_value(value.clone()).map_err(|source| ImportError::Shape {
            section: "settings",
            source,
        })?;
    if !patch.has_filter_values() {
        return Err(ImportError::NoFilterValues);
    }
    Ok(patch)
}

fn validate_profiles(value: &Value) -> ImportResult<ProfileList> {
    let entries = value.as_array().ok_or(ImportError::ProfilesNotList)?;
    let mut profiles = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let named = entry
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| !name.trim().is_empty());
        let has_settings = entry.get("settings").is_some_and(Value::is_object);
        if !named || !has_settings {
            return Err(ImportError::InvalidProfile { index });
        }
        let profile: Profile =
            serde_json::from_value(entry.clone()).map_err(|source| ImportError::Shape {
                section: "profiles",
                source,
            })?;
        profiles.push(profile);
    }
    Ok(ProfileList::from_profiles(profiles)?)
}

fn section<T: serde::de::DeserializeOwned>(
    root: &Map<String, Value>,
    name: &'static str,
) -> ImportResult<Option<T>> {
    root.get(name)
        .filter(|value| !value.is_null())
        .map(|value| {
            serde_json::from_value(value.clone()).map_err(|source| ImportError::Shape {
                section: name,
                source,
            })
        })
        .transpose()
}
