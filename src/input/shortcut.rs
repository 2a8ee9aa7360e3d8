use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TOGGLE_SHORTCUT: &str = "Alt+V";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortcutError {
    #[error("shortcut combination is empty")]
    EmptyCombo,
    #[error("unknown modifier \"{0}\"")]
    UnknownModifier(String),
}

pub type ShortcutResult<T> = std::result::Result<T, ShortcutError>;

/// A modifier set plus one key, e.g. `Ctrl+Shift+S`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortcutCombo {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    pub key: String,
}

impl ShortcutCombo {
    pub fn new(key: &str) -> Self {
        Self {
            key: normalize_key(key),
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, ctrl: bool, alt: bool, shift: bool, meta: bool) -> Self {
        self.ctrl = ctrl;
        self.alt = alt;
        self.shift = shift;
        self.meta = meta;
        self
    }
}

fn normalize_key(key: &str) -> String {
    let key = key.trim();
    if key.chars().count() == 1 {
        key.to_uppercase()
    } else {
        key.to_string()
    }
}

impl FromStr for ShortcutCombo {
    type Err = ShortcutError;

    fn from_str(raw: &str) -> ShortcutResult<Self> {
        let mut parts: Vec<&str> = raw.split('+').map(str::trim).collect();
        // A trailing "+" means the plus key itself.
        if raw.trim_end().ends_with("++") || raw.trim() == "+" {
            parts.retain(|part| !part.is_empty());
            parts.push("+");
        }
        let key = parts.pop().unwrap_or_default();
        if key.is_empty() {
            return Err(ShortcutError::EmptyCombo);
        }

        let mut combo = ShortcutCombo::new(key);
        for modifier in parts {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => combo.ctrl = true,
                "alt" | "option" => combo.alt = true,
                "shift" => combo.shift = true,
                "meta" | "cmd" | "command" | "super" => combo.meta = true,
                other => return Err(ShortcutError::UnknownModifier(other.to_string())),
            }
        }
        Ok(combo)
    }
}

impl fmt::Display for ShortcutCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (active, label) in [
            (self.ctrl, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
            (self.meta, "Meta"),
        ] {
            if active {
                write!(f, "{label}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

impl TryFrom<String> for ShortcutCombo {
    type Error = ShortcutError;

    fn try_from(raw: String) -> ShortcutResult<Self> {
        raw.parse()
    }
}

impl From<ShortcutCombo> for String {
    fn from(combo: ShortcutCombo) -> Self {
        combo.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ShortcutAction {
    TogglePanel,
    NextProfile,
    PreviousProfile,
    SetProfile(String),
    SetSpeed(f64),
    AdjustSpeed(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutBinding {
    pub combo: ShortcutCombo,
    pub action: ShortcutAction,
}

/// The fixed toggle chord plus user bindings. Later bindings for the same
/// combo replace earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutTable {
    toggle: ShortcutCombo,
    bindings: Vec<ShortcutBinding>,
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self {
            toggle: ShortcutCombo::new("V").with_modifiers(false, true, false, false),
            bindings: Vec::new(),
        }
    }
}

impl ShortcutTable {
    pub fn with_toggle(toggle: ShortcutCombo) -> Self {
        Self {
            toggle,
            bindings: Vec::new(),
        }
    }

    pub fn toggle(&self) -> &ShortcutCombo {
        &self.toggle
    }

    pub fn bindings(&self) -> &[ShortcutBinding] {
        &self.bindings
    }

    pub fn bind(&mut self, binding: ShortcutBinding) -> ShortcutResult<()> {
        if binding.combo.key.is_empty() {
            return Err(ShortcutError::EmptyCombo);
        }
        self.bindings.retain(|existing| existing.combo != binding.combo);
        self.bindings.push(binding);
        Ok(())
    }

    pub fn unbind(&mut self, combo: &ShortcutCombo) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|existing| &existing.combo != combo);
        before != self.bindings.len()
    }

    /// Replaces user bindings, dropping entries with an empty key.
    pub fn replace_bindings(&mut self, bindings: Vec<ShortcutBinding>) {
        self.bindings.clear();
        for binding in bindings {
            if let Err(err) = self.bind(binding) {
                tracing::warn!(?err, "dropping stored shortcut");
            }
        }
    }

    pub fn resolve(&self, combo: &ShortcutCombo) -> Option<ShortcutAction> {
        if combo == &self.toggle {
            return Some(ShortcutAction::TogglePanel);
        }
        self.bindings
            .iter()
            .find(|binding| &binding.combo == combo)
            .map(|binding| binding.action.clone())
    }
}
