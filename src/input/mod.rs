mod shortcut;

pub use shortcut::{
    ShortcutAction, ShortcutBinding, ShortcutCombo, ShortcutError, ShortcutResult, ShortcutTable,
    DEFAULT_TOGGLE_SHORTCUT,
};
