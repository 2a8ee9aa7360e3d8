#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    Visible,
}

/// Sub-panels inside the visible panel. At most one is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubPanel {
    Profiles,
    Themes,
    Info,
    SettingsManagement,
}
