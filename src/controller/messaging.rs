use serde::Serialize;

use super::SettingsController;
use crate::dom::DomTree;
use crate::storage::KeyValueStore;

/// Inbound actions from the extension's other surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Reset,
    NextProfile,
    PreviousProfile,
    GetStatus,
    GetVideoCount,
}

impl Command {
    pub fn parse(action: &str) -> Option<Self> {
        let command = match action {
            "toggle-vivideo" => Self::Toggle,
            "reset-vivideo" => Self::Reset,
            "next-profile" => Self::NextProfile,
            "previous-profile" => Self::PreviousProfile,
            "get-status" => Self::GetStatus,
            "get-video-count" => Self::GetVideoCount,
            other => {
                tracing::debug!(action = other, "ignoring unknown command");
                return None;
            }
        };
        Some(command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub video_count: usize,
    pub is_visible: bool,
    pub active_profile: Option<String>,
}

impl<D: DomTree, S: KeyValueStore> SettingsController<D, S> {
    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            video_count: self.video_count(),
            is_visible: self.panel.is_visible(),
            active_profile: self.settings.active_profile.clone(),
        }
    }

    /// Runs `command` and reports the resulting status.
    pub fn handle_command(&mut self, command: Command) -> StatusResponse {
        tracing::debug!(?command, "received command");
        match command {
            Command::Toggle => {
                self.toggle_panel();
            }
            Command::Reset => self.reset_all(),
            Command::NextProfile => {
                self.next_profile();
            }
            Command::PreviousProfile => {
                self.previous_profile();
            }
            Command::GetStatus | Command::GetVideoCount => {}
        }
        self.status()
    }
}
