use super::error::{StateError, StateResult};
use super::{PanelEvent, PanelState, StateTransition, SubPanel};

#[derive(Debug)]
pub struct PanelStateMachine {
    state: PanelState,
    sub_panel: Option<SubPanel>,
    transition_history: Vec<StateTransition>,
}

impl PanelStateMachine {
    pub fn new() -> Self {
        Self {
            state: PanelState::default(),
            sub_panel: None,
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == PanelState::Visible
    }

    pub fn sub_panel(&self) -> Option<SubPanel> {
        self.sub_panel
    }

    pub fn can_transition(&self, event: PanelEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: PanelEvent) -> Option<PanelState> {
        use PanelEvent::*;
        match (self.state, event) {
            (PanelState::Hidden, Show) | (PanelState::Hidden, Toggle) => Some(PanelState::Visible),
            (PanelState::Visible, Hide) | (PanelState::Visible, Toggle) => Some(PanelState::Hidden),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: PanelEvent) -> StateResult<PanelState> {
        tracing::debug!(from = ?self.state, event = ?event, "request panel transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid panel transition requested");
            StateError::InvalidTransition { from, event }
        })?;

        let record = StateTransition::new(self.state, event, next);
        self.state = next;
        self.transition_history.push(record);
        if next == PanelState::Hidden {
            self.sub_panel = None;
        }

        Ok(self.state)
    }

    /// Opens `panel`, closing whichever was open, or closes it if it already
    /// was. Returns the sub-panel open afterwards.
    pub fn toggle_sub_panel(&mut self, panel: SubPanel) -> Option<SubPanel> {
        if !self.is_visible() {
            return None;
        }
        self.sub_panel = match self.sub_panel {
            Some(open) if open == panel => None,
            _ => Some(panel),
        };
        self.sub_panel
    }
}

#[cfg(test)]
impl PanelStateMachine {
    fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for PanelStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PanelStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PanelState::{:?}", self.state)
    }
}
