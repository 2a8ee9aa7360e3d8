use super::model::PanelState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Show,
    Hide,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: PanelState,
    pub event: PanelEvent,
    pub to: PanelState,
}

impl StateTransition {
    pub const fn new(from: PanelState, event: PanelEvent, to: PanelState) -> Self {
        Self { from, event, to }
    }
}
