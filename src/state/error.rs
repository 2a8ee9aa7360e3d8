use super::event::PanelEvent;
use super::model::PanelState;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid panel transition: from {from:?} using event {event:?}")]
    InvalidTransition { from: PanelState, event: PanelEvent },
}
