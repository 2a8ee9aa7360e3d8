pub mod error;
pub mod event;
pub mod machine;
pub mod model;

pub use error::{StateError, StateResult};
pub use event::{PanelEvent, StateTransition};
pub use machine::PanelStateMachine;
pub use model::{PanelState, SubPanel};
