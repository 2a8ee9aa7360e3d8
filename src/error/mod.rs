use crate::bundle::ImportError;
use crate::dom::DomError;
use crate::input::ShortcutError;
use crate::profile::ProfileError;
use crate::state::StateError;
use crate::storage::StorageError;
use crate::theme::ThemeError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Shortcut(#[from] ShortcutError),
    #[error("failed to serialize export bundle")]
    Export(#[from] serde_json::Error),
}
