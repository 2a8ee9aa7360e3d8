pub mod apply;
pub mod bundle;
mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod filter;
pub mod input;
pub mod logging;
pub mod media;
pub mod profile;
pub mod settings;
pub mod state;
pub mod storage;
pub mod theme;

pub use config::{load_app_config, AppConfig};
pub use controller::SettingsController;
pub use error::{AppError, AppResult};
