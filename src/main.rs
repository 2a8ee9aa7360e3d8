use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use vivideo::dom::MemoryDom;
use vivideo::filter::math::format_number;
use vivideo::filter::{temperature_label, FilterChain};
use vivideo::storage::{JsonFileStore, KeyValueStore};
use vivideo::{load_app_config, logging, AppConfig, SettingsController};

fn main() -> Result<()> {
    logging::init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: vivideo <bundle.json>");
    };
    let serialized = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let config = load_app_config();
    let store = match config.storage_file.clone() {
        Some(storage_file) => JsonFileStore::with_path(storage_file),
        None => JsonFileStore::with_default_path().context("failed to locate storage.json")?,
    };
    tracing::debug!(path = %store.path().display(), "using storage file");
    inspect(store, &config, &path, &serialized)
}

fn inspect<S: KeyValueStore>(
    store: S,
    config: &AppConfig,
    path: &Path,
    serialized: &str,
) -> Result<()> {
    let mut controller = SettingsController::new(MemoryDom::new(), store, config);
    controller.load();
    controller
        .import_json(serialized)
        .with_context(|| format!("failed to import {}", path.display()))?;

    let settings = controller.settings();
    let chain = FilterChain::from_settings(settings);
    println!(
        "profile: {}",
        settings.active_profile.as_deref().unwrap_or("DEFAULT")
    );
    println!("filter: {}", chain.css_value());
    println!(
        "temperature: {} ({})",
        temperature_label(settings.color_temp),
        format_number(settings.color_temp)
    );
    println!("speed: {}x", format_number(settings.speed));
    match &chain.advanced {
        Some(advanced) => println!("{}", advanced.to_markup()),
        None => println!("no advanced filter"),
    }
    println!("profiles: {}", controller.profiles().len());
    Ok(())
}
