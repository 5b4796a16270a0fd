//! Construction of the core collaborators from CLI flags.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use gatepass::bridge::{ExtensionBridge, Messenger};
use gatepass::exchange::AuthExchange;
use gatepass::storage::FileStorage;
use gatepass::store::SessionStore;
use gatepass::{AppConfig, Profile, SessionController};

use crate::cli::Cli;

/// Resolves the effective configuration from the profile and overrides.
pub fn build_config(cli: &Cli) -> anyhow::Result<AppConfig> {
	let profile: Profile = cli.profile.parse().map_err(|e: String| anyhow::anyhow!(e))?;
	let mut config = AppConfig::for_profile(profile);
	if let Some(api_url) = &cli.api_url {
		config.api_url = api_url.clone();
	}
	Ok(config)
}

/// Session storage path: the `--storage` flag, or
/// `<config dir>/gatepass/session.json`.
pub fn storage_path(cli: &Cli) -> anyhow::Result<PathBuf> {
	if let Some(path) = &cli.storage {
		return Ok(path.clone());
	}
	let base = dirs::config_dir().context("could not determine config directory")?;
	Ok(base.join("gatepass").join("session.json"))
}

/// Opens the session store over file storage at `path`.
pub fn build_store(path: &Path) -> SessionStore {
	SessionStore::new(Arc::new(FileStorage::open(path)))
}

/// Builds a bootstrapped controller with an optional extension messenger.
pub fn build_controller(
	config: &AppConfig,
	storage: &Path,
	messenger: Option<Arc<dyn Messenger>>,
) -> anyhow::Result<SessionController> {
	let store = build_store(storage);
	let exchange = AuthExchange::new(config)?;
	let bridge = ExtensionBridge::new(messenger);
	Ok(SessionController::bootstrap(store, exchange, bridge))
}
