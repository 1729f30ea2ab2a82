//! Builds the [`BotConfig`] once at startup.
//!
//! Layers, lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. JSON file (`--config`, or `$XDG_CONFIG_HOME/igdm/config.json` when present)
//! 3. environment (`IG_USERNAME`, `IG_PASSWORD`, `CHROME_BINARY`, `DATABASE_URL`,
//!    `WEBDRIVER_URL`, `CHROMEDRIVER_PATH`)
//! 4. command-line flags

use std::fs;
use std::path::{Path, PathBuf};

use igdm::BotConfig;
use tracing::debug;

use crate::error::{CliError, Result};

const HEADLESS_ARG: &str = "--headless=new";

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
	pub username: Option<String>,
	pub database_url: Option<String>,
	pub webdriver_url: Option<String>,
	pub chrome_binary: Option<String>,
	pub launch_driver: bool,
	pub chromedriver_path: Option<PathBuf>,
	pub headless: bool,
}

/// `$XDG_CONFIG_HOME/igdm/config.json`, falling back to `~/.config`.
pub fn default_config_path() -> Option<PathBuf> {
	std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.or_else(dirs::config_dir)
		.map(|dir| dir.join("igdm").join("config.json"))
}

/// `sqlite://<data dir>/igdm/threads.db`, or `threads.db` in the working
/// directory when the platform has no data dir.
pub fn default_database_url() -> String {
	match dirs::data_dir() {
		Some(dir) => format!("sqlite://{}", dir.join("igdm").join("threads.db").display()),
		None => "sqlite://threads.db".to_string(),
	}
}

/// Loads the configuration from the real environment.
pub fn load(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<BotConfig> {
	let config = load_with(explicit, default_config_path().as_deref(), |key| std::env::var(key).ok(), overrides)?;
	debug!(target = "igdm", config = ?config, "effective configuration");
	Ok(config)
}

/// [`load`] with the default file location and environment lookup injected.
pub fn load_with<E>(
	explicit: Option<&Path>,
	default_path: Option<&Path>,
	env: E,
	overrides: &ConfigOverrides,
) -> Result<BotConfig>
where
	E: Fn(&str) -> Option<String>,
{
	let mut config = match (explicit, default_path) {
		(Some(path), _) => read_file(path)?,
		(None, Some(path)) if path.is_file() => read_file(path)?,
		_ => BotConfig::default(),
	};

	apply_env(&mut config, env);
	apply_overrides(&mut config, overrides);

	if config.database_url.as_deref().is_none_or(|url| url.trim().is_empty()) {
		config.database_url = Some(default_database_url());
	}
	if config.browser.webdriver_url.trim().is_empty() {
		return Err(CliError::Config("webdriverUrl must not be empty".to_string()));
	}

	Ok(config)
}

fn read_file(path: &Path) -> Result<BotConfig> {
	let contents = fs::read_to_string(path).map_err(|source| CliError::Read {
		path: path.to_path_buf(),
		source,
	})?;
	serde_json::from_str(&contents).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
}

fn apply_env<E>(config: &mut BotConfig, env: E)
where
	E: Fn(&str) -> Option<String>,
{
	let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

	if let Some(username) = var("IG_USERNAME") {
		config.credentials.username = username;
	}
	if let Some(password) = var("IG_PASSWORD") {
		config.credentials.password = password;
	}
	if let Some(binary) = var("CHROME_BINARY") {
		config.browser.chrome_binary = Some(binary);
	}
	if let Some(url) = var("DATABASE_URL") {
		config.database_url = Some(url);
	}
	if let Some(url) = var("WEBDRIVER_URL") {
		config.browser.webdriver_url = url;
	}
	if let Some(path) = var("CHROMEDRIVER_PATH") {
		config.browser.chromedriver_path = Some(PathBuf::from(path));
	}
}

fn apply_overrides(config: &mut BotConfig, overrides: &ConfigOverrides) {
	if let Some(username) = &overrides.username {
		config.credentials.username = username.clone();
	}
	if let Some(url) = &overrides.database_url {
		config.database_url = Some(url.clone());
	}
	if let Some(url) = &overrides.webdriver_url {
		config.browser.webdriver_url = url.clone();
	}
	if let Some(binary) = &overrides.chrome_binary {
		config.browser.chrome_binary = Some(binary.clone());
	}
	if let Some(path) = &overrides.chromedriver_path {
		config.browser.chromedriver_path = Some(path.clone());
	}
	if overrides.launch_driver {
		config.browser.launch_driver = true;
	}
	if overrides.headless && !config.browser.extra_args.iter().any(|a| a.starts_with("--headless")) {
		config.browser.extra_args.push(HEADLESS_ARG.to_string());
	}
}
