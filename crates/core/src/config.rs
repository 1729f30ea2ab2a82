//! Process-wide configuration.
//!
//! [`BotConfig`] is built once at process entry (see `igdm-cli`) and passed by
//! reference into the session controller, the directory store constructor and
//! the dispatcher. Nothing in this crate reads the environment directly.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default WebDriver endpoint (a chromedriver started with `--port=9515`).
pub const DEFAULT_WEBDRIVER_URL: &str = "http://127.0.0.1:9515";
/// Default Chrome binary location.
pub const DEFAULT_CHROME_BINARY: &str = "/usr/bin/google-chrome-stable";
/// Default Instagram web origin.
pub const DEFAULT_BASE_URL: &str = "https://www.instagram.com";
/// Default "start conversation" intent prefix.
pub const DEFAULT_INTENT_BASE_URL: &str = "https://ig.me/m";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
	#[serde(default)]
	pub credentials: Credentials,
	#[serde(default)]
	pub browser: BrowserConfig,
	/// Directory store location (`sqlite://path`, `sqlite::memory:`, or a plain path).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub database_url: Option<String>,
	#[serde(default)]
	pub endpoints: Endpoints,
	#[serde(default)]
	pub ui: UiLabels,
	#[serde(default)]
	pub timeouts: Timeouts,
}

/// Account used to log in.
///
/// `Debug` redacts the password.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub password: String,
}

impl Credentials {
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			password: password.into(),
		}
	}

	/// Both fields are non-blank.
	pub fn is_complete(&self) -> bool {
		!self.username.trim().is_empty() && !self.password.is_empty()
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &if self.password.is_empty() { "" } else { "<redacted>" })
			.finish()
	}
}

/// Browser and WebDriver endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserConfig {
	pub webdriver_url: String,
	pub chrome_binary: Option<String>,
	/// Spawn a private chromedriver instead of connecting to `webdriver_url`.
	pub launch_driver: bool,
	pub chromedriver_path: Option<PathBuf>,
	/// Port for a launched chromedriver.
	pub driver_port: u16,
	pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
	fn default() -> Self {
		Self {
			webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
			chrome_binary: Some(DEFAULT_CHROME_BINARY.to_string()),
			launch_driver: false,
			chromedriver_path: None,
			driver_port: 9515,
			extra_args: Vec::new(),
		}
	}
}

impl BrowserConfig {
	/// Chrome arguments for every session: private window, container-friendly flags.
	pub fn chrome_args(&self) -> Vec<String> {
		let mut args = vec![
			"--incognito".to_string(),
			"--no-sandbox".to_string(),
			"--disable-dev-shm-usage".to_string(),
		];
		args.extend(self.extra_args.iter().cloned());
		args
	}
}

/// URL templates of the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoints {
	pub base_url: String,
	pub intent_base_url: String,
}

impl Default for Endpoints {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			intent_base_url: DEFAULT_INTENT_BASE_URL.to_string(),
		}
	}
}

impl Endpoints {
	pub fn login_url(&self) -> String {
		format!("{}/accounts/login/", self.base_url.trim_end_matches('/'))
	}

	pub fn thread_url(&self, thread_id: &str) -> String {
		format!("{}/direct/t/{thread_id}/", self.base_url.trim_end_matches('/'))
	}

	/// Opening this URL makes the platform create or open the conversation
	/// with `username` and redirect to its thread URL.
	pub fn intent_url(&self, username: &str) -> String {
		format!("{}/{username}", self.intent_base_url.trim_end_matches('/'))
	}
}

/// Locale-dependent button labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiLabels {
	/// Dismiss button of the "Turn on Notifications" dialog.
	pub dismiss_label: String,
	/// Confirmation button shown under an attachment preview.
	pub send_attachment_label: String,
}

impl Default for UiLabels {
	fn default() -> Self {
		Self {
			dismiss_label: "Not Now".to_string(),
			send_attachment_label: "Enviar".to_string(),
		}
	}
}

/// Bounded waits and settle pauses, serialized as milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timeouts {
	#[serde(with = "duration_ms")]
	pub login_form: Duration,
	#[serde(with = "duration_ms")]
	pub login_redirect: Duration,
	#[serde(with = "duration_ms")]
	pub login_settle: Duration,
	#[serde(with = "duration_ms")]
	pub resolve_redirect: Duration,
	/// Per-strategy wait when dismissing popups after opening a chat.
	#[serde(with = "duration_ms")]
	pub popup: Duration,
	/// Per-strategy wait when dismissing popups after an intercepted click.
	#[serde(with = "duration_ms")]
	pub popup_retry: Duration,
	#[serde(with = "duration_ms")]
	pub popup_settle: Duration,
	#[serde(with = "duration_ms")]
	pub chat_settle: Duration,
	#[serde(with = "duration_ms")]
	pub input: Duration,
	#[serde(with = "duration_ms")]
	pub message_pause: Duration,
	#[serde(with = "duration_ms")]
	pub attachment_preview: Duration,
	#[serde(with = "duration_ms")]
	pub attachment_settle: Duration,
	#[serde(with = "duration_ms")]
	pub poll_interval: Duration,
}

impl Default for Timeouts {
	fn default() -> Self {
		Self {
			login_form: Duration::from_secs(25),
			login_redirect: Duration::from_secs(25),
			login_settle: Duration::from_secs(2),
			resolve_redirect: Duration::from_secs(15),
			popup: Duration::from_secs(15),
			popup_retry: Duration::from_secs(10),
			popup_settle: Duration::from_secs(1),
			chat_settle: Duration::from_secs(1),
			input: Duration::from_secs(20),
			message_pause: Duration::from_millis(500),
			attachment_preview: Duration::from_secs(3),
			attachment_settle: Duration::from_secs(2),
			poll_interval: Duration::from_millis(500),
		}
	}
}

mod duration_ms {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u64(value.as_millis() as u64)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
		u64::deserialize(deserializer).map(Duration::from_millis)
	}
}
