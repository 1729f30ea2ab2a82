//! Session capabilities.

use serde::{Deserialize, Serialize};

/// Body of `POST /session`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSessionRequest {
	pub capabilities: CapabilitiesRequest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesRequest {
	pub always_match: Capabilities,
}

/// Capabilities requested for a Chrome session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
	pub browser_name: String,
	#[serde(rename = "goog:chromeOptions")]
	pub chrome_options: ChromeOptions,
}

impl Default for Capabilities {
	fn default() -> Self {
		Self {
			browser_name: "chrome".to_string(),
			chrome_options: ChromeOptions::default(),
		}
	}
}

/// `goog:chromeOptions` vendor extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeOptions {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub binary: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub args: Vec<String>,
}

impl NewSessionRequest {
	/// Builds a Chrome session request with the given binary and arguments.
	pub fn chrome(binary: Option<String>, args: Vec<String>) -> Self {
		Self {
			capabilities: CapabilitiesRequest {
				always_match: Capabilities {
					chrome_options: ChromeOptions { binary, args },
					..Default::default()
				},
			},
		}
	}
}

/// `value` of a successful `POST /session` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResponse {
	pub session_id: String,
	#[serde(default)]
	pub capabilities: serde_json::Value,
}
