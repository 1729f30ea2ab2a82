//! Web element references.

use serde::{Deserialize, Serialize};

/// JSON key the remote end uses to tag a web element reference.
///
/// See <https://www.w3.org/TR/webdriver2/#elements>
pub const ELEMENT_KEY: &str = "element-6066-11e4-a6ae-4d4e5a5e4f5a";

/// Opaque reference to an element in the remote browsing context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
	#[serde(rename = "element-6066-11e4-a6ae-4d4e5a5e4f5a")]
	pub id: String,
}

impl ElementRef {
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into() }
	}

	/// Serializes the reference for use as an `execute/sync` script argument.
	pub fn to_script_arg(&self) -> serde_json::Value {
		serde_json::json!({ ELEMENT_KEY: self.id })
	}
}
