//! Element location strategies.
//!
//! See <https://www.w3.org/TR/webdriver2/#locator-strategies>

use std::fmt;

use serde::{Deserialize, Serialize};

/// Strategy used by the remote end to interpret [`Locator::value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocatorStrategy {
	#[serde(rename = "css selector")]
	Css,
	#[serde(rename = "xpath")]
	XPath,
}

impl LocatorStrategy {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Css => "css selector",
			Self::XPath => "xpath",
		}
	}
}

/// Body of `POST /session/{id}/element`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
	pub using: LocatorStrategy,
	pub value: String,
}

impl Locator {
	pub fn new(using: LocatorStrategy, value: impl Into<String>) -> Self {
		Self {
			using,
			value: value.into(),
		}
	}

	pub fn css(selector: impl Into<String>) -> Self {
		Self::new(LocatorStrategy::Css, selector)
	}

	pub fn xpath(expression: impl Into<String>) -> Self {
		Self::new(LocatorStrategy::XPath, expression)
	}

	/// Matches `<input name="...">`, the WebDriver equivalent of a by-name lookup.
	pub fn input_named(name: &str) -> Self {
		Self::css(format!("input[name=\"{name}\"]"))
	}
}

impl fmt::Display for Locator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}={}", self.using.as_str(), self.value)
	}
}
