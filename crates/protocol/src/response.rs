//! Response envelopes and remote error codes.
//!
//! Every WebDriver response body is `{"value": ...}`. On failure the value is
//! an [`ErrorValue`] whose `error` string maps onto [`ErrorCode`].
//!
//! See <https://www.w3.org/TR/webdriver2/#errors>

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `{"value": T}` wrapper shared by every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
	pub value: T,
}

/// Error payload returned with a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorValue {
	pub error: String,
	#[serde(default)]
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stacktrace: Option<String>,
}

impl ErrorValue {
	pub fn code(&self) -> ErrorCode {
		self.error.parse().unwrap_or(ErrorCode::UnknownError)
	}
}

/// Remote error codes the client distinguishes.
///
/// Codes not listed collapse into [`ErrorCode::UnknownError`]; the original
/// string is kept on [`ErrorValue::error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
	ElementClickIntercepted,
	ElementNotInteractable,
	InvalidArgument,
	InvalidSelector,
	InvalidSessionId,
	JavascriptError,
	NoSuchElement,
	NoSuchWindow,
	ScriptTimeout,
	SessionNotCreated,
	StaleElementReference,
	Timeout,
	UnknownCommand,
	UnknownError,
}

impl ErrorCode {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::ElementClickIntercepted => "element click intercepted",
			Self::ElementNotInteractable => "element not interactable",
			Self::InvalidArgument => "invalid argument",
			Self::InvalidSelector => "invalid selector",
			Self::InvalidSessionId => "invalid session id",
			Self::JavascriptError => "javascript error",
			Self::NoSuchElement => "no such element",
			Self::NoSuchWindow => "no such window",
			Self::ScriptTimeout => "script timeout",
			Self::SessionNotCreated => "session not created",
			Self::StaleElementReference => "stale element reference",
			Self::Timeout => "timeout",
			Self::UnknownCommand => "unknown command",
			Self::UnknownError => "unknown error",
		}
	}
}

impl FromStr for ErrorCode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let code = match s {
			"element click intercepted" => Self::ElementClickIntercepted,
			"element not interactable" => Self::ElementNotInteractable,
			"invalid argument" => Self::InvalidArgument,
			"invalid selector" => Self::InvalidSelector,
			"invalid session id" => Self::InvalidSessionId,
			"javascript error" => Self::JavascriptError,
			"no such element" => Self::NoSuchElement,
			"no such window" => Self::NoSuchWindow,
			"script timeout" => Self::ScriptTimeout,
			"session not created" => Self::SessionNotCreated,
			"stale element reference" => Self::StaleElementReference,
			"timeout" => Self::Timeout,
			"unknown command" => Self::UnknownCommand,
			"unknown error" => Self::UnknownError,
			other => return Err(format!("unrecognized webdriver error code: {other}")),
		};
		Ok(code)
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
