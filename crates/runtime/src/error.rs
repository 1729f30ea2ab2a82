//! Error types for the WebDriver runtime.

use igdm_protocol::ErrorCode;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a WebDriver endpoint.
#[derive(Debug, Error)]
pub enum Error {
	/// No chromedriver executable could be located.
	#[error("chromedriver not found. Set CHROMEDRIVER_PATH or install chromedriver on PATH")]
	DriverNotFound,

	/// Failed to launch the chromedriver process.
	#[error("Failed to launch chromedriver: {0}")]
	LaunchFailed(String),

	/// The endpoint could not be reached or never reported ready.
	#[error("Failed to connect to WebDriver at {url}: {reason}")]
	ConnectionFailed { url: String, reason: String },

	/// HTTP transport error.
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	/// Error reported by the remote end.
	#[error("{code}: {message}")]
	WebDriver {
		/// Typed error code (`no such element`, `element click intercepted`, ...)
		code: ErrorCode,
		/// Human-readable message from the remote end
		message: String,
	},

	/// Response body did not match the expected shape.
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// Operation attempted after the session was deleted.
	#[error("WebDriver session already closed")]
	SessionClosed,

	/// Invalid URL.
	#[error("Invalid URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Returns the remote error code, if this error came from the remote end.
	pub fn code(&self) -> Option<ErrorCode> {
		match self {
			Self::WebDriver { code, .. } => Some(*code),
			_ => None,
		}
	}

	/// True when another element would receive the click.
	pub fn is_click_intercepted(&self) -> bool {
		self.code() == Some(ErrorCode::ElementClickIntercepted)
	}

	pub fn is_no_such_element(&self) -> bool {
		self.code() == Some(ErrorCode::NoSuchElement)
	}

	pub fn is_stale_element(&self) -> bool {
		self.code() == Some(ErrorCode::StaleElementReference)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classifies_remote_codes() {
		let err = Error::WebDriver {
			code: ErrorCode::ElementClickIntercepted,
			message: "other element would receive the click".into(),
		};
		assert!(err.is_click_intercepted());
		assert!(!err.is_no_such_element());
		assert_eq!(err.to_string(), "element click intercepted: other element would receive the click");
	}

	#[test]
	fn local_errors_have_no_code() {
		assert_eq!(Error::SessionClosed.code(), None);
		assert!(!Error::DriverNotFound.is_click_intercepted());
	}
}
