//! HTTP transport for the WebDriver wire protocol.
//!
//! [`WebDriverClient`] owns the endpoint URL and the pooled HTTP client and
//! performs request/response correlation: every command is one HTTP request
//! whose body is unwrapped from the `{"value": ...}` envelope, or decoded into
//! [`Error::WebDriver`] on a non-2xx status.

#[cfg(test)]
mod tests;

use std::time::Duration;

use igdm_protocol::{Envelope, ErrorValue, NewSessionRequest, NewSessionResponse};
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::session::Session;

/// Readiness report from `GET /status`.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverStatus {
	pub ready: bool,
	#[serde(default)]
	pub message: String,
}

/// Client bound to one WebDriver endpoint (e.g. `http://127.0.0.1:9515`).
#[derive(Debug, Clone)]
pub struct WebDriverClient {
	http: reqwest::Client,
	base: Url,
}

impl WebDriverClient {
	pub fn new(endpoint: &str) -> Result<Self> {
		let mut base = Url::parse(endpoint)?;
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());
			base.set_path(&path);
		}
		Ok(Self {
			http: reqwest::Client::new(),
			base,
		})
	}

	pub fn endpoint(&self) -> &Url {
		&self.base
	}

	pub async fn status(&self) -> Result<DriverStatus> {
		self.send(Method::GET, "status", None).await
	}

	/// Polls `GET /status` until the endpoint reports ready or `timeout` elapses.
	pub async fn wait_until_ready(&self, timeout: Duration) -> Result<()> {
		let deadline = tokio::time::Instant::now() + timeout;
		let mut last_reason = String::from("no response");

		loop {
			match self.status().await {
				Ok(status) if status.ready => return Ok(()),
				Ok(status) => last_reason = format!("not ready: {}", status.message),
				Err(e) => last_reason = e.to_string(),
			}

			if tokio::time::Instant::now() >= deadline {
				return Err(Error::ConnectionFailed {
					url: self.base.to_string(),
					reason: last_reason,
				});
			}
			tokio::time::sleep(Duration::from_millis(100)).await;
		}
	}

	/// Creates a browser session.
	pub async fn new_session(&self, request: &NewSessionRequest) -> Result<Session> {
		let body = serde_json::to_value(request)?;
		let created: NewSessionResponse = self.send(Method::POST, "session", Some(body)).await.map_err(|e| match e {
			Error::Http(err) if err.is_connect() => Error::ConnectionFailed {
				url: self.base.to_string(),
				reason: err.to_string(),
			},
			other => other,
		})?;

		debug!(target = "igdm", session_id = %created.session_id, endpoint = %self.base, "webdriver session created");
		Ok(Session::new(self.clone(), created.session_id))
	}

	/// Sends one command and unwraps the response envelope.
	///
	/// `path` is relative to the endpoint (no leading slash).
	pub(crate) async fn send<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T> {
		let url = self.base.join(path)?;
		trace!(target = "igdm", %method, %url, "webdriver command");

		let mut request = self.http.request(method, url);
		if let Some(body) = body {
			request = request.json(&body);
		}

		let response = request.send().await?;
		let status = response.status();
		let text = response.text().await?;

		if !status.is_success() {
			return Err(decode_error(status.as_u16(), &text));
		}

		let envelope: Envelope<T> = serde_json::from_str(&text)
			.map_err(|e| Error::ProtocolError(format!("unexpected response body for {path}: {e}")))?;
		Ok(envelope.value)
	}
}

fn decode_error(status: u16, body: &str) -> Error {
	match serde_json::from_str::<Envelope<ErrorValue>>(body) {
		Ok(envelope) => Error::WebDriver {
			code: envelope.value.code(),
			message: envelope.value.message,
		},
		Err(_) => Error::ProtocolError(format!("HTTP {status}: {body}")),
	}
}
