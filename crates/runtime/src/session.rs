//! Commands scoped to one WebDriver session.

use std::sync::atomic::{AtomicBool, Ordering};

use igdm_protocol::{ElementRef, Locator};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::client::WebDriverClient;
use crate::error::{Error, Result};

/// A live browser session.
///
/// Commands fail with [`Error::SessionClosed`] once [`Session::delete`] has run.
#[derive(Debug)]
pub struct Session {
	client: WebDriverClient,
	id: String,
	closed: AtomicBool,
}

impl Session {
	pub(crate) fn new(client: WebDriverClient, id: String) -> Self {
		Self {
			client,
			id,
			closed: AtomicBool::new(false),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	async fn command<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T> {
		if self.is_closed() {
			return Err(Error::SessionClosed);
		}
		let path = format!("session/{}/{path}", self.id);
		self.client.send(method, &path, body).await
	}

	/// Navigates the current top-level browsing context.
	pub async fn navigate(&self, url: &str) -> Result<()> {
		self.command(Method::POST, "url", Some(json!({ "url": url }))).await
	}

	pub async fn current_url(&self) -> Result<String> {
		self.command(Method::GET, "url", None).await
	}

	/// Finds the first element matching `locator`.
	///
	/// A miss is reported by the remote end as `no such element`; see
	/// [`Error::is_no_such_element`].
	pub async fn find_element(&self, locator: &Locator) -> Result<ElementRef> {
		self.command(Method::POST, "element", Some(serde_json::to_value(locator)?)).await
	}

	pub async fn click(&self, element: &ElementRef) -> Result<()> {
		self.command(Method::POST, &format!("element/{}/click", element.id), Some(json!({})))
			.await
	}

	pub async fn clear(&self, element: &ElementRef) -> Result<()> {
		self.command(Method::POST, &format!("element/{}/clear", element.id), Some(json!({})))
			.await
	}

	/// Types `text` into the element. Special keys use [`igdm_protocol::keys`].
	pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
		self.command(
			Method::POST,
			&format!("element/{}/value", element.id),
			Some(json!({ "text": text })),
		)
		.await
	}

	pub async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
		self.command(Method::GET, &format!("element/{}/displayed", element.id), None)
			.await
	}

	pub async fn is_enabled(&self, element: &ElementRef) -> Result<bool> {
		self.command(Method::GET, &format!("element/{}/enabled", element.id), None)
			.await
	}

	/// Runs a synchronous script in the page and returns its result.
	pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
		self.command(
			Method::POST,
			"execute/sync",
			Some(json!({ "script": script, "args": args })),
		)
		.await
	}

	pub async fn maximize_window(&self) -> Result<()> {
		let _rect: Value = self.command(Method::POST, "window/maximize", Some(json!({}))).await?;
		Ok(())
	}

	/// Ends the session. Later commands fail with [`Error::SessionClosed`].
	pub async fn delete(&self) -> Result<()> {
		if self.closed.swap(true, Ordering::SeqCst) {
			return Ok(());
		}
		let path = format!("session/{}", self.id);
		let _: Value = self.client.send(Method::DELETE, &path, None).await?;
		debug!(target = "igdm", session_id = %self.id, "webdriver session deleted");
		Ok(())
	}
}
