//! Top-level operations: acquire a browser, log in, do the work, release.

use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use crate::browser::{Browser, WebDriverBrowser};
use crate::config::BotConfig;
use crate::directory::DirectoryStore;
use crate::dispatcher::{DispatchReport, DispatchRequest, Dispatcher, require_recipients};
use crate::error::Result;
use crate::resolver::ThreadResolver;
use crate::session::establish;

/// A recipient token and the thread it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedThread {
	pub recipient: String,
	pub thread_id: String,
}

/// Runs `f` against `browser`, then quits the browser whatever the outcome.
///
/// A failing quit is logged; the result of `f` is returned unchanged.
pub async fn with_browser<'b, T, F, Fut>(browser: &'b dyn Browser, f: F) -> Result<T>
where
	F: FnOnce(&'b dyn Browser) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let result = f(browser).await;
	if let Err(e) = browser.quit().await {
		warn!(target = "igdm", error = %e, "browser release failed");
	}
	result
}

/// Logs in and delivers `request`.
///
/// The request is validated before any browser is started.
pub async fn send(config: &BotConfig, directory: &dyn DirectoryStore, request: &DispatchRequest) -> Result<DispatchReport> {
	request.validate()?;
	let browser = WebDriverBrowser::launch(&config.browser).await?;
	send_with(&browser, config, directory, request).await
}

/// [`send`] over an already acquired browser, which is released afterwards
/// even when the request is invalid.
pub async fn send_with(
	browser: &dyn Browser,
	config: &BotConfig,
	directory: &dyn DirectoryStore,
	request: &DispatchRequest,
) -> Result<DispatchReport> {
	with_browser(browser, |browser| async move {
		request.validate()?;
		let session = establish(browser, &config.credentials, &config.endpoints, &config.timeouts).await?;
		Dispatcher::new(&session, directory, config).dispatch(request).await
	})
	.await
}

/// Logs in and resolves every token, persisting new mappings without sending
/// anything.
pub async fn resolve_all(
	config: &BotConfig,
	directory: &dyn DirectoryStore,
	recipients: &[String],
) -> Result<Vec<ResolvedThread>> {
	require_recipients(recipients)?;
	let browser = WebDriverBrowser::launch(&config.browser).await?;
	resolve_with(&browser, config, directory, recipients).await
}

pub async fn resolve_with(
	browser: &dyn Browser,
	config: &BotConfig,
	directory: &dyn DirectoryStore,
	recipients: &[String],
) -> Result<Vec<ResolvedThread>> {
	with_browser(browser, |browser| async move {
		require_recipients(recipients)?;
		let session = establish(browser, &config.credentials, &config.endpoints, &config.timeouts).await?;
		let resolver = ThreadResolver::new(&session, directory, &config.endpoints, &config.timeouts);

		let mut resolved = Vec::new();
		for token in recipients.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
			let thread_id = resolver.resolve(token).await?;
			info!(target = "igdm", recipient = %token, thread_id = %thread_id, "resolved");
			resolved.push(ResolvedThread {
				recipient: token.to_string(),
				thread_id,
			});
		}
		Ok(resolved)
	})
	.await
}
