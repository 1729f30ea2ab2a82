//! Bounded polling waits.
//!
//! Every wait in the bot goes through [`poll_until`]. Expiry is reported as
//! `Ok(None)`; the caller turns that into the failure appropriate for its step
//! (or ignores it, for best-effort steps).

use std::future::Future;
use std::time::Duration;

use igdm_protocol::{ElementRef, Locator};
use tokio::time::{Instant, sleep};

use crate::browser::Browser;

/// What an element wait requires beyond presence in the DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
	Present,
	/// Present, displayed and enabled.
	Clickable,
}

/// Polls `check` every `interval` until it yields `Some` or `timeout` elapses.
///
/// The check always runs at least once. Errors from the check end the wait
/// immediately.
pub async fn poll_until<T, F, Fut>(timeout: Duration, interval: Duration, mut check: F) -> igdm_runtime::Result<Option<T>>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = igdm_runtime::Result<Option<T>>>,
{
	let deadline = Instant::now() + timeout;
	loop {
		if let Some(value) = check().await? {
			return Ok(Some(value));
		}

		let now = Instant::now();
		if now >= deadline {
			return Ok(None);
		}
		sleep(interval.min(deadline - now)).await;
	}
}

/// Waits for `locator` to reach `readiness`.
pub async fn wait_for_element(
	browser: &dyn Browser,
	locator: &Locator,
	readiness: Readiness,
	timeout: Duration,
	interval: Duration,
) -> igdm_runtime::Result<Option<ElementRef>> {
	poll_until(timeout, interval, move || check_element(browser, locator, readiness)).await
}

async fn check_element(
	browser: &dyn Browser,
	locator: &Locator,
	readiness: Readiness,
) -> igdm_runtime::Result<Option<ElementRef>> {
	let Some(element) = browser.find(locator).await? else {
		return Ok(None);
	};
	match readiness {
		Readiness::Present => Ok(Some(element)),
		Readiness::Clickable if browser.is_clickable(&element).await? => Ok(Some(element)),
		Readiness::Clickable => Ok(None),
	}
}

/// Waits until the current URL satisfies `accept`, returning it.
pub async fn wait_for_url<P>(
	browser: &dyn Browser,
	timeout: Duration,
	interval: Duration,
	accept: P,
) -> igdm_runtime::Result<Option<String>>
where
	P: Fn(&str) -> bool,
{
	let accept = &accept;
	poll_until(timeout, interval, move || check_url(browser, accept)).await
}

async fn check_url<P>(browser: &dyn Browser, accept: &P) -> igdm_runtime::Result<Option<String>>
where
	P: Fn(&str) -> bool,
{
	let url = browser.current_url().await?;
	Ok(accept(&url).then_some(url))
}
