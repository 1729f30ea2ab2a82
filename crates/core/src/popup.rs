//! Popup Dismissal Policy.
//!
//! Best effort: a popup that never shows up is the common case, and a driver
//! error here is logged rather than returned.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::browser::Browser;
use crate::locators::Matcher;
use crate::wait::wait_for_element;

/// Tries each matcher in order, each under its own `timeout`, and clicks the
/// first hit. Returns whether something was dismissed.
pub async fn dismiss_popups(
	browser: &dyn Browser,
	matchers: &[Matcher],
	timeout: Duration,
	settle: Duration,
	interval: Duration,
) -> bool {
	for matcher in matchers {
		let found = match wait_for_element(browser, &matcher.locator, matcher.readiness, timeout, interval).await {
			Ok(found) => found,
			Err(e) => {
				warn!(target = "igdm", strategy = matcher.label, error = %e, "popup check failed");
				return false;
			}
		};
		let Some(element) = found else {
			debug!(target = "igdm", strategy = matcher.label, "no popup");
			continue;
		};

		if let Err(e) = browser.click(&element).await {
			warn!(target = "igdm", strategy = matcher.label, error = %e, "popup click failed");
			return false;
		}
		debug!(target = "igdm", strategy = matcher.label, "popup dismissed");
		sleep(settle).await;
		return true;
	}
	false
}
