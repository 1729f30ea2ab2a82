//! Session Controller: logs the browser in.

use igdm_protocol::keys;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::browser::Browser;
use crate::config::{Credentials, Endpoints, Timeouts};
use crate::error::{BotError, Result};
use crate::locators;
use crate::wait::{Readiness, wait_for_element, wait_for_url};

/// Path fragment present in every URL of the login surface.
const LOGIN_PATH: &str = "accounts/login";

/// A browser that has completed login.
///
/// Only [`establish`] produces one, so code taking an
/// `&AuthenticatedSession` cannot run against a logged-out browser.
pub struct AuthenticatedSession<'b> {
	browser: &'b dyn Browser,
	username: String,
}

impl<'b> AuthenticatedSession<'b> {
	pub fn browser(&self) -> &'b dyn Browser {
		self.browser
	}

	/// The account that logged in.
	pub fn username(&self) -> &str {
		&self.username
	}

	#[cfg(test)]
	pub(crate) fn assume(browser: &'b dyn Browser) -> Self {
		Self {
			browser,
			username: "tester".to_string(),
		}
	}
}

/// Logs in with `credentials`.
///
/// Fails with [`BotError::Auth`] when credentials are missing, the form never
/// shows up, or the browser is still on the login surface after submitting.
/// Nothing is retried.
pub async fn establish<'b>(
	browser: &'b dyn Browser,
	credentials: &Credentials,
	endpoints: &Endpoints,
	timeouts: &Timeouts,
) -> Result<AuthenticatedSession<'b>> {
	if !credentials.is_complete() {
		return Err(BotError::Auth("missing username or password".to_string()));
	}

	let login_url = endpoints.login_url();
	debug!(target = "igdm", url = %login_url, "opening login page");
	browser.goto(&login_url).await?;

	let username_locator = locators::username_field();
	let password_locator = locators::password_field();
	let username_field =
		wait_for_element(browser, &username_locator, Readiness::Present, timeouts.login_form, timeouts.poll_interval).await?;
	let password_field =
		wait_for_element(browser, &password_locator, Readiness::Present, timeouts.login_form, timeouts.poll_interval).await?;
	let (Some(username_field), Some(password_field)) = (username_field, password_field)
	else {
		return Err(BotError::Auth(format!(
			"login form did not appear within {}s",
			timeouts.login_form.as_secs()
		)));
	};

	browser.clear(&username_field).await?;
	browser.send_keys(&username_field, credentials.username.trim()).await?;
	browser.clear(&password_field).await?;
	browser.send_keys(&password_field, &credentials.password).await?;
	browser.send_keys(&password_field, keys::ENTER).await?;

	let landed = wait_for_url(browser, timeouts.login_redirect, timeouts.poll_interval, |url| {
		!url.contains(LOGIN_PATH)
	})
	.await?;
	let Some(url) = landed else {
		return Err(BotError::Auth(format!(
			"still on the login page after {}s",
			timeouts.login_redirect.as_secs()
		)));
	};

	sleep(timeouts.login_settle).await;
	info!(target = "igdm", user = %credentials.username.trim(), url = %url, "logged in");

	Ok(AuthenticatedSession {
		browser,
		username: credentials.username.trim().to_string(),
	})
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use tokio::time::Instant;

	use super::*;
	use crate::testing::{Action, FakeBrowser};

	const HOME: &str = "https://www.instagram.com/";

	fn login_page() -> FakeBrowser {
		let browser = FakeBrowser::new();
		browser.add_element(&locators::username_field());
		browser.add_element(&locators::password_field());
		browser
	}

	#[tokio::test(start_paused = true)]
	async fn logs_in_and_settles() {
		let browser = login_page();
		browser.redirect_on_enter(&locators::password_field(), HOME);
		let started = Instant::now();

		let session = establish(
			&browser,
			&Credentials::new(" me ", "secret"),
			&Endpoints::default(),
			&Timeouts::default(),
		)
		.await
		.unwrap();

		assert_eq!(session.username(), "me");
		assert_eq!(browser.url(), HOME);
		assert!(started.elapsed() >= Duration::from_secs(2));
		assert_eq!(
			browser.actions(),
			vec![
				Action::Goto("https://www.instagram.com/accounts/login/".into()),
				Action::Clear(locators::username_field()),
				Action::SendKeys(locators::username_field(), "me".into()),
				Action::Clear(locators::password_field()),
				Action::SendKeys(locators::password_field(), "secret".into()),
				Action::SendKeys(locators::password_field(), keys::ENTER.into()),
			]
		);
	}

	#[tokio::test(start_paused = true)]
	async fn missing_credentials_fail_before_navigation() {
		let browser = login_page();
		let err = establish(
			&browser,
			&Credentials::new("me", ""),
			&Endpoints::default(),
			&Timeouts::default(),
		)
		.await
		.err()
		.unwrap();

		assert!(matches!(err, BotError::Auth(_)));
		assert!(browser.actions().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn missing_form_is_auth_error() {
		let browser = FakeBrowser::new();
		browser.add_element(&locators::username_field());

		let err = establish(
			&browser,
			&Credentials::new("me", "secret"),
			&Endpoints::default(),
			&Timeouts::default(),
		)
		.await
		.err()
		.unwrap();

		assert!(matches!(err, BotError::Auth(ref m) if m.contains("form")));
	}

	#[tokio::test(start_paused = true)]
	async fn staying_on_login_page_is_auth_error() {
		let browser = login_page();
		let started = Instant::now();

		let err = establish(
			&browser,
			&Credentials::new("me", "wrong"),
			&Endpoints::default(),
			&Timeouts::default(),
		)
		.await
		.err()
		.unwrap();

		assert!(matches!(err, BotError::Auth(ref m) if m.contains("login page")));
		assert!(started.elapsed() >= Duration::from_secs(25));
	}
}
