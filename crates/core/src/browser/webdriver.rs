use std::sync::Mutex;

use async_trait::async_trait;
use igdm_protocol::{ElementRef, Locator, NewSessionRequest};
use igdm_runtime::{ChromeDriver, Result, Session, WebDriverClient, find_chromedriver};
use tracing::{debug, info, warn};

use super::Browser;
use crate::config::BrowserConfig;

const FORCE_CLICK_SCRIPT: &str = "arguments[0].click();";

/// [`Browser`] backed by a W3C WebDriver session.
pub struct WebDriverBrowser {
	session: Session,
	driver: Mutex<Option<ChromeDriver>>,
}

impl WebDriverBrowser {
	/// Starts a Chrome session, launching chromedriver first when configured.
	pub async fn launch(config: &BrowserConfig) -> Result<Self> {
		let driver = if config.launch_driver {
			let executable = find_chromedriver(config.chromedriver_path.as_deref())?;
			Some(ChromeDriver::launch(&executable, config.driver_port).await?)
		} else {
			None
		};

		let endpoint = driver
			.as_ref()
			.map(|d| d.endpoint().to_string())
			.unwrap_or_else(|| config.webdriver_url.clone());

		let client = WebDriverClient::new(&endpoint)?;
		let request = NewSessionRequest::chrome(config.chrome_binary.clone(), config.chrome_args());
		// A launched driver is killed on drop if session creation fails.
		let session = client.new_session(&request).await?;

		if let Err(e) = session.maximize_window().await {
			debug!(target = "igdm", error = %e, "window maximize not supported");
		}

		info!(target = "igdm", endpoint = %endpoint, session_id = %session.id(), "browser session started");

		Ok(Self {
			session,
			driver: Mutex::new(driver),
		})
	}
}

#[async_trait]
impl Browser for WebDriverBrowser {
	async fn goto(&self, url: &str) -> Result<()> {
		self.session.navigate(url).await
	}

	async fn current_url(&self) -> Result<String> {
		self.session.current_url().await
	}

	async fn find(&self, locator: &Locator) -> Result<Option<ElementRef>> {
		match self.session.find_element(locator).await {
			Ok(element) => Ok(Some(element)),
			Err(e) if e.is_no_such_element() => Ok(None),
			Err(e) => Err(e),
		}
	}

	async fn is_clickable(&self, element: &ElementRef) -> Result<bool> {
		let ready = async {
			Ok::<_, igdm_runtime::Error>(
				self.session.is_displayed(element).await? && self.session.is_enabled(element).await?,
			)
		};
		match ready.await {
			Err(e) if e.is_stale_element() => Ok(false),
			other => other,
		}
	}

	async fn click(&self, element: &ElementRef) -> Result<()> {
		self.session.click(element).await
	}

	async fn force_click(&self, element: &ElementRef) -> Result<()> {
		self.session
			.execute(FORCE_CLICK_SCRIPT, vec![element.to_script_arg()])
			.await
			.map(|_| ())
	}

	async fn clear(&self, element: &ElementRef) -> Result<()> {
		self.session.clear(element).await
	}

	async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
		self.session.send_keys(element, text).await
	}

	async fn quit(&self) -> Result<()> {
		let session_result = self.session.delete().await;

		let driver = self.driver.lock().unwrap_or_else(|e| e.into_inner()).take();
		if let Some(driver) = driver {
			if let Err(e) = driver.shutdown().await {
				warn!(target = "igdm", error = %e, "chromedriver shutdown failed");
			}
		}

		session_result
	}
}
