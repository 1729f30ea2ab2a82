//! The browser seam.
//!
//! Everything above this module talks to the remote UI through [`Browser`].
//! [`WebDriverBrowser`] is the production implementation; tests script their
//! own.

mod webdriver;

use async_trait::async_trait;
use igdm_protocol::{ElementRef, Locator};
use igdm_runtime::Result;

pub use webdriver::WebDriverBrowser;

/// The subset of browser operations the bot relies on.
#[async_trait]
pub trait Browser: Send + Sync {
	/// Navigates the current tab and waits for the load to finish.
	async fn goto(&self, url: &str) -> Result<()>;

	async fn current_url(&self) -> Result<String>;

	/// Returns the first match, or `None` when nothing matches right now.
	async fn find(&self, locator: &Locator) -> Result<Option<ElementRef>>;

	/// Displayed and enabled. A stale reference counts as not clickable.
	async fn is_clickable(&self, element: &ElementRef) -> Result<bool>;

	/// Native click. Fails with `element click intercepted` when an overlay
	/// would receive it.
	async fn click(&self, element: &ElementRef) -> Result<()>;

	/// Programmatic click that bypasses hit-testing.
	async fn force_click(&self, element: &ElementRef) -> Result<()>;

	async fn clear(&self, element: &ElementRef) -> Result<()>;

	async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()>;

	/// Releases the browser. Safe to call more than once.
	async fn quit(&self) -> Result<()>;
}
