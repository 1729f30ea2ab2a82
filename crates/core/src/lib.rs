//! igdm: direct-message dispatch over a WebDriver-controlled browser.
//!
//! The crate logs a browser into Instagram, resolves each recipient to a
//! durable conversation id (remembering new ones in a [`DirectoryStore`]), and
//! types texts and uploads files into each conversation in turn.
//!
//! # Example
//!
//! ```ignore
//! use igdm::{BotConfig, DispatchRequest, SqliteDirectory};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::default();
//!     let directory = SqliteDirectory::open_url("sqlite://threads.db")?;
//!     let request = DispatchRequest::new(
//!         vec!["@someone".into()],
//!         vec!["Hello!".into()],
//!     );
//!
//!     let report = igdm::send(&config, &directory, &request).await?;
//!     println!("sent {} texts", report.texts_sent());
//!     Ok(())
//! }
//! ```
//!
//! # Components
//!
//! - [`session`]: logs in and yields an [`AuthenticatedSession`]
//! - [`resolver`]: recipient token to thread id, three tiers
//! - [`popup`]: best-effort dismissal of the notifications dialog
//! - [`dispatcher`]: the per-recipient send flow
//! - [`directory`]: persisted `username <-> thread_id` mappings
//!
//! All browser access goes through the [`Browser`] trait.

mod bot;
#[cfg(test)]
mod testing;

pub mod browser;
pub mod config;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod locators;
pub mod popup;
pub mod resolver;
pub mod session;
pub mod wait;

pub use bot::{ResolvedThread, resolve_all, resolve_with, send, send_with, with_browser};
pub use browser::{Browser, WebDriverBrowser};
pub use config::{BotConfig, BrowserConfig, Credentials, Endpoints, Timeouts, UiLabels};
pub use directory::{DirectoryStore, MemoryDirectory, SqliteDirectory, ThreadRecord};
pub use dispatcher::{DispatchPhase, DispatchReport, DispatchRequest, Dispatcher, RecipientReport};
pub use error::{BotError, Result, StoreError};
pub use resolver::{Recipient, ThreadResolver};
pub use session::{AuthenticatedSession, establish};
