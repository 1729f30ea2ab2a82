//! Thread Resolver: recipient token to conversation id.
//!
//! Resolution is tiered. Numeric tokens are already thread ids. Known handles
//! come from the [`DirectoryStore`]. Unknown handles go through the
//! platform's "start conversation" intent URL, which redirects to the thread,
//! and the resulting mapping is persisted.

use std::fmt;

use tracing::{debug, info};
use url::Url;

use crate::config::{Endpoints, Timeouts};
use crate::directory::{DirectoryStore, ThreadRecord};
use crate::error::{BotError, Result};
use crate::session::AuthenticatedSession;
use crate::wait::wait_for_url;

/// Path marker of a conversation URL.
const THREAD_PATH_MARKER: &str = "/direct/t/";

/// A parsed recipient token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
	/// All ASCII digits: used as a thread id verbatim.
	ThreadId(String),
	/// A normalized handle.
	Handle(String),
}

impl Recipient {
	pub fn parse(token: &str) -> Result<Self> {
		let token = token.trim();
		if token.is_empty() {
			return Err(BotError::Validation("recipient is blank".to_string()));
		}
		if is_thread_id(token) {
			return Ok(Self::ThreadId(token.to_string()));
		}

		let handle = normalize_username(token);
		if handle.is_empty() {
			return Err(BotError::Validation(format!("recipient {token:?} has no username")));
		}
		Ok(Self::Handle(handle))
	}

	pub fn is_handle(&self) -> bool {
		matches!(self, Self::Handle(_))
	}
}

impl fmt::Display for Recipient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ThreadId(id) => write!(f, "thread {id}"),
			Self::Handle(handle) => write!(f, "@{handle}"),
		}
	}
}

/// Trim, drop leading `@`s, lowercase.
pub fn normalize_username(raw: &str) -> String {
	raw.trim().trim_start_matches('@').to_lowercase()
}

pub fn is_thread_id(token: &str) -> bool {
	!token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Extracts the thread id from a conversation URL or bare path.
///
/// The path must start with the segments `direct`, `t`, followed by the id.
/// Query strings and fragments are ignored.
pub fn thread_id_from_url(location: &str) -> Result<String> {
	let path = match Url::parse(location) {
		Ok(url) => url.path().to_string(),
		Err(url::ParseError::RelativeUrlWithoutBase) => location
			.split(['?', '#'])
			.next()
			.unwrap_or_default()
			.to_string(),
		Err(_) => return Err(BotError::Parse(location.to_string())),
	};
	thread_id_from_path(&path).ok_or_else(|| BotError::Parse(location.to_string()))
}

fn thread_id_from_path(path: &str) -> Option<String> {
	let mut segments = path.split('/').filter(|s| !s.is_empty());
	match (segments.next(), segments.next(), segments.next()) {
		(Some("direct"), Some("t"), Some(id)) => Some(id.to_string()),
		_ => None,
	}
}

/// Resolves recipient tokens for one authenticated session.
pub struct ThreadResolver<'a> {
	session: &'a AuthenticatedSession<'a>,
	directory: &'a dyn DirectoryStore,
	endpoints: &'a Endpoints,
	timeouts: &'a Timeouts,
}

impl<'a> ThreadResolver<'a> {
	pub fn new(
		session: &'a AuthenticatedSession<'a>,
		directory: &'a dyn DirectoryStore,
		endpoints: &'a Endpoints,
		timeouts: &'a Timeouts,
	) -> Self {
		Self {
			session,
			directory,
			endpoints,
			timeouts,
		}
	}

	/// Returns the thread id for `token`.
	pub async fn resolve(&self, token: &str) -> Result<String> {
		self.resolve_recipient(&Recipient::parse(token)?).await
	}

	pub async fn resolve_recipient(&self, recipient: &Recipient) -> Result<String> {
		match recipient {
			Recipient::ThreadId(id) => {
				debug!(target = "igdm", thread_id = %id, "recipient is a thread id");
				Ok(id.clone())
			}
			Recipient::Handle(handle) => self.resolve_handle(handle).await,
		}
	}

	async fn resolve_handle(&self, handle: &str) -> Result<String> {
		if let Some(record) = self.directory.find_by_username(handle)? {
			debug!(target = "igdm", recipient = %handle, thread_id = %record.thread_id, "thread found in directory");
			return Ok(record.thread_id);
		}

		let browser = self.session.browser();
		let intent_url = self.endpoints.intent_url(handle);
		info!(target = "igdm", recipient = %handle, url = %intent_url, "opening new conversation");
		browser.goto(&intent_url).await?;

		let landed = wait_for_url(browser, self.timeouts.resolve_redirect, self.timeouts.poll_interval, |url| {
			url.contains(THREAD_PATH_MARKER)
		})
		.await?;
		let Some(url) = landed else {
			let current_url = browser
				.current_url()
				.await
				.unwrap_or_else(|e| format!("<unavailable: {e}>"));
			return Err(BotError::Resolution {
				recipient: handle.to_string(),
				reason: format!(
					"no redirect to a conversation within {}s",
					self.timeouts.resolve_redirect.as_secs()
				),
				current_url,
			});
		};

		let thread_id = thread_id_from_url(&url)?;
		self.directory.upsert(&ThreadRecord::new(handle, &thread_id))?;
		self.directory.commit()?;
		info!(target = "igdm", recipient = %handle, thread_id = %thread_id, "thread resolved");
		Ok(thread_id)
	}
}
