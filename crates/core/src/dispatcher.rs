//! Message Dispatcher.
//!
//! Recipients are handled one at a time, in order:
//!
//! ```text
//! RESOLVING -> NAVIGATING -> AWAITING_INPUT -> SENDING_TEXT* -> SENDING_ATTACHMENT* -> RECORDING
//! ```
//!
//! A failure while resolving, or a message box that never appears, aborts the
//! whole call. Recipients already handled keep their persisted counters.
//! Attachment failures are logged and counted but never abort anything.


use std::fmt;
use std::path::{Path, PathBuf};

use igdm_protocol::{ElementRef, keys};
use serde::{Deserialize, Deserializer, Serialize};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::browser::Browser;
use crate::config::BotConfig;
use crate::directory::DirectoryStore;
use crate::error::{BotError, Result};
use crate::locators::{self, Matcher};
use crate::popup::dismiss_popups;
use crate::resolver::{Recipient, ThreadResolver};
use crate::session::AuthenticatedSession;
use crate::wait::{Readiness, wait_for_element};

/// What to send, and to whom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
	/// Handles (`@name` or `name`) or numeric thread ids.
	pub recipients: Vec<String>,
	pub messages: Vec<String>,
	/// Local files sent after the texts. Missing files are skipped; `null`
	/// reads as none.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub attachments: Vec<PathBuf>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<PathBuf>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<Vec<PathBuf>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Fails unless at least one recipient is non-blank.
pub(crate) fn require_recipients(recipients: &[String]) -> Result<()> {
	if recipients.iter().all(|r| r.trim().is_empty()) {
		return Err(BotError::Validation("no recipients given".to_string()));
	}
	Ok(())
}

impl DispatchRequest {
	pub fn new(recipients: Vec<String>, messages: Vec<String>) -> Self {
		Self {
			recipients,
			messages,
			attachments: Vec::new(),
		}
	}

	pub fn with_attachments(mut self, attachments: Vec<PathBuf>) -> Self {
		self.attachments = attachments;
		self
	}

	pub fn validate(&self) -> Result<()> {
		require_recipients(&self.recipients)?;
		if self.messages.is_empty() {
			return Err(BotError::Validation("no messages given".to_string()));
		}
		Ok(())
	}
}

/// Outcome of a completed dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
	pub recipients: Vec<RecipientReport>,
}

impl DispatchReport {
	pub fn texts_sent(&self) -> usize {
		self.recipients.iter().map(|r| r.texts_sent).sum()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientReport {
	/// The trimmed token as given.
	pub recipient: String,
	pub thread_id: String,
	pub texts_sent: usize,
	pub attachments_sent: usize,
	pub attachments_skipped: usize,
	pub attachments_failed: usize,
}

/// Step of the per-recipient flow, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
	Resolving,
	Navigating,
	AwaitingInput,
	SendingText,
	SendingAttachment,
	Recording,
}

impl DispatchPhase {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Resolving => "resolving",
			Self::Navigating => "navigating",
			Self::AwaitingInput => "awaiting_input",
			Self::SendingText => "sending_text",
			Self::SendingAttachment => "sending_attachment",
			Self::Recording => "recording",
		}
	}
}

impl fmt::Display for DispatchPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

enum AttachmentOutcome {
	Sent,
	Skipped,
}

/// Sends requests through an authenticated session.
pub struct Dispatcher<'a> {
	session: &'a AuthenticatedSession<'a>,
	resolver: ThreadResolver<'a>,
	directory: &'a dyn DirectoryStore,
	config: &'a BotConfig,
	popups: Vec<Matcher>,
}

impl<'a> Dispatcher<'a> {
	pub fn new(session: &'a AuthenticatedSession<'a>, directory: &'a dyn DirectoryStore, config: &'a BotConfig) -> Self {
		Self {
			session,
			resolver: ThreadResolver::new(session, directory, &config.endpoints, &config.timeouts),
			directory,
			config,
			popups: locators::popup_matchers(&config.ui.dismiss_label),
		}
	}

	fn browser(&self) -> &'a dyn Browser {
		self.session.browser()
	}

	/// Delivers `request` to every non-blank recipient, in order.
	///
	/// Returns on the first fatal error; recipients before it stay delivered.
	pub async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReport> {
		request.validate()?;

		let mut report = DispatchReport::default();
		for token in &request.recipients {
			let token = token.trim();
			if token.is_empty() {
				continue;
			}

			let mut phase = DispatchPhase::Resolving;
			match self.deliver(token, request, &mut phase).await {
				Ok(recipient) => report.recipients.push(recipient),
				Err(e) => {
					error!(target = "igdm", recipient = %token, phase = %phase, error = %e, "dispatch aborted");
					return Err(e);
				}
			}
		}

		info!(
			target = "igdm",
			recipients = report.recipients.len(),
			texts = report.texts_sent(),
			"dispatch complete"
		);
		Ok(report)
	}

	async fn deliver(&self, token: &str, request: &DispatchRequest, phase: &mut DispatchPhase) -> Result<RecipientReport> {
		let timeouts = &self.config.timeouts;
		let browser = self.browser();

		enter(phase, DispatchPhase::Resolving, token);
		let recipient = Recipient::parse(token)?;
		let thread_id = self.resolver.resolve_recipient(&recipient).await?;
		let mut report = RecipientReport {
			recipient: token.to_string(),
			thread_id: thread_id.clone(),
			..RecipientReport::default()
		};

		enter(phase, DispatchPhase::Navigating, token);
		let chat_url = self.config.endpoints.thread_url(&thread_id);
		debug!(target = "igdm", recipient = %token, url = %chat_url, "opening conversation");
		browser.goto(&chat_url).await?;
		dismiss_popups(browser, &self.popups, timeouts.popup, timeouts.popup_settle, timeouts.poll_interval).await;
		sleep(timeouts.chat_settle).await;

		enter(phase, DispatchPhase::AwaitingInput, token);
		let mut input = self.message_box(&thread_id).await?;

		enter(phase, DispatchPhase::SendingText, token);
		for text in &request.messages {
			let text = text.trim();
			if text.is_empty() {
				continue;
			}
			input = self.send_text(input, text, &thread_id).await?;
			report.texts_sent += 1;
		}

		if !request.attachments.is_empty() {
			enter(phase, DispatchPhase::SendingAttachment, token);
		}
		for path in &request.attachments {
			match self.send_attachment(path).await {
				Ok(AttachmentOutcome::Sent) => report.attachments_sent += 1,
				Ok(AttachmentOutcome::Skipped) => {
					debug!(target = "igdm", path = %path.display(), "attachment skipped");
					report.attachments_skipped += 1;
				}
				Err(e) => {
					warn!(target = "igdm", recipient = %token, path = %path.display(), error = %e, "attachment not sent");
					report.attachments_failed += 1;
				}
			}
		}

		enter(phase, DispatchPhase::Recording, token);
		if let Recipient::Handle(handle) = &recipient {
			self.record_sent(handle, report.texts_sent);
		}

		info!(
			target = "igdm",
			recipient = %token,
			thread_id = %thread_id,
			texts = report.texts_sent,
			attachments = report.attachments_sent,
			"recipient done"
		);
		Ok(report)
	}

	async fn message_box(&self, thread_id: &str) -> Result<ElementRef> {
		let timeouts = &self.config.timeouts;
		wait_for_element(
			self.browser(),
			&locators::message_box(),
			Readiness::Present,
			timeouts.input,
			timeouts.poll_interval,
		)
		.await?
		.ok_or_else(|| BotError::Ui(format!("message box did not appear for thread {thread_id}")))
	}

	/// Types one text and submits it. Returns the input element to use next,
	/// which changes when the box had to be located again.
	async fn send_text(&self, input: ElementRef, text: &str, thread_id: &str) -> Result<ElementRef> {
		let timeouts = &self.config.timeouts;
		let browser = self.browser();

		let input = match browser.click(&input).await {
			Ok(()) => input,
			Err(e) if e.is_click_intercepted() => {
				warn!(target = "igdm", thread_id = %thread_id, "click intercepted, dismissing popup and retrying");
				dismiss_popups(browser, &self.popups, timeouts.popup_retry, timeouts.popup_settle, timeouts.poll_interval)
					.await;
				let input = self.message_box(thread_id).await?;
				browser.force_click(&input).await?;
				input
			}
			Err(e) => return Err(e.into()),
		};

		browser.send_keys(&input, text).await?;
		browser.send_keys(&input, keys::ENTER).await?;
		sleep(timeouts.message_pause).await;
		Ok(input)
	}

	async fn send_attachment(&self, path: &Path) -> Result<AttachmentOutcome> {
		let raw = path.to_string_lossy();
		let raw = raw.trim();
		if raw.is_empty() || !Path::new(raw).exists() {
			return Ok(AttachmentOutcome::Skipped);
		}
		// The remote end resolves the path on its own filesystem.
		let Ok(absolute) = std::path::absolute(raw) else {
			return Ok(AttachmentOutcome::Skipped);
		};

		let timeouts = &self.config.timeouts;
		let browser = self.browser();

		let file_input = wait_for_element(
			browser,
			&locators::file_input(),
			Readiness::Present,
			timeouts.input,
			timeouts.poll_interval,
		)
		.await?
		.ok_or_else(|| BotError::Ui("file input did not appear".to_string()))?;
		browser.send_keys(&file_input, &absolute.to_string_lossy()).await?;
		sleep(timeouts.attachment_preview).await;

		let confirm = wait_for_element(
			browser,
			&locators::send_attachment_button(&self.config.ui.send_attachment_label),
			Readiness::Clickable,
			timeouts.input,
			timeouts.poll_interval,
		)
		.await?
		.ok_or_else(|| BotError::Ui("attachment send button did not appear".to_string()))?;
		browser.force_click(&confirm).await?;
		sleep(timeouts.attachment_settle).await;

		debug!(target = "igdm", path = %absolute.display(), "attachment sent");
		Ok(AttachmentOutcome::Sent)
	}

	/// Adds `count` to the handle's counter. Failures are logged only.
	fn record_sent(&self, handle: &str, count: usize) {
		if count == 0 {
			return;
		}

		let result = self.directory.find_by_username(handle).and_then(|record| {
			let Some(mut record) = record else {
				return Ok(false);
			};
			record.record_sent(count as u64);
			self.directory.upsert(&record)?;
			self.directory.commit()?;
			Ok(true)
		});

		match result {
			Ok(true) => debug!(target = "igdm", recipient = %handle, added = count, "counter updated"),
			Ok(false) => warn!(target = "igdm", recipient = %handle, "no directory record to update"),
			Err(e) => warn!(target = "igdm", recipient = %handle, error = %e, "counter update failed"),
		}
	}
}

fn enter(phase: &mut DispatchPhase, next: DispatchPhase, recipient: &str) {
	*phase = next;
	debug!(target = "igdm", recipient = %recipient, phase = %next, "phase");
}
