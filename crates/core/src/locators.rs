//! Locator catalogue for the remote UI.
//!
//! The platform's markup is outside our control; every locator the bot uses
//! lives here so a markup change touches one file.

use igdm_protocol::Locator;

use crate::wait::Readiness;

/// Absolute path of the dialog's secondary button, used when the labelled
/// matchers miss.
const POPUP_STRUCTURAL_XPATH: &str = "/html/body/div[4]/div[1]/div/div[2]/div/div/div/div/div[2]/div/div/div[3]/button[2]";

/// One strategy in an ordered fallback list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
	/// Short name used in logs.
	pub label: &'static str,
	pub locator: Locator,
	pub readiness: Readiness,
}

impl Matcher {
	pub fn clickable(label: &'static str, locator: Locator) -> Self {
		Self {
			label,
			locator,
			readiness: Readiness::Clickable,
		}
	}
}

pub fn username_field() -> Locator {
	Locator::input_named("username")
}

pub fn password_field() -> Locator {
	Locator::input_named("password")
}

/// Compose box of an open conversation.
pub fn message_box() -> Locator {
	Locator::xpath("//div[@role='textbox']")
}

pub fn file_input() -> Locator {
	Locator::xpath("//input[@type='file']")
}

/// Confirmation button under an attachment preview.
pub fn send_attachment_button(label: &str) -> Locator {
	Locator::xpath(format!("//div[@role='button' and text()={}]", xpath_literal(label)))
}

/// Strategies for dismissing the notifications dialog, most specific first.
pub fn popup_matchers(dismiss_label: &str) -> Vec<Matcher> {
	let label = xpath_literal(dismiss_label);
	vec![
		Matcher::clickable("button-text", Locator::xpath(format!("//button[normalize-space()={label}]"))),
		Matcher::clickable(
			"role-button-text",
			Locator::xpath(format!("//div[@role='button' and normalize-space()={label}]")),
		),
		Matcher::clickable("structural", Locator::xpath(POPUP_STRUCTURAL_XPATH)),
	]
}

/// Quotes `value` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so a value containing both quote kinds is
/// assembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
	if !value.contains('\'') {
		return format!("'{value}'");
	}
	if !value.contains('"') {
		return format!("\"{value}\"");
	}

	let parts: Vec<String> = value
		.split('\'')
		.map(|part| format!("'{part}'"))
		.collect();
	format!("concat({})", parts.join(", \"'\", "))
}
