//! Scripted browser for unit tests.
//!
//! [`FakeBrowser`] keeps a tiny model of a page: a current URL, a set of
//! elements keyed by locator, and navigation redirects. Every side effect is
//! recorded as an [`Action`] so tests can assert on the exact interaction
//! sequence.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use igdm_protocol::{ElementRef, ErrorCode, Locator, keys};
use igdm_runtime::{Error, Result};

use crate::browser::Browser;

/// Side effect recorded by [`FakeBrowser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
	Goto(String),
	Click(Locator),
	ForceClick(Locator),
	Clear(Locator),
	SendKeys(Locator, String),
	Quit,
}

#[derive(Debug)]
struct Element {
	id: String,
	clickable: bool,
	/// Removed from the page once clicked (popups).
	vanishes: bool,
}

#[derive(Debug, Default)]
struct State {
	url: String,
	redirects: HashMap<String, String>,
	enter_redirects: HashMap<Locator, String>,
	elements: HashMap<Locator, Element>,
	intercepted: HashMap<Locator, usize>,
	shown_on_intercept: Vec<Locator>,
	failing_keys: HashSet<Locator>,
	failing_quit: bool,
	next_id: usize,
	actions: Vec<Action>,
}

impl State {
	fn locator_of(&self, element: &ElementRef) -> Result<Locator> {
		self.elements
			.iter()
			.find(|(_, e)| e.id == element.id)
			.map(|(locator, _)| locator.clone())
			.ok_or_else(|| remote(ErrorCode::StaleElementReference, "element is not attached to the page document"))
	}
}

fn remote(code: ErrorCode, message: &str) -> Error {
	Error::WebDriver {
		code,
		message: message.to_string(),
	}
}

#[derive(Debug)]
pub struct FakeBrowser {
	state: Mutex<State>,
}

impl Default for FakeBrowser {
	fn default() -> Self {
		Self::new()
	}
}

impl FakeBrowser {
	/// Creates a browser at `about:blank` with no elements.
	pub fn new() -> Self {
		Self {
			state: Mutex::new(State {
				url: "about:blank".to_string(),
				..State::default()
			}),
		}
	}

	/// Adds a clickable element.
	pub fn add_element(&self, locator: &Locator) {
		let mut state = self.state.lock().unwrap();
		state.next_id += 1;
		let id = format!("el-{}", state.next_id);
		state.elements.insert(
			locator.clone(),
			Element {
				id,
				clickable: true,
				vanishes: false,
			},
		);
	}

	/// Adds a clickable element that disappears after its first click.
	pub fn add_popup(&self, locator: &Locator) {
		self.add_element(locator);
		if let Some(element) = self.state.lock().unwrap().elements.get_mut(locator) {
			element.vanishes = true;
		}
	}

	pub fn set_clickable(&self, locator: &Locator, clickable: bool) {
		if let Some(element) = self.state.lock().unwrap().elements.get_mut(locator) {
			element.clickable = clickable;
		}
	}

	/// Navigating to `from` lands on `to`.
	pub fn add_redirect(&self, from: &str, to: &str) {
		self.state
			.lock()
			.unwrap()
			.redirects
			.insert(from.to_string(), to.to_string());
	}

	/// Typing Enter into `locator` moves the page to `url`.
	pub fn redirect_on_enter(&self, locator: &Locator, url: &str) {
		self.state
			.lock()
			.unwrap()
			.enter_redirects
			.insert(locator.clone(), url.to_string());
	}

	/// The next `times` native clicks on `locator` fail as intercepted.
	pub fn intercept_clicks(&self, locator: &Locator, times: usize) {
		self.state.lock().unwrap().intercepted.insert(locator.clone(), times);
	}

	/// An intercepted click reveals `overlay` as a popup.
	pub fn show_on_intercept(&self, overlay: &Locator) {
		self.state.lock().unwrap().shown_on_intercept.push(overlay.clone());
	}

	/// Typing into `locator` fails with `invalid argument`.
	pub fn fail_send_keys(&self, locator: &Locator) {
		self.state.lock().unwrap().failing_keys.insert(locator.clone());
	}

	pub fn fail_quit(&self) {
		self.state.lock().unwrap().failing_quit = true;
	}

	pub fn url(&self) -> String {
		self.state.lock().unwrap().url.clone()
	}

	pub fn actions(&self) -> Vec<Action> {
		self.state.lock().unwrap().actions.clone()
	}

	pub fn navigations(&self) -> Vec<String> {
		self.actions()
			.into_iter()
			.filter_map(|a| match a {
				Action::Goto(url) => Some(url),
				_ => None,
			})
			.collect()
	}

	/// Text typed into `locator`, in order.
	pub fn typed_into(&self, locator: &Locator) -> Vec<String> {
		self.actions()
			.into_iter()
			.filter_map(|a| match a {
				Action::SendKeys(l, text) if &l == locator => Some(text),
				_ => None,
			})
			.collect()
	}

	pub fn quit_count(&self) -> usize {
		self.actions().iter().filter(|a| **a == Action::Quit).count()
	}
}

#[async_trait]
impl Browser for FakeBrowser {
	async fn goto(&self, url: &str) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		state.actions.push(Action::Goto(url.to_string()));
		state.url = state.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
		Ok(())
	}

	async fn current_url(&self) -> Result<String> {
		Ok(self.url())
	}

	async fn find(&self, locator: &Locator) -> Result<Option<ElementRef>> {
		let state = self.state.lock().unwrap();
		Ok(state.elements.get(locator).map(|e| ElementRef::new(e.id.clone())))
	}

	async fn is_clickable(&self, element: &ElementRef) -> Result<bool> {
		let state = self.state.lock().unwrap();
		Ok(state.elements.values().any(|e| e.id == element.id && e.clickable))
	}

	async fn click(&self, element: &ElementRef) -> Result<()> {
		let mut guard = self.state.lock().unwrap();
		let state = &mut *guard;
		let locator = state.locator_of(element)?;
		if let Some(remaining) = state.intercepted.get_mut(&locator) {
			if *remaining > 0 {
				*remaining -= 1;
				let overlays = std::mem::take(&mut state.shown_on_intercept);
				for overlay in overlays {
					state.next_id += 1;
					let id = format!("el-{}", state.next_id);
					state.elements.insert(
						overlay,
						Element {
							id,
							clickable: true,
							vanishes: true,
						},
					);
				}
				return Err(remote(
					ErrorCode::ElementClickIntercepted,
					"element click intercepted: other element would receive the click",
				));
			}
		}
		if state.elements.get(&locator).is_some_and(|e| e.vanishes) {
			state.elements.remove(&locator);
		}
		state.actions.push(Action::Click(locator));
		Ok(())
	}

	async fn force_click(&self, element: &ElementRef) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		let locator = state.locator_of(element)?;
		state.actions.push(Action::ForceClick(locator));
		Ok(())
	}

	async fn clear(&self, element: &ElementRef) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		let locator = state.locator_of(element)?;
		state.actions.push(Action::Clear(locator));
		Ok(())
	}

	async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		let locator = state.locator_of(element)?;
		if state.failing_keys.contains(&locator) {
			return Err(remote(ErrorCode::InvalidArgument, "File not found"));
		}
		if text.contains(keys::ENTER) {
			if let Some(url) = state.enter_redirects.get(&locator).cloned() {
				state.url = url;
			}
		}
		state.actions.push(Action::SendKeys(locator, text.to_string()));
		Ok(())
	}

	async fn quit(&self) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		state.actions.push(Action::Quit);
		if state.failing_quit {
			return Err(Error::SessionClosed);
		}
		Ok(())
	}
}
