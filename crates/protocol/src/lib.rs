//! Wire types for the W3C WebDriver protocol.
//!
//! This crate only describes the JSON shapes exchanged with a WebDriver
//! endpoint (chromedriver in practice). It has no I/O; the HTTP client lives in
//! `igdm-runtime`.
//!
//! # Main Types
//!
//! - [`Locator`] - element location strategy plus selector value
//! - [`ElementRef`] - opaque web element reference returned by the remote end
//! - [`NewSessionRequest`] - capabilities payload for `POST /session`
//! - [`Envelope`] / [`ErrorValue`] - response body wrappers
//! - [`ErrorCode`] - typed remote error codes

pub mod capabilities;
pub mod element;
pub mod keys;
pub mod locator;
pub mod response;

pub use capabilities::{Capabilities, CapabilitiesRequest, ChromeOptions, NewSessionRequest, NewSessionResponse};
pub use element::{ELEMENT_KEY, ElementRef};
pub use locator::{Locator, LocatorStrategy};
pub use response::{Envelope, ErrorCode, ErrorValue};
