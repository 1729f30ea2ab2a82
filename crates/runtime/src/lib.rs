//! WebDriver runtime: HTTP client, session commands, and driver lifecycle.
//!
//! This crate provides the low-level plumbing for driving a browser through
//! the W3C WebDriver protocol:
//!
//! - **Driver management**: locating and launching chromedriver
//! - **Client**: HTTP request/response handling and error decoding
//! - **Session**: element lookup, input, navigation and script execution
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │    igdm     │  Browser trait, login, resolver, dispatcher
//! └──────┬──────┘
//!        │ Session commands
//! ┌──────▼───────┐
//! │ igdm-runtime │  This crate
//! │  ┌────────┐  │
//! │  │Session │  │  Per-session commands
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Client │  │  HTTP + envelope decoding
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Driver │  │  chromedriver process
//! │  └────────┘  │
//! └──────────────┘
//! ```

pub mod client;
pub mod driver;
pub mod error;
pub mod session;

pub use client::{DriverStatus, WebDriverClient};
pub use driver::{ChromeDriver, find_chromedriver};
pub use error::{Error, Result};
pub use session::Session;
