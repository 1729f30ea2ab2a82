//! Command-line front end for [`igdm`].
//!
//! Parses arguments, builds the configuration once, runs one subcommand and
//! prints a JSON (or text) result envelope on stdout. Logs go to stderr.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
