use std::path::PathBuf;

use igdm::BotError;
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Bot(#[from] BotError),

	#[error("configuration error: {0}")]
	Config(String),

	#[error("cannot read {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	pub fn to_command_error(&self) -> CommandError {
		let (code, details) = match self {
			CliError::Bot(err) => {
				let code = if err.is_bot_error() {
					ErrorCode::BotError
				} else {
					ErrorCode::InternalError
				};
				(code, Some(serde_json::json!({ "kind": err.kind() })))
			}
			CliError::Config(_) => (ErrorCode::ConfigError, None),
			CliError::Read { path, .. } => (
				ErrorCode::InternalError,
				Some(serde_json::json!({ "path": path.display().to_string() })),
			),
			CliError::Io(_) | CliError::Json(_) => (ErrorCode::InternalError, None),
		};

		CommandError {
			code,
			message: self.to_string(),
			details,
		}
	}

	/// 1 for conditions the bot detected, 2 for everything else.
	pub fn exit_code(&self) -> i32 {
		match self {
			CliError::Bot(err) if err.is_bot_error() => 1,
			_ => 2,
		}
	}
}
