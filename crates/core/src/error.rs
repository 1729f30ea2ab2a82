use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

/// Failure of a bot operation.
///
/// The first five variants are bot-originated conditions (bad input, login
/// trouble, a remote UI that did not behave as expected). `Store` and `Driver`
/// are internal failures. [`BotError::is_bot_error`] draws that line for the
/// caller boundary.
#[derive(Debug, Error)]
pub enum BotError {
	/// Malformed or empty caller input.
	#[error("invalid input: {0}")]
	Validation(String),

	/// Missing credentials or login timeout.
	#[error("login failed: {0}")]
	Auth(String),

	/// A recipient's conversation could not be established.
	#[error("could not resolve thread for {recipient}: {reason} (current URL: {current_url})")]
	Resolution {
		recipient: String,
		reason: String,
		current_url: String,
	},

	/// An expected interactive element never appeared.
	#[error("{0}")]
	Ui(String),

	/// A conversation identifier could not be extracted from a location.
	#[error("unrecognized thread URL: {0}")]
	Parse(String),

	#[error(transparent)]
	Store(#[from] StoreError),

	#[error("webdriver: {0}")]
	Driver(#[from] igdm_runtime::Error),
}

impl BotError {
	/// True for conditions the bot itself detected, false for internal failures.
	pub fn is_bot_error(&self) -> bool {
		!matches!(self, Self::Store(_) | Self::Driver(_))
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Self::Validation(_) => "validation",
			Self::Auth(_) => "auth",
			Self::Resolution { .. } => "resolution",
			Self::Ui(_) => "ui",
			Self::Parse(_) => "parse",
			Self::Store(_) => "store",
			Self::Driver(_) => "driver",
		}
	}
}

/// Directory store failure.
#[derive(Debug, Error)]
pub enum StoreError {
	#[error("database error: {0}")]
	Sqlite(#[from] rusqlite::Error),

	/// A thread id is already mapped to another username.
	#[error("thread {thread_id} already belongs to @{owner}, cannot map it to @{username}")]
	Conflict {
		thread_id: String,
		owner: String,
		username: String,
	},

	#[error("invalid database URL: {0}")]
	InvalidUrl(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("corrupt record: {0}")]
	Corrupt(String),
}
