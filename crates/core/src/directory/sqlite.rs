use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, warn};

use super::{DirectoryStore, StoreResult, ThreadRecord};
use crate::error::StoreError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS threads (
	id            INTEGER PRIMARY KEY AUTOINCREMENT,
	username      TEXT NOT NULL UNIQUE,
	thread_id     TEXT NOT NULL UNIQUE,
	messages_sent INTEGER NOT NULL DEFAULT 0,
	created_at    TEXT NOT NULL,
	updated_at    TEXT NOT NULL
);
";

const MEMORY_URL: &str = "sqlite::memory:";

/// SQLite-backed [`DirectoryStore`].
///
/// The first write after a commit opens a transaction; [`commit`] closes it.
/// Dropping the store with a transaction open rolls it back. A failed
/// upsert is undone on its own, so a conflict never leaves the database
/// locked for other connections.
///
/// [`commit`]: DirectoryStore::commit
pub struct SqliteDirectory {
	conn: Mutex<Connection>,
}

impl SqliteDirectory {
	/// Opens (or creates) a database file.
	pub fn open(path: &Path) -> StoreResult<Self> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			std::fs::create_dir_all(parent)?;
		}
		debug!(target = "igdm", path = %path.display(), "opening directory store");
		Self::init(Connection::open(path)?)
	}

	/// Opens a store from a connection string: `sqlite://<path>`,
	/// `sqlite:<path>`, `sqlite::memory:`, or a bare path.
	pub fn open_url(url: &str) -> StoreResult<Self> {
		let url = url.trim();
		if url == MEMORY_URL {
			return Self::in_memory();
		}

		let path = url
			.strip_prefix("sqlite://")
			.or_else(|| url.strip_prefix("sqlite:"))
			.unwrap_or(url);
		if path.is_empty() {
			return Err(StoreError::InvalidUrl(url.to_string()));
		}
		if path.contains("://") {
			return Err(StoreError::InvalidUrl(format!("{url} (only sqlite is supported)")));
		}
		Self::open(Path::new(path))
	}

	pub fn in_memory() -> StoreResult<Self> {
		Self::init(Connection::open_in_memory()?)
	}

	fn init(conn: Connection) -> StoreResult<Self> {
		conn.execute_batch(SCHEMA)?;
		Ok(Self { conn: Mutex::new(conn) })
	}

	fn lock(&self) -> MutexGuard<'_, Connection> {
		self.conn.lock().unwrap_or_else(|e| e.into_inner())
	}
}

fn parse_time(raw: &str) -> StoreResult<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(raw)
		.map(|t| t.with_timezone(&Utc))
		.map_err(|e| StoreError::Corrupt(format!("timestamp {raw:?}: {e}")))
}

struct RawRecord {
	username: String,
	thread_id: String,
	messages_sent: i64,
	created_at: String,
	updated_at: String,
}

impl RawRecord {
	fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
		Ok(Self {
			username: row.get(0)?,
			thread_id: row.get(1)?,
			messages_sent: row.get(2)?,
			created_at: row.get(3)?,
			updated_at: row.get(4)?,
		})
	}

	fn into_record(self) -> StoreResult<ThreadRecord> {
		let messages_sent = u64::try_from(self.messages_sent)
			.map_err(|_| StoreError::Corrupt(format!("negative counter for @{}", self.username)))?;
		Ok(ThreadRecord {
			created_at: parse_time(&self.created_at)?,
			updated_at: parse_time(&self.updated_at)?,
			username: self.username,
			thread_id: self.thread_id,
			messages_sent,
		})
	}
}

impl DirectoryStore for SqliteDirectory {
	fn find_by_username(&self, username: &str) -> StoreResult<Option<ThreadRecord>> {
		let conn = self.lock();
		let raw = conn
			.query_row(
				"SELECT username, thread_id, messages_sent, created_at, updated_at \
				 FROM threads WHERE username = ?1",
				params![username],
				RawRecord::from_row,
			)
			.optional()?;
		raw.map(RawRecord::into_record).transpose()
	}

	fn upsert(&self, record: &ThreadRecord) -> StoreResult<()> {
		let conn = self.lock();
		let began = conn.is_autocommit();
		if began {
			conn.execute_batch("BEGIN IMMEDIATE")?;
		}
		conn.execute_batch("SAVEPOINT upsert")?;

		match write_record(&conn, record) {
			Ok(()) => {
				conn.execute_batch("RELEASE upsert")?;
				Ok(())
			}
			Err(err) => {
				// Only undo this call; earlier staged writes stay pending.
				let undo = if began {
					"ROLLBACK"
				} else {
					"ROLLBACK TO upsert; RELEASE upsert"
				};
				if let Err(undo_err) = conn.execute_batch(undo) {
					warn!(target = "igdm", error = %undo_err, "failed to roll back upsert");
				}
				Err(err)
			}
		}
	}

	fn commit(&self) -> StoreResult<()> {
		let conn = self.lock();
		if conn.is_autocommit() {
			return Ok(());
		}
		if let Err(err) = conn.execute_batch("COMMIT") {
			if !conn.is_autocommit() {
				if let Err(undo_err) = conn.execute_batch("ROLLBACK") {
					warn!(target = "igdm", error = %undo_err, "failed to roll back after commit error");
				}
			}
			return Err(err.into());
		}
		Ok(())
	}
}

fn write_record(conn: &Connection, record: &ThreadRecord) -> StoreResult<()> {
	let owner: Option<String> = conn
		.query_row(
			"SELECT username FROM threads WHERE thread_id = ?1",
			params![record.thread_id],
			|row| row.get(0),
		)
		.optional()?;
	if let Some(owner) = owner.filter(|o| *o != record.username) {
		return Err(StoreError::Conflict {
			thread_id: record.thread_id.clone(),
			owner,
			username: record.username.clone(),
		});
	}

	let messages_sent = i64::try_from(record.messages_sent)
		.map_err(|_| StoreError::Corrupt(format!("counter overflow for @{}", record.username)))?;
	let now = Utc::now().to_rfc3339();
	conn.execute(
		"INSERT INTO threads (username, thread_id, messages_sent, created_at, updated_at) \
		 VALUES (?1, ?2, ?3, ?4, ?4) \
		 ON CONFLICT(username) DO UPDATE SET \
		   messages_sent = MAX(messages_sent, excluded.messages_sent), \
		   updated_at = excluded.updated_at",
		params![record.username, record.thread_id, messages_sent, now],
	)?;
	Ok(())
}
