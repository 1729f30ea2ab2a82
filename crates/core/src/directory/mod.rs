//! Directory Store: persisted `username -> thread_id` mappings.
//!
//! The mapping is a bijection that never changes once written. Only the
//! per-recipient send counter and `updated_at` move after creation. Stores
//! stamp `created_at` and `updated_at` from their own clock on every write.

mod memory;
mod sqlite;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::MemoryDirectory;
pub use sqlite::SqliteDirectory;

use crate::error::StoreError;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One resolved recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRecord {
	/// Normalized handle: lowercase, no leading `@`.
	pub username: String,
	pub thread_id: String,
	pub messages_sent: u64,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl ThreadRecord {
	/// A fresh mapping with a zero counter.
	pub fn new(username: impl Into<String>, thread_id: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			username: username.into(),
			thread_id: thread_id.into(),
			messages_sent: 0,
			created_at: now,
			updated_at: now,
		}
	}

	/// Adds `count` delivered texts to the counter.
	pub fn record_sent(&mut self, count: u64) {
		self.messages_sent = self.messages_sent.saturating_add(count);
		self.updated_at = Utc::now();
	}

	/// Applies `incoming` on top of an existing record for the same username.
	///
	/// `thread_id` and `created_at` are kept; the counter never goes down.
	fn merged(&self, incoming: &ThreadRecord, now: DateTime<Utc>) -> ThreadRecord {
		ThreadRecord {
			username: self.username.clone(),
			thread_id: self.thread_id.clone(),
			messages_sent: self.messages_sent.max(incoming.messages_sent),
			created_at: self.created_at,
			updated_at: now,
		}
	}

	/// `self` as a brand new row written at `now`.
	fn stamped(&self, now: DateTime<Utc>) -> ThreadRecord {
		ThreadRecord {
			created_at: now,
			updated_at: now,
			..self.clone()
		}
	}
}

/// Persistence for [`ThreadRecord`]s.
///
/// Writes become durable on [`commit`](DirectoryStore::commit). Reads see the
/// caller's own uncommitted writes.
pub trait DirectoryStore: Send + Sync {
	/// Looks up a record by normalized username.
	fn find_by_username(&self, username: &str) -> StoreResult<Option<ThreadRecord>>;

	/// Inserts `record`, or raises the counter of the existing record with
	/// the same username.
	///
	/// The timestamps on `record` are ignored: the store sets `created_at`
	/// on insert and `updated_at` on every write.
	///
	/// Fails with [`StoreError::Conflict`] when `record.thread_id` already
	/// belongs to a different username. A failed upsert leaves the store as
	/// it was before the call, including any earlier uncommitted writes.
	fn upsert(&self, record: &ThreadRecord) -> StoreResult<()>;

	fn commit(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_keeps_identity_and_raises_counter() {
		let existing = ThreadRecord::new("alice", "111");
		let mut incoming = ThreadRecord::new("alice", "999");
		incoming.record_sent(3);

		let now = Utc::now();
		let merged = existing.merged(&incoming, now);
		assert_eq!(merged.thread_id, "111");
		assert_eq!(merged.created_at, existing.created_at);
		assert_eq!(merged.updated_at, now);
		assert_eq!(merged.messages_sent, 3);

		let stale = ThreadRecord::new("alice", "111");
		assert_eq!(merged.merged(&stale, now).messages_sent, 3);
	}
}
