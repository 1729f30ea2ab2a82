use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use super::{DirectoryStore, StoreResult, ThreadRecord};
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Inner {
	committed: HashMap<String, ThreadRecord>,
	staged: HashMap<String, ThreadRecord>,
	lookups: usize,
	commits: usize,
}

impl Inner {
	fn visible(&self, username: &str) -> Option<&ThreadRecord> {
		self.staged.get(username).or_else(|| self.committed.get(username))
	}

	fn owner_of(&self, thread_id: &str) -> Option<&str> {
		self.staged
			.values()
			.chain(self.committed.values())
			.find(|r| r.thread_id == thread_id)
			.map(|r| r.username.as_str())
	}
}

/// In-process [`DirectoryStore`].
///
/// Writes are staged and applied on commit, like a transaction. Dropping the
/// store discards everything.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
	inner: Mutex<Inner>,
}

impl MemoryDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	/// A store pre-populated with committed records.
	pub fn with_records(records: impl IntoIterator<Item = ThreadRecord>) -> Self {
		let committed = records.into_iter().map(|r| (r.username.clone(), r)).collect();
		Self {
			inner: Mutex::new(Inner {
				committed,
				..Inner::default()
			}),
		}
	}

	/// Committed state of `username`.
	pub fn get(&self, username: &str) -> Option<ThreadRecord> {
		self.lock().committed.get(username).cloned()
	}

	pub fn len(&self) -> usize {
		self.lock().committed.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of `find_by_username` calls so far.
	pub fn lookups(&self) -> usize {
		self.lock().lookups
	}

	pub fn commits(&self) -> usize {
		self.lock().commits
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(|e| e.into_inner())
	}
}

impl DirectoryStore for MemoryDirectory {
	fn find_by_username(&self, username: &str) -> StoreResult<Option<ThreadRecord>> {
		let mut inner = self.lock();
		inner.lookups += 1;
		Ok(inner.visible(username).cloned())
	}

	fn upsert(&self, record: &ThreadRecord) -> StoreResult<()> {
		let mut inner = self.lock();

		if let Some(owner) = inner.owner_of(&record.thread_id) {
			if owner != record.username {
				return Err(StoreError::Conflict {
					thread_id: record.thread_id.clone(),
					owner: owner.to_string(),
					username: record.username.clone(),
				});
			}
		}

		let now = Utc::now();
		let next = match inner.visible(&record.username) {
			Some(existing) => existing.merged(record, now),
			None => record.stamped(now),
		};
		inner.staged.insert(next.username.clone(), next);
		Ok(())
	}

	fn commit(&self) -> StoreResult<()> {
		let mut inner = self.lock();
		let staged = std::mem::take(&mut inner.staged);
		inner.committed.extend(staged);
		inner.commits += 1;
		Ok(())
	}
}
