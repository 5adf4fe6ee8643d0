//! Persistence for the task document.
//!
//! A backend hands out the whole ordered task sequence and takes it back
//! whole; there is no partial update. [`tracker::Tracker`] layers the
//! read-modify-write cycle on top.

pub mod files;
pub mod lock;
pub mod memory;
pub mod tracker;

use crate::error::Result;
use crate::model::Task;

pub use files::JsonFileStore;
pub use lock::LockGuard;
pub use memory::MemoryStore;
pub use tracker::{CorruptPolicy, Tracker};

/// Result of reading the task document.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// No document exists yet.
    Empty,
    /// A document exists but could not be parsed as a task list.
    Corrupt(String),
    Loaded(Vec<Task>),
}

impl Snapshot {
    /// Decode raw document bytes. Blank documents count as empty.
    pub fn decode(raw: &[u8]) -> Self {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        match serde_json::from_slice::<Vec<Task>>(raw) {
            Ok(tasks) => Self::Loaded(tasks),
            Err(e) => Self::Corrupt(e.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Loaded(tasks) => tasks.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait TaskStore: Send + Sync {
    fn load(&self) -> Result<Snapshot>;

    /// Replace the stored sequence with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<()>;

    /// Exclusive access for one read-modify-write cycle, if the backend
    /// can be shared outside this process.
    fn acquire(&self) -> Result<Option<LockGuard>> {
        Ok(None)
    }

    /// Short label for logs.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_blank_document_is_empty() {
        assert_eq!(Snapshot::decode(b""), Snapshot::Empty);
        assert_eq!(Snapshot::decode(b"  \n"), Snapshot::Empty);
    }

    #[test]
    fn decode_garbage_is_corrupt() {
        assert!(matches!(Snapshot::decode(b"{not json"), Snapshot::Corrupt(_)));
        assert!(matches!(
            Snapshot::decode(br#"{"tasks": []}"#),
            Snapshot::Corrupt(_)
        ));
    }

    #[test]
    fn decode_task_array() {
        let snapshot = Snapshot::decode(br#"[{"id": 1, "title": "a"}, {"id": 2, "title": "b"}]"#);
        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_empty());
    }
}
