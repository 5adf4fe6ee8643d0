use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::model::Task;
use crate::store::{Snapshot, TaskStore};

/// In-process backend. Holds the serialized document so loads go through
/// the same decoding as the file backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw document bytes, valid or not.
    pub fn with_document(raw: impl Into<Vec<u8>>) -> Self {
        Self {
            document: Mutex::new(Some(raw.into())),
        }
    }

    pub fn with_tasks(tasks: &[Task]) -> Result<Self> {
        Ok(Self::with_document(serde_json::to_vec_pretty(tasks)?))
    }

    /// Current raw document, if one has been written.
    pub fn document(&self) -> Option<Vec<u8>> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Result<Snapshot> {
        let doc = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(match doc.as_deref() {
            Some(raw) => Snapshot::decode(raw),
            None => Snapshot::Empty,
        })
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let raw = serde_json::to_vec_pretty(tasks)?;
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
