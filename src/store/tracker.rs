use std::sync::{Arc, Mutex, PoisonError};

use clap::ValueEnum;
use tracing::{debug, error, warn};

use crate::error::{Result, TrackerError};
use crate::model::Task;
use crate::store::{Snapshot, TaskStore};

/// What to do when the document exists but cannot be parsed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "snake_case")]
pub enum CorruptPolicy {
    /// Log and carry on as if the store were empty.
    #[default]
    Reset,
    /// Refuse to read or write until the document is repaired.
    Fail,
}

impl std::fmt::Display for CorruptPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reset => write!(f, "reset"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Value returned by a mutation closure, tagged with whether the task list
/// needs to be written back.
#[derive(Debug)]
pub enum Outcome<T> {
    Changed(T),
    Unchanged(T),
}

/// Serializes read-modify-write cycles over a [`TaskStore`].
pub struct Tracker {
    store: Arc<dyn TaskStore>,
    writer: Mutex<()>,
    on_corrupt: CorruptPolicy,
}

impl Tracker {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
            on_corrupt: CorruptPolicy::default(),
        }
    }

    pub fn with_policy(mut self, on_corrupt: CorruptPolicy) -> Self {
        self.on_corrupt = on_corrupt;
        self
    }

    pub fn policy(&self) -> CorruptPolicy {
        self.on_corrupt
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    fn resolve(&self, snapshot: Snapshot) -> Result<Vec<Task>> {
        match snapshot {
            Snapshot::Empty => Ok(Vec::new()),
            Snapshot::Loaded(tasks) => Ok(tasks),
            Snapshot::Corrupt(reason) => match self.on_corrupt {
                CorruptPolicy::Reset => {
                    warn!(
                        store = %self.store.describe(),
                        %reason,
                        "task document is corrupt, treating it as empty"
                    );
                    Ok(Vec::new())
                }
                CorruptPolicy::Fail => Err(TrackerError::CorruptStore(reason)),
            },
        }
    }

    /// Current task list. Does not wait for in-flight writers.
    pub fn read_all(&self) -> Result<Vec<Task>> {
        self.resolve(self.store.load()?)
    }

    /// Run one load -> mutate -> save cycle while holding both the
    /// in-process writer lock and the backend's lock.
    ///
    /// Nothing is written when `f` fails or reports [`Outcome::Unchanged`].
    pub fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<Outcome<T>>,
    {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _guard = self.store.acquire()?;

        let mut tasks = self.read_all()?;
        match f(&mut tasks)? {
            Outcome::Unchanged(value) => Ok(value),
            Outcome::Changed(value) => {
                if let Err(e) = self.store.save(&tasks) {
                    error!(
                        store = %self.store.describe(),
                        error = %e,
                        "failed to save tasks"
                    );
                    return Err(e);
                }
                debug!(store = %self.store.describe(), count = tasks.len(), "tasks saved");
                Ok(value)
            }
        }
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("store", &self.store.describe())
            .field("on_corrupt", &self.on_corrupt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewTask;
    use crate::store::{JsonFileStore, MemoryStore};
    use chrono::Utc;
    use std::collections::HashSet;
    use tempfile::tempdir;

    struct ReadOnlyStore;

    impl TaskStore for ReadOnlyStore {
        fn load(&self) -> Result<Snapshot> {
            Ok(Snapshot::Empty)
        }

        fn save(&self, _tasks: &[Task]) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn describe(&self) -> String {
            "read-only".into()
        }
    }

    fn push(tasks: &mut Vec<Task>, title: &str) -> u64 {
        let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        tasks.push(Task::from_new(id, NewTask::titled(title), Utc::now()).unwrap());
        id
    }

    #[test]
    fn corrupt_document_resets_by_default() {
        let tracker = Tracker::new(Arc::new(MemoryStore::with_document("{{{")));
        assert_eq!(tracker.policy(), CorruptPolicy::Reset);
        assert!(tracker.read_all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_document_fails_under_fail_policy() {
        let store = Arc::new(MemoryStore::with_document("{{{"));
        let tracker = Tracker::new(store.clone()).with_policy(CorruptPolicy::Fail);

        assert!(matches!(tracker.read_all(), Err(TrackerError::CorruptStore(_))));
        let result = tracker.mutate(|tasks| Ok(Outcome::Changed(push(tasks, "x"))));
        assert!(matches!(result, Err(TrackerError::CorruptStore(_))));
        assert_eq!(store.document().unwrap(), b"{{{".to_vec());
    }

    #[test]
    fn failed_closure_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let tracker = Tracker::new(store.clone());
        let result: Result<()> = tracker.mutate(|tasks| {
            push(tasks, "discarded");
            Err(TrackerError::TitleRequired)
        });
        assert!(result.is_err());
        assert!(store.document().is_none());
    }

    #[test]
    fn unchanged_outcome_skips_save() {
        let store = Arc::new(MemoryStore::new());
        let tracker = Tracker::new(store.clone());
        let len = tracker
            .mutate(|tasks| Ok(Outcome::Unchanged(tasks.len())))
            .unwrap();
        assert_eq!(len, 0);
        assert!(store.document().is_none());
    }

    #[test]
    fn save_failure_is_surfaced() {
        let tracker = Tracker::new(Arc::new(ReadOnlyStore));
        let result = tracker.mutate(|tasks| Ok(Outcome::Changed(push(tasks, "lost"))));
        assert!(matches!(result, Err(TrackerError::Io(_))));
    }

    #[test]
    fn concurrent_writers_do_not_lose_updates() {
        let dir = tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("tasks.json")));
        let tracker = Arc::new(Tracker::new(store));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for n in 0..10 {
                        tracker
                            .mutate(|tasks| {
                                Ok(Outcome::Changed(push(tasks, &format!("w{worker}-{n}"))))
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let tasks = tracker.read_all().unwrap();
        assert_eq!(tasks.len(), 80);
        let ids: HashSet<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=80).collect::<HashSet<u64>>());
    }
}
