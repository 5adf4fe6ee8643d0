use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Result;
use crate::model::Task;
use crate::store::lock::{self, LockGuard};
use crate::store::{Snapshot, TaskStore};

/// Task list kept as one pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar used for cross-process exclusion, `<document>.lock`.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot> {
        match fs::read(&self.path) {
            Ok(raw) => Ok(Snapshot::decode(&raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Snapshot::Empty),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file, then rename over the document.
    fn save(&self, tasks: &[Task]) -> Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, tasks)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn acquire(&self) -> Result<Option<LockGuard>> {
        fs::create_dir_all(self.dir())?;
        lock::acquire_lock(&self.lock_path()).map(Some)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
