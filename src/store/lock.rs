use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, TrackerError};

/// Exclusive advisory lock on a sidecar file. Released on drop.
#[derive(Debug)]
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly (normally handled by Drop).
    pub fn release(self) -> Result<()> {
        self.file.unlock()?;
        Ok(())
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Acquire an exclusive lock on a file.
/// Retries with exponential backoff (1ms to 512ms, ~1s total) before failing.
pub fn acquire_lock(path: &Path) -> Result<LockGuard> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;

    let mut delay = Duration::from_millis(1);
    let max_delay = Duration::from_millis(512);

    loop {
        match file.try_lock_exclusive() {
            Ok(()) => {
                return Ok(LockGuard {
                    file,
                    path: path.to_path_buf(),
                });
            }
            Err(_) if delay <= max_delay => {
                std::thread::sleep(delay);
                delay *= 2;
            }
            Err(_) => {
                return Err(TrackerError::Locked(path.display().to_string()));
            }
        }
    }
}
