//! One module per task operation. Each takes a [`Tracker`] and returns
//! plain data; the HTTP layer decides how to present it.

pub mod check;
pub mod clear;
pub mod create;
pub mod delete;
pub mod edit;
pub mod list;
pub mod show;
pub mod stats;
pub mod toggle;

use crate::error::{Result, TrackerError};
use crate::model::Task;

/// Index of the task with `id`, or `TaskNotFound`.
fn position(tasks: &[Task], id: u64) -> Result<usize> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or(TrackerError::TaskNotFound(id))
}
