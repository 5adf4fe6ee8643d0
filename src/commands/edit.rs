use chrono::Utc;
use tracing::info;

use crate::commands::position;
use crate::error::Result;
use crate::model::{Task, TaskPatch};
use crate::store::Tracker;
use crate::store::tracker::Outcome;

pub fn run(tracker: &Tracker, id: u64, patch: TaskPatch) -> Result<Task> {
    let task = tracker.mutate(|tasks| {
        let idx = position(tasks, id)?;
        tasks[idx].apply(patch, Utc::now())?;
        Ok(Outcome::Changed(tasks[idx].clone()))
    })?;
    info!(task_id = id, "task updated");
    Ok(task)
}
