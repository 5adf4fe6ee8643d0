use tracing::info;

use crate::commands::position;
use crate::error::Result;
use crate::model::Task;
use crate::store::Tracker;
use crate::store::tracker::Outcome;

/// Remove one task and hand it back.
pub fn run(tracker: &Tracker, id: u64) -> Result<Task> {
    let task = tracker.mutate(|tasks| {
        let idx = position(tasks, id)?;
        Ok(Outcome::Changed(tasks.remove(idx)))
    })?;
    info!(task_id = id, title = %task.title, "task deleted");
    Ok(task)
}
