use crate::commands::position;
use crate::error::Result;
use crate::model::Task;
use crate::store::Tracker;

pub fn run(tracker: &Tracker, id: u64) -> Result<Task> {
    let mut tasks = tracker.read_all()?;
    let idx = position(&tasks, id)?;
    Ok(tasks.swap_remove(idx))
}
