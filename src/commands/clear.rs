use tracing::info;

use crate::error::Result;
use crate::model::Task;
use crate::store::Tracker;
use crate::store::tracker::Outcome;

/// Drop every completed task. Returns the removed ones in store order.
pub fn run(tracker: &Tracker) -> Result<Vec<Task>> {
    let cleared = tracker.mutate(|tasks| {
        let (done, kept): (Vec<Task>, Vec<Task>) =
            std::mem::take(tasks).into_iter().partition(|t| t.completed);
        *tasks = kept;
        if done.is_empty() {
            Ok(Outcome::Unchanged(done))
        } else {
            Ok(Outcome::Changed(done))
        }
    })?;
    info!(count = cleared.len(), "cleared completed tasks");
    Ok(cleared)
}
