use chrono::Utc;
use tracing::info;

use crate::commands::position;
use crate::error::Result;
use crate::model::Task;
use crate::store::Tracker;
use crate::store::tracker::Outcome;

pub fn run(tracker: &Tracker, id: u64) -> Result<Task> {
    let task = tracker.mutate(|tasks| {
        let idx = position(tasks, id)?;
        let now = Utc::now();
        let task = &mut tasks[idx];
        task.set_completed(!task.completed, now);
        task.touch(now);
        Ok(Outcome::Changed(task.clone()))
    })?;
    let status = if task.completed { "completed" } else { "pending" };
    info!(task_id = id, status, "task toggled");
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::seeded;
    use crate::error::TrackerError;

    #[test]
    fn toggle_twice_restores_state() {
        let (_, tracker) = seeded(&["a"]);
        let once = run(&tracker, 1).unwrap();
        assert!(once.completed);
        assert!(once.completed_at.is_some());
        assert!(once.updated_at.is_some());

        let twice = run(&tracker, 1).unwrap();
        assert!(!twice.completed);
        assert_eq!(twice.completed_at, None);
    }

    #[test]
    fn toggle_persists() {
        let (_, tracker) = seeded(&["a", "b"]);
        run(&tracker, 2).unwrap();
        let tasks = tracker.read_all().unwrap();
        assert!(!tasks[0].completed);
        assert!(tasks[1].completed);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let (store, tracker) = seeded(&["a"]);
        let before = store.document();
        assert!(matches!(run(&tracker, 2), Err(TrackerError::TaskNotFound(2))));
        assert_eq!(store.document(), before);
    }
}
