use chrono::Utc;
use tracing::info;

use crate::error::Result;
use crate::model::{NewTask, Task};
use crate::store::Tracker;
use crate::store::tracker::Outcome;

/// Next id: one past the largest existing id, 1 for an empty store.
pub fn next_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

pub fn run(tracker: &Tracker, new: NewTask) -> Result<Task> {
    let task = tracker.mutate(|tasks| {
        let task = Task::from_new(next_id(tasks), new, Utc::now())?;
        tasks.push(task.clone());
        Ok(Outcome::Changed(task))
    })?;
    info!(task_id = task.id, title = %task.title, "task created");
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::delete;
    use crate::commands::testing::{seeded, tracker};
    use crate::error::TrackerError;

    #[test]
    fn first_task_gets_id_one() {
        let (_, tracker) = tracker();
        let task = run(&tracker, NewTask::titled("first")).unwrap();
        assert_eq!(task.id, 1);
        assert!(task.created_at.is_some());
    }

    #[test]
    fn id_is_max_plus_one_even_after_gaps() {
        let (_, tracker) = seeded(&["a", "b", "c"]);
        delete::run(&tracker, 2).unwrap();
        assert_eq!(run(&tracker, NewTask::titled("d")).unwrap().id, 4);
        delete::run(&tracker, 4).unwrap();
        assert_eq!(run(&tracker, NewTask::titled("e")).unwrap().id, 4);
    }

    #[test]
    fn missing_title_leaves_store_untouched() {
        let (store, tracker) = seeded(&["a"]);
        let before = store.document();
        let err = run(&tracker, NewTask::default()).unwrap_err();
        assert!(matches!(err, TrackerError::TitleRequired));
        assert_eq!(store.document(), before);
    }

    #[test]
    fn optional_fields_are_kept() {
        let (_, tracker) = tracker();
        let task = run(
            &tracker,
            NewTask {
                title: Some("  trip  ".into()),
                description: Some("pack bags".into()),
                category: Some("personal".into()),
                priority: Some("high".into()),
                due_date: Some("2026-12-24".into()),
                tags: Some(vec!["travel".into(), "family".into()]),
            },
        )
        .unwrap();
        assert_eq!(task.title, "  trip  ");
        assert_eq!(task.category, "personal");
        assert_eq!(task.priority, "high");
        assert_eq!(task.due_date.as_deref(), Some("2026-12-24"));
        assert_eq!(task.tags, vec!["travel", "family"]);
    }

    #[test]
    fn next_id_of_unordered_store() {
        let (_, tracker) = seeded(&["a", "b"]);
        let tasks = tracker.read_all().unwrap();
        assert_eq!(next_id(&tasks), 3);
        assert_eq!(next_id(&[]), 1);
    }
}
