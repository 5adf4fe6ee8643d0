use crate::error::Result;
use crate::model::{Task, TaskFilter};
use crate::store::Tracker;

pub fn run(tracker: &Tracker, filter: &TaskFilter) -> Result<Vec<Task>> {
    let mut tasks = tracker.read_all()?;
    tasks.retain(|t| filter.matches(t));
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::seeded;
    use crate::commands::{edit, toggle};
    use crate::model::TaskPatch;

    #[test]
    fn unfiltered_list_keeps_insertion_order() {
        let (_, tracker) = seeded(&["a", "b", "c"]);
        let titles: Vec<String> = run(&tracker, &TaskFilter::default())
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn filters_compose() {
        let (_, tracker) = seeded(&["a", "b", "c"]);
        toggle::run(&tracker, 1).unwrap();
        toggle::run(&tracker, 3).unwrap();
        edit::run(
            &tracker,
            3,
            TaskPatch {
                category: Some("work".into()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

        let done = TaskFilter::parse(Some("completed"), None).unwrap();
        let ids: Vec<u64> = run(&tracker, &done).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let done_work = TaskFilter::parse(Some("completed"), Some("work")).unwrap();
        let ids: Vec<u64> = run(&tracker, &done_work).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);

        let pending = TaskFilter::parse(Some("pending"), None).unwrap();
        let ids: Vec<u64> = run(&tracker, &pending).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn empty_result_is_ok() {
        let (_, tracker) = seeded(&[]);
        let filter = TaskFilter::parse(None, Some("nothing")).unwrap();
        assert!(run(&tracker, &filter).unwrap().is_empty());
    }
}
