use serde::Serialize;

use crate::error::Result;
use crate::model::Stats;
use crate::store::{Snapshot, TaskStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    Empty,
    Corrupt,
    Ok,
}

impl std::fmt::Display for DocumentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Corrupt => write!(f, "corrupt"),
            Self::Ok => write!(f, "ok"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub store: String,
    pub state: DocumentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    /// Ids that appear more than once, in first-seen order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicate_ids: Vec<u64>,
}

impl CheckReport {
    pub fn is_healthy(&self) -> bool {
        self.state != DocumentState::Corrupt && self.duplicate_ids.is_empty()
    }
}

/// Inspect the document without applying any corrupt-document policy.
pub fn run(store: &dyn TaskStore) -> Result<CheckReport> {
    let mut report = CheckReport {
        store: store.describe(),
        state: DocumentState::Empty,
        reason: None,
        stats: None,
        duplicate_ids: Vec::new(),
    };
    match store.load()? {
        Snapshot::Empty => {}
        Snapshot::Corrupt(reason) => {
            report.state = DocumentState::Corrupt;
            report.reason = Some(reason);
        }
        Snapshot::Loaded(tasks) => {
            let mut seen = std::collections::HashSet::new();
            for task in &tasks {
                if !seen.insert(task.id) && !report.duplicate_ids.contains(&task.id) {
                    report.duplicate_ids.push(task.id);
                }
            }
            report.state = DocumentState::Ok;
            report.stats = Some(Stats::from_tasks(&tasks));
        }
    }
    Ok(report)
}
