//! Response envelopes for the HTTP API and report printing for the CLI.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::build_info;
use crate::commands::check::CheckReport;
use crate::error::{Result, TrackerError};
use crate::model::{Stats, Task, timestamp};

pub const ENDPOINTS: &[&str] = &[
    "/tasks",
    "/tasks/{id}",
    "/tasks/{id}/toggle",
    "/tasks/clear-completed",
    "/health",
    "/stats",
];

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub message: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_sha: Option<&'static str>,
    pub endpoints: &'static [&'static str],
}

impl Metadata {
    pub fn current() -> Self {
        Self {
            message: "Task Tracker API",
            version: build_info::version(),
            git_sha: build_info::git_sha(),
            endpoints: ENDPOINTS,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
}

impl Health {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            status: "healthy",
            timestamp: timestamp::format(&now),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

/// `GET /stats` body. Older clients read `total_tasks`, so both names are sent.
#[derive(Debug, Serialize)]
pub struct StatsBody {
    #[serde(flatten)]
    pub stats: Stats,
    pub total_tasks: usize,
}

impl From<Stats> for StatsBody {
    fn from(stats: Stats) -> Self {
        Self {
            total_tasks: stats.total,
            stats,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
    pub task: Task,
}

impl From<Task> for Deleted {
    fn from(task: Task) -> Self {
        Self {
            message: "Task deleted successfully",
            task,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Cleared {
    pub message: String,
    pub cleared: Vec<Task>,
}

impl From<Vec<Task>> for Cleared {
    fn from(cleared: Vec<Task>) -> Self {
        Self {
            message: format!("Cleared {} completed tasks", cleared.len()),
            cleared,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl From<&TrackerError> for ErrorBody {
    fn from(e: &TrackerError) -> Self {
        Self {
            error: e.to_string(),
            code: e.code(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
}

pub fn print_check(report: &CheckReport, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(report)?),
        Format::Pretty => {
            println!("{}: {}", report.store, report.state);
            if let Some(ref reason) = report.reason {
                println!("  reason: {reason}");
            }
            if let Some(stats) = report.stats {
                println!(
                    "  tasks: {} total, {} completed, {} pending ({:.1}%)",
                    stats.total, stats.completed, stats.pending, stats.completion_rate
                );
            }
            if !report.duplicate_ids.is_empty() {
                let ids: Vec<String> = report.duplicate_ids.iter().map(u64::to_string).collect();
                println!("  duplicate ids: {}", ids.join(", "));
            }
        }
    }
    Ok(())
}
