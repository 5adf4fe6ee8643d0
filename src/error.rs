use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("title is required")]
    TitleRequired,

    #[error("task {0} not found")]
    TaskNotFound(u64),

    #[error("task '{0}' not found")]
    InvalidTaskId(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("locked by another process: {0}")]
    Locked(String),

    #[error("task document is corrupt: {0}")]
    CorruptStore(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Join(String),
}

impl TrackerError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::TitleRequired => "title_required",
            Self::TaskNotFound(_) => "task_not_found",
            Self::InvalidTaskId(_) => "invalid_task_id",
            Self::InvalidFilter(_) => "invalid_filter",
            Self::InvalidBody(_) => "invalid_body",
            Self::Locked(_) => "locked",
            Self::CorruptStore(_) => "corrupt_store",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::Join(_) => "internal_error",
        }
    }

    /// True for failures caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::TitleRequired
                | Self::TaskNotFound(_)
                | Self::InvalidTaskId(_)
                | Self::InvalidFilter(_)
                | Self::InvalidBody(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
