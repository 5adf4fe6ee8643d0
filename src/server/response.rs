use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use crate::error::TrackerError;
use crate::output::ErrorBody;

impl TrackerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TitleRequired | Self::InvalidFilter(_) | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::TaskNotFound(_) | Self::InvalidTaskId(_) => StatusCode::NOT_FOUND,
            Self::Locked(_) => StatusCode::CONFLICT,
            Self::CorruptStore(_) | Self::Io(_) | Self::Json(_) | Self::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.is_client_error() {
            debug!(code = self.code(), error = %self, "request rejected");
        } else {
            error!(code = self.code(), error = %self, "request failed");
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(TrackerError::TitleRequired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(TrackerError::TaskNotFound(1).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            TrackerError::InvalidTaskId("abc".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(TrackerError::Locked("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            TrackerError::CorruptStore("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_uses_mapped_status() {
        let response = TrackerError::InvalidFilter("status".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
