//! Final rendering of run responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cmdrest_engine::InvocationError;
use cmdrest_types::RunResponse;
use tracing::warn;

/// Result of the run pipeline, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub response: RunResponse,
    pub failure: Option<InvocationError>,
}

impl RunOutcome {
    /// Folds the failure into the response body.
    ///
    /// Execution failures with a known exit code populate `exit_code`; launch
    /// failures only populate `error`.
    pub fn finish(self) -> (StatusCode, RunResponse) {
        let RunOutcome { mut response, failure } = self;
        let Some(failure) = failure else {
            return (StatusCode::OK, response);
        };
        warn!(cmd = %response.cmd, error = %failure, "command failed");
        response.exit_code = failure.exit_code();
        response.error = Some(failure.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, response)
    }
}

/// Renders the outcome as a JSON response, `500` on failure.
pub fn render(outcome: RunOutcome) -> Response {
    let (status, body) = outcome.finish();
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_ok_without_exit_code() {
        let (status, body) = RunOutcome {
            response: RunResponse::new("ls"),
            failure: None,
        }
        .finish();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.exit_code, None);
        assert!(body.error.is_none());
    }

    #[test]
    fn execution_failure_populates_exit_code() {
        let (status, body) = RunOutcome {
            response: RunResponse::new("false"),
            failure: Some(InvocationError::Execution {
                exit_code: Some(1),
                message: "exit status 1".into(),
            }),
        }
        .finish();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.exit_code, Some(1));
        assert_eq!(body.error.as_deref(), Some("exit status 1"));
    }

    #[test]
    fn launch_failure_has_no_exit_code() {
        let (status, body) = RunOutcome {
            response: RunResponse::new("nope"),
            failure: Some(InvocationError::launch("nope", "No such file or directory")),
        }
        .finish();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.exit_code, None);
        assert_eq!(body.error.as_deref(), Some("failed to start `nope`: No such file or directory"));
    }
}
