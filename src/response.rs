use crate::model::RunReport;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Represents a response on the `/run` endpoint.
///
/// Every outcome is a `200` carrying the report envelope. The envelope
/// itself distinguishes verdict lists from harness-level failures, and
/// callers render the two differently; non-`200` statuses are reserved for
/// requests that never reached the harness at all.
impl IntoResponse for RunReport {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod into_response {
    use crate::error::HarnessError;
    use crate::model::RunReport;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn failures_are_still_http_success() {
        let response = RunReport::failed(&HarnessError::NoTestCases).into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn completed_reports_are_http_success() {
        let response = RunReport::completed(vec![]).into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
