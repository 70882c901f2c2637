//! server::error
//!
//! [`AppError`]: converts request failures into HTTP responses. JSON
//! endpoints answer with the `{error, details?}` envelope; fragment
//! endpoints answer with an escaped HTML error block.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::dispatch::DispatchError;
use crate::ui::html;

/// A failed request, tagged with how to render it.
#[derive(Debug)]
pub enum AppError {
    /// Render as a JSON envelope.
    Api(DispatchError),
    /// Render as an HTML fragment.
    Fragment(DispatchError),
}

impl AppError {
    fn inner(&self) -> &DispatchError {
        match self {
            AppError::Api(err) | AppError::Fragment(err) => err,
        }
    }

    fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.inner().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Re-tag as a fragment error.
    pub fn fragment(self) -> Self {
        match self {
            AppError::Api(err) | AppError::Fragment(err) => AppError::Fragment(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = self.inner();
        if status.is_server_error() {
            error!(kind = err.kind(), error = %err, "request failed");
        } else {
            warn!(kind = err.kind(), error = %err, "request rejected");
        }

        match self {
            AppError::Api(err) => (status, Json(err.to_envelope())).into_response(),
            AppError::Fragment(err) => {
                (status, Html(html::error_block(&err.to_string()))).into_response()
            }
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        AppError::Api(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Api(DispatchError::invalid(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Api(DispatchError::invalid(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_dispatch_error() {
        let resp = AppError::from(DispatchError::CommitNotFound("abc".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::from(DispatchError::DirtyWorkingTree).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn fragment_errors_are_html() {
        let resp = AppError::from(DispatchError::invalid("nope"))
            .fragment()
            .into_response();
        let content_type = resp
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"));
    }
}
