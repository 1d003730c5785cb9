use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use invoicedesk_infra::StoreError;

use crate::actions::ActionError;

pub fn action_error_to_response(err: ActionError) -> axum::response::Response {
    tracing::error!(error = %err, "action failed");
    match err {
        ActionError::Internal(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "internal error",
        ),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "store read failed");
    match err {
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Unavailable(_) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "store_unavailable",
            "storage is unavailable",
        ),
        StoreError::Database(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            "storage error",
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
