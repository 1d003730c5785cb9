use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};

use invoicedesk_core::{FormData, InvoiceId};

use crate::actions::invoices as actions;
use crate::app::routes::common::state_response;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/:id", get(get_invoice).post(update_invoice))
        .route("/:id/delete", post(delete_invoice))
}

fn parse_id(raw: &str) -> Result<InvoiceId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid invoice id"))
}

pub async fn list_invoices(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.invoices_view().await {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.invoice_get(id).await {
        Ok(Some(invoice)) => Json(dto::invoice_to_json(&invoice)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    headers: HeaderMap,
    Form(form): Form<FormData>,
) -> axum::response::Response {
    tracing::debug!(user_id = %principal.user_id(), "create invoice");
    match actions::create_invoice(&services.actions, &form).await {
        Ok(state) => state_response(state, &headers),
        Err(e) => errors::action_error_to_response(e),
    }
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<FormData>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match actions::update_invoice(&services.actions, id, &form).await {
        Ok(state) => state_response(state, &headers),
        Err(e) => errors::action_error_to_response(e),
    }
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match actions::delete_invoice(&services.actions, id).await {
        Ok(state) => state_response(state, &headers),
        Err(e) => errors::action_error_to_response(e),
    }
}
