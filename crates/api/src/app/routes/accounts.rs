use std::sync::Arc;

use axum::{
    Form, Router,
    extract::Extension,
    http::HeaderMap,
    routing::post,
};

use invoicedesk_core::{ActionState, FormData};

use crate::actions::{AuthOutcome, accounts as actions};
use crate::app::errors;
use crate::app::routes::common::{clear_session_cookie, session_cookie, state_response, with_cookie};
use crate::app::services::AppServices;

/// Where the client lands after signing out.
const SIGNED_OUT_REDIRECT: &str = "/login";

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
}

fn outcome_response(services: &AppServices, outcome: AuthOutcome, headers: &HeaderMap) -> axum::response::Response {
    let response = state_response(outcome.state, headers);
    match outcome.session {
        Some(session) => with_cookie(response, session_cookie(&session, services.cookie_secure)),
        None => response,
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Form(form): Form<FormData>,
) -> axum::response::Response {
    match actions::authenticate(&services.actions, &form).await {
        Ok(outcome) => outcome_response(&services, outcome, &headers),
        Err(e) => errors::action_error_to_response(e),
    }
}

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Form(form): Form<FormData>,
) -> axum::response::Response {
    match actions::create_account(&services.actions, &form).await {
        Ok(outcome) => outcome_response(&services, outcome, &headers),
        Err(e) => errors::action_error_to_response(e),
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let response = state_response(ActionState::redirect(SIGNED_OUT_REDIRECT), &headers);
    with_cookie(response, clear_session_cookie(services.cookie_secure))
}
