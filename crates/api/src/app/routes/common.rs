use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};

use invoicedesk_auth::Session;
use invoicedesk_core::ActionState;

use crate::middleware::SESSION_COOKIE;

/// Client asked for the action state itself rather than a redirect.
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// Map an action result onto HTTP.
///
/// `ok` with a target redirects with 303 unless the client wants JSON.
pub fn state_response(state: ActionState, headers: &HeaderMap) -> Response {
    let status = match &state {
        ActionState::Ok {
            redirect_to: Some(to),
        } if !wants_json(headers) => return Redirect::to(to).into_response(),
        ActionState::Ok { .. } => StatusCode::OK,
        ActionState::FieldErrors { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ActionState::Message { .. } => StatusCode::BAD_REQUEST,
    };
    (status, Json(state)).into_response()
}

pub fn session_cookie(session: &Session, secure: bool) -> Option<HeaderValue> {
    let max_age = (session.claims.exp - session.claims.iat).max(0);
    cookie(&session.token, max_age, secure)
}

pub fn clear_session_cookie(secure: bool) -> Option<HeaderValue> {
    cookie("", 0, secure)
}

fn cookie(value: &str, max_age: i64, secure: bool) -> Option<HeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

/// Attach a `Set-Cookie` header, if one could be built.
pub fn with_cookie(mut response: Response, cookie: Option<HeaderValue>) -> Response {
    match cookie {
        Some(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        None => tracing::error!("session cookie could not be encoded"),
    }
    response
}
