use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;
use uuid::Uuid;

use super::{ApiError, AppState};

pub const VISITOR_COOKIE: &str = "anon_uuid";

/// Values longer than the `cookie_id` column are never trusted
const MAX_COOKIE_LEN: usize = 64;

/// The `anon_uuid` value in effect for the current request.
#[derive(Debug, Clone)]
pub struct VisitorCookie(pub String);

/// The anonymous user behind the current request.
#[derive(Debug, Clone)]
pub struct Visitor {
    pub id: i32,
    pub cookie_id: String,
}

/// Runs for every request, including unmatched paths.
///
/// A request without a usable `anon_uuid` cookie gets a fresh UUID and the
/// response carries it back, whatever its status. No database access
/// happens here, so health checks keep answering while the store is down.
pub async fn visitor_cookie_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let presented = jar
        .get(VISITOR_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|value| is_usable_cookie(value));

    let issue_cookie = presented.is_none();
    let cookie_id = presented.unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(VisitorCookie(cookie_id.clone()));

    let response = next.run(request).await;

    if !issue_cookie {
        return response;
    }

    let cookie = Cookie::build((VISITOR_COOKIE, cookie_id))
        .path("/")
        .http_only(true)
        .secure(state.secure_cookies)
        .same_site(SameSite::Lax);

    (jar.add(cookie), response).into_response()
}

/// Resolves the user for routes acting on the visitor's behalf, creating
/// it on first sight. A present but unknown cookie value is adopted as is.
pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let VisitorCookie(cookie_id) = request
        .extensions()
        .get::<VisitorCookie>()
        .cloned()
        .ok_or_else(|| ApiError::internal("Visitor cookie layer is not installed"))?;

    let user = state
        .store()
        .get_or_create_user(&cookie_id)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("{e:#}")))?;

    tracing::Span::current().record("user_id", user.id);

    request.extensions_mut().insert(Visitor {
        id: user.id,
        cookie_id: user.cookie_id,
    });

    Ok(next.run(request).await)
}

fn is_usable_cookie(value: &str) -> bool {
    !value.is_empty() && value.len() <= MAX_COOKIE_LEN
}
