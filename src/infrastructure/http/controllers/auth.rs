use crate::{
    application::services::TOKEN_COOKIE,
    domain::entities::Fields,
    infrastructure::http::middleware::{ApiResult, AppState},
};
use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};

/// `token` cookie with the attributes for the current environment
fn token_cookie(value: String, production: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(if production {
            SameSite::None
        } else {
            SameSite::Strict
        })
        .build()
}

fn cleared_token_cookie(production: bool) -> Cookie<'static> {
    let mut cookie = token_cookie(String::new(), production);
    cookie.make_removal();
    cookie
}

// POST /jwt - Sign the user object into a session cookie
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(user): Json<Fields>,
) -> ApiResult<(CookieJar, Json<Value>)> {
    let token = state.token_service.issue(user)?;

    tracing::info!("Session token issued");
    Ok((
        jar.add(token_cookie(token, state.production)),
        Json(json!({ "success": true })),
    ))
}

// POST /sign_out - Clear the session cookie
pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    (
        jar.add(cleared_token_cookie(state.production)),
        Json(json!({ "success": true })),
    )
}
