use crate::application::services::{
    AssignmentService, FeatureService, SubmissionService, TokenService, TOKEN_COOKIE,
};
use crate::domain::entities::Principal;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;

#[derive(Clone)]
pub struct AppState {
    /// Production deployments get `Secure; SameSite=None` session cookies
    pub production: bool,
    pub token_service: TokenService,
    pub feature_service: FeatureService,
    pub assignment_service: AssignmentService,
    pub submission_service: SubmissionService,
}

/// Session token from the `token` cookie, falling back to a Bearer header
fn extract_token(jar: &CookieJar, request: &Request) -> Option<String> {
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Verify the session token, if any, and attach its `Principal`.
/// Requests without a valid token continue anonymously; the access policy
/// decides what they may do.
pub async fn attach_principal(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(&jar, &request) {
        match state.token_service.verify(&token) {
            Ok(principal) => {
                tracing::debug!("Session verified for {:?}", principal.email());
                request.extensions_mut().insert(principal);
            }
            Err(_) => {
                tracing::warn!(
                    "Ignoring invalid session token on {} {}",
                    request.method(),
                    request.uri().path()
                );
            }
        }
    }

    next.run(request).await
}

/// The verified caller of the current request, if there is one
#[derive(Debug, Clone, Default)]
pub struct Session(pub Option<Principal>);

impl Session {
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session(parts.extensions.get::<Principal>().cloned()))
    }
}
