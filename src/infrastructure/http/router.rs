use crate::infrastructure::http::controllers::{assignments, auth, features, submissions};
use crate::infrastructure::http::middleware::{attach_principal, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use http::{header, HeaderValue, Method};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Cross-origin policy: explicit origins only, cookies allowed
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    // Document routes see the verified session, if any
    let documents = Router::new()
        .route("/features", get(features::list_features))
        .route(
            "/assignments",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route(
            "/assignment_details/:id",
            get(assignments::get_assignment_details),
        )
        .route(
            "/assignments/:id",
            put(assignments::update_assignment).delete(assignments::delete_assignment),
        )
        .route(
            "/submittedAssignments",
            post(submissions::submit_assignment),
        )
        // GET takes a status, PUT an identifier
        .route(
            "/submittedAssignments/:key",
            get(submissions::list_by_status).put(submissions::grade_submission),
        )
        .route(
            "/my_submitted_assignments/:email",
            get(submissions::list_by_examinee),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            attach_principal,
        ));

    // Build public routes
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/jwt", post(auth::issue_token))
        .route("/sign_out", post(auth::sign_out))
        .merge(documents)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Assignment 11 server is running..."
}

async fn health_handler() -> &'static str {
    "OK"
}
