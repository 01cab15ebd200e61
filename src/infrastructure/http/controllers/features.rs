use crate::{
    domain::entities::Feature,
    infrastructure::http::middleware::{ApiResult, AppState, Session},
};
use axum::{extract::State, Json};

// GET /features - List every feature
pub async fn list_features(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<Feature>>> {
    let features = state
        .feature_service
        .list_features(session.principal())
        .await?;

    Ok(Json(features))
}
