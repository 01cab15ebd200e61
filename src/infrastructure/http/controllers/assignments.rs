use crate::{
    domain::entities::{Assignment, DeleteResult, InsertOneResult, UpdateResult},
    infrastructure::http::middleware::{ApiResult, AppState, Session},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct AssignmentQuery {
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

// GET /assignments?sortBy=<level> - List assignments, optionally by level
pub async fn list_assignments(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AssignmentQuery>,
) -> ApiResult<Json<Vec<Assignment>>> {
    tracing::debug!("Listing assignments, sortBy={:?}", query.sort_by);

    let assignments = state
        .assignment_service
        .list_assignments(session.principal(), query.sort_by.as_deref())
        .await?;

    Ok(Json(assignments))
}

// GET /assignment_details/:id - Single assignment, `null` when absent
pub async fn get_assignment_details(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Assignment>>> {
    let assignment = state
        .assignment_service
        .get_assignment(session.principal(), &id)
        .await?;

    Ok(Json(assignment))
}

// POST /assignments - Create assignment
pub async fn create_assignment(
    State(state): State<AppState>,
    session: Session,
    Json(assignment): Json<Assignment>,
) -> ApiResult<Json<InsertOneResult>> {
    let result = state
        .assignment_service
        .create_assignment(session.principal(), assignment)
        .await?;

    Ok(Json(result))
}

// PUT /assignments/:id - Set fields, creating the assignment if missing
pub async fn update_assignment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(assignment): Json<Assignment>,
) -> ApiResult<Json<UpdateResult>> {
    let result = state
        .assignment_service
        .update_assignment(session.principal(), &id, assignment)
        .await?;

    Ok(Json(result))
}

// DELETE /assignments/:id - Delete assignment
pub async fn delete_assignment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResult>> {
    let result = state
        .assignment_service
        .delete_assignment(session.principal(), &id)
        .await?;

    Ok(Json(result))
}
