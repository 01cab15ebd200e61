use crate::{
    domain::entities::{GradeRequest, InsertOneResult, SubmittedAssignment, UpdateResult},
    infrastructure::http::middleware::{ApiResult, AppState, Session},
};
use axum::{
    extract::{Path, State},
    Json,
};

// GET /submittedAssignments/:status - Submissions in the given status
pub async fn list_by_status(
    State(state): State<AppState>,
    session: Session,
    Path(status): Path<String>,
) -> ApiResult<Json<Vec<SubmittedAssignment>>> {
    let submissions = state
        .submission_service
        .list_by_status(session.principal(), &status)
        .await?;

    Ok(Json(submissions))
}

// GET /my_submitted_assignments/:email - Submissions of one examinee
pub async fn list_by_examinee(
    State(state): State<AppState>,
    session: Session,
    Path(email): Path<String>,
) -> ApiResult<Json<Vec<SubmittedAssignment>>> {
    let submissions = state
        .submission_service
        .list_by_examinee(session.principal(), &email)
        .await?;

    Ok(Json(submissions))
}

// POST /submittedAssignments - Submit an assignment
pub async fn submit_assignment(
    State(state): State<AppState>,
    session: Session,
    Json(submission): Json<SubmittedAssignment>,
) -> ApiResult<Json<InsertOneResult>> {
    let result = state
        .submission_service
        .submit(session.principal(), submission)
        .await?;

    Ok(Json(result))
}

// PUT /submittedAssignments/:id - Record a grade
pub async fn grade_submission(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(grade): Json<GradeRequest>,
) -> ApiResult<Json<UpdateResult>> {
    let result = state
        .submission_service
        .grade(session.principal(), &id, grade)
        .await?;

    Ok(Json(result))
}
