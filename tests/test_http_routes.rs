mod helpers;

use axum::http::{header, StatusCode};
use gradebook::application::services::AccessPolicyKind;
use gradebook::bootstrap;
use gradebook::domain::entities::DocumentId;
use helpers::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_root_reports_running() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Open);

    let response = send(&app, empty_request("GET", "/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Assignment 11 server is running...");

    let response = send(&app, empty_request("GET", "/health", None)).await;
    assert_eq!(body_text(response).await, "OK");

    test_db.teardown().await;
}

#[tokio::test]
async fn test_assignment_lifecycle_over_http() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Open);

    let created = send_ok(
        &app,
        json_request(
            "POST",
            "/assignments",
            json!({"title": "T", "level": "easy"}),
            None,
        ),
    )
    .await;
    assert_eq!(created["acknowledged"], json!(true));
    let id = created["insertedId"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let details = send_ok(
        &app,
        empty_request("GET", &format!("/assignment_details/{}", id), None),
    )
    .await;
    assert_eq!(details, json!({"_id": id, "title": "T", "level": "easy"}));

    let easy = send_ok(&app, empty_request("GET", "/assignments?sortBy=easy", None)).await;
    assert_eq!(easy.as_array().unwrap().len(), 1);

    let hard = send_ok(&app, empty_request("GET", "/assignments?sortBy=hard", None)).await;
    assert_eq!(hard, json!([]));

    let updated = send_ok(
        &app,
        json_request(
            "PUT",
            &format!("/assignments/{}", id),
            json!({"level": "hard"}),
            None,
        ),
    )
    .await;
    assert_eq!(
        updated,
        json!({
            "acknowledged": true,
            "matchedCount": 1,
            "modifiedCount": 1,
            "upsertedId": null,
            "upsertedCount": 0
        })
    );

    let details = send_ok(
        &app,
        empty_request("GET", &format!("/assignment_details/{}", id), None),
    )
    .await;
    assert_eq!(details["title"], json!("T"));
    assert_eq!(details["level"], json!("hard"));

    let deleted = send_ok(
        &app,
        empty_request("DELETE", &format!("/assignments/{}", id), None),
    )
    .await;
    assert_eq!(deleted, json!({"acknowledged": true, "deletedCount": 1}));

    let missing = send_ok(
        &app,
        empty_request("GET", &format!("/assignment_details/{}", id), None),
    )
    .await;
    assert_eq!(missing, Value::Null);

    test_db.teardown().await;
}

#[tokio::test]
async fn test_put_on_unknown_identifier_reports_upsert() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Open);

    let id = DocumentId::generate().to_hex();
    let result = send_ok(
        &app,
        json_request(
            "PUT",
            &format!("/assignments/{}", id),
            json!({"title": "Fresh"}),
            None,
        ),
    )
    .await;
    assert_eq!(result["matchedCount"], json!(0));
    assert_eq!(result["upsertedCount"], json!(1));
    assert_eq!(result["upsertedId"], json!(id));

    test_db.teardown().await;
}

#[tokio::test]
async fn test_malformed_identifier_is_a_client_error() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Open);

    for request in [
        empty_request("GET", "/assignment_details/not-an-id", None),
        empty_request("DELETE", "/assignments/123", None),
        json_request("PUT", "/assignments/xyz", json!({"title": "x"}), None),
        json_request(
            "PUT",
            "/submittedAssignments/xyz",
            json!({"markStatus": "completed"}),
            None,
        ),
    ] {
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["kind"], json!("invalid_identifier"));
    }

    test_db.teardown().await;
}

#[tokio::test]
async fn test_submission_flow_over_http() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Open);

    let submitted = send_ok(
        &app,
        json_request(
            "POST",
            "/submittedAssignments",
            json!({
                "status": "pending",
                "examinee": {"email": "a@x.io"},
                "title": "Algebra"
            }),
            None,
        ),
    )
    .await;
    let id = submitted["insertedId"].as_str().unwrap().to_string();

    let pending = send_ok(
        &app,
        empty_request("GET", "/submittedAssignments/pending", None),
    )
    .await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let graded = send_ok(
        &app,
        json_request(
            "PUT",
            &format!("/submittedAssignments/{}", id),
            json!({
                "obtained_mark": 8,
                "feedback": "good",
                "markStatus": "completed",
                "examinerEmail": "t@x.io"
            }),
            None,
        ),
    )
    .await;
    assert_eq!(graded["modifiedCount"], json!(1));

    let mine = send_ok(
        &app,
        empty_request("GET", "/my_submitted_assignments/a@x.io", None),
    )
    .await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["_id"], json!(id));
    assert_eq!(mine[0]["status"], json!("completed"));
    assert_eq!(mine[0]["obtained_mark"], json!(8));
    assert_eq!(mine[0]["examinerEmail"], json!("t@x.io"));
    assert_eq!(mine[0]["examinee"], json!({"email": "a@x.io"}));

    let pending = send_ok(
        &app,
        empty_request("GET", "/submittedAssignments/pending", None),
    )
    .await;
    assert_eq!(pending, json!([]));

    test_db.teardown().await;
}

#[tokio::test]
async fn test_features_are_seeded_once_and_listed_in_order() {
    let test_db = setup_test_db().await;
    let state = test_state(test_db.db(), AccessPolicyKind::Session);

    let seed_path = format!("features_{}.json", uuid::Uuid::new_v4());
    std::fs::write(
        &seed_path,
        json!([
            {"title": "Create assignments", "icon": "pen"},
            {"title": "Grade submissions", "icon": "check"}
        ])
        .to_string(),
    )
    .unwrap();

    assert_eq!(bootstrap::seed_features(&state, &seed_path).await.unwrap(), 2);
    assert_eq!(bootstrap::seed_features(&state, &seed_path).await.unwrap(), 0);
    std::fs::remove_file(&seed_path).unwrap();

    let app = test_app(test_db.db(), AccessPolicyKind::Session);
    let features = send_ok(&app, empty_request("GET", "/features", None)).await;
    let features = features.as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["title"], json!("Create assignments"));
    assert_eq!(features[1]["title"], json!("Grade submissions"));
    assert!(features[0]["_id"].is_string());

    test_db.teardown().await;
}

#[tokio::test]
async fn test_jwt_sets_http_only_token_cookie() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Open);

    let response = send(
        &app,
        json_request("POST", "/jwt", json!({"email": "a@x.io"}), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Secure"));

    assert_eq!(body_json(response).await, json!({"success": true}));

    test_db.teardown().await;
}

#[tokio::test]
async fn test_sign_out_expires_token_cookie() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Open);

    let response = send(&app, empty_request("POST", "/sign_out", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("Max-Age=0"));

    assert_eq!(body_json(response).await, json!({"success": true}));

    test_db.teardown().await;
}

#[tokio::test]
async fn test_session_policy_requires_token_for_mutations() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Session);

    // The catalog stays public
    let response = send(&app, empty_request("GET", "/assignments", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        json_request("POST", "/assignments", json!({"title": "T"}), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["kind"], json!("unauthorized"));

    let response = send(
        &app,
        empty_request("GET", "/submittedAssignments/pending", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cookie = session_cookie("grader@x.io");
    let response = send(
        &app,
        json_request("POST", "/assignments", json!({"title": "T"}), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    test_db.teardown().await;
}

#[tokio::test]
async fn test_session_policy_accepts_bearer_token() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Session);

    let cookie = session_cookie("grader@x.io");
    let token = cookie.trim_start_matches("token=");

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/submittedAssignments/pending")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    test_db.teardown().await;
}

#[tokio::test]
async fn test_session_policy_limits_examinee_listing_to_self() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Session);
    let cookie = session_cookie("a@x.io");

    let response = send(
        &app,
        empty_request("GET", "/my_submitted_assignments/a@x.io", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        empty_request("GET", "/my_submitted_assignments/b@x.io", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["kind"], json!("forbidden"));

    test_db.teardown().await;
}

#[tokio::test]
async fn test_forged_token_is_treated_as_anonymous() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Session);

    let response = send(
        &app,
        empty_request("GET", "/assignments", Some("token=forged.token.value")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        json_request(
            "POST",
            "/assignments",
            json!({"title": "T"}),
            Some("token=forged.token.value"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    test_db.teardown().await;
}

#[tokio::test]
async fn test_explicit_nulls_are_returned_over_http() {
    let test_db = setup_test_db().await;
    let app = test_app(test_db.db(), AccessPolicyKind::Open);

    let created = send_ok(
        &app,
        json_request(
            "POST",
            "/assignments",
            json!({"title": "Algebra", "level": null}),
            None,
        ),
    )
    .await;
    let id = created["insertedId"].as_str().unwrap().to_string();

    let details = send_ok(
        &app,
        empty_request("GET", &format!("/assignment_details/{}", id), None),
    )
    .await;
    assert_eq!(details, json!({"_id": id, "title": "Algebra", "level": null}));

    let submitted = send_ok(
        &app,
        json_request(
            "POST",
            "/submittedAssignments",
            json!({"status": "pending", "examinee": {"email": "a@x.io"}}),
            None,
        ),
    )
    .await;
    let submission_id = submitted["insertedId"].as_str().unwrap().to_string();

    send_ok(
        &app,
        json_request(
            "PUT",
            &format!("/submittedAssignments/{}", submission_id),
            json!({"markStatus": "completed"}),
            None,
        ),
    )
    .await;

    let completed = send_ok(
        &app,
        empty_request("GET", "/submittedAssignments/completed", None),
    )
    .await;
    assert_eq!(
        completed,
        json!([{
            "_id": submission_id,
            "status": "completed",
            "examinee": {"email": "a@x.io"},
            "obtained_mark": null,
            "feedback": null,
            "examinerEmail": null
        }])
    );

    test_db.teardown().await;
}
