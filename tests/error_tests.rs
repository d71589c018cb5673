use axum::{http::StatusCode, response::IntoResponse};
use fundmatch::error::AppError;
use http_body_util::BodyExt;
use serde_json::Value;

// Test for AppError Display implementation
#[test]
fn test_app_error_display() {
    let error1 = AppError::Validation("refresh cooldown active".to_string());
    assert_eq!(error1.to_string(), "Validation error: refresh cooldown active");

    let error2 = AppError::Conflict("match already exists".to_string());
    assert_eq!(error2.to_string(), "Conflict: match already exists");

    let error3 = AppError::NotFound("Funding request not found".to_string());
    assert_eq!(error3.to_string(), "Not found: Funding request not found");

    let error4 = AppError::Dependency("store unreachable".to_string());
    assert_eq!(error4.to_string(), "Dependency failure: store unreachable");
}

// Test for AppError IntoResponse implementation
#[tokio::test]
async fn test_app_error_into_response() {
    let error = AppError::Validation("bad transition".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["error"], "Validation error: bad transition");

    let error = AppError::Conflict("duplicate match".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let error = AppError::NotFound("Match not found".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["error"], "Not found: Match not found");

    let error = AppError::Dependency("store write failed".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error = AppError::Internal("unexpected".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
