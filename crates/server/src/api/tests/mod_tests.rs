use super::*;

#[test]
fn error_codes_map_to_documented_statuses() {
    assert_eq!(status_for(ErrorCode::Validation), StatusCode::BAD_REQUEST);
    assert_eq!(status_for(ErrorCode::NotFound), StatusCode::NOT_FOUND);
    assert_eq!(
        status_for(ErrorCode::Internal),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn reject_keeps_error_body_intact() {
    let (status, Json(body)) = reject(
        ApiError::not_found("todo ids not found: 9")
            .with_details(serde_json::json!({ "missing_ids": [9] })),
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.missing_ids(), vec![TodoId(9)]);
}
