use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use virtuoso::app;

async fn post_run(payload: Value) -> (StatusCode, Value) {
    let virtuoso = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/run")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("failed to build request");

    let response = virtuoso
        .oneshot(request)
        .await
        .expect("failed to await oneshot");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to collect response body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

#[tokio::test]
async fn an_unsupported_language_is_rejected() {
    let (status, body) = post_run(json!({
        "language": "ruby",
        "userCode": "def add(a, b) a + b end",
        "testCases": [{ "input": [1, 2], "expected": 3 }]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["results"], json!([]));
    let error = body["error"].as_str().expect("error message present");
    assert!(error.contains("Unsupported language 'ruby'"));
    assert!(error.contains("Supported: javascript, typescript, python, java, cpp"));
}

#[tokio::test]
async fn an_empty_case_list_is_rejected() {
    let (status, body) = post_run(json!({
        "language": "javascript",
        "userCode": "function add(a, b) { return a + b; }",
        "testCases": []
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("No test cases provided"));
}

#[tokio::test]
async fn a_missing_entry_point_is_rejected() {
    let (status, body) = post_run(json!({
        "language": "python",
        "userCode": "value = 42",
        "testCases": [{ "input": [1], "expected": 1 }]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"]
        .as_str()
        .is_some_and(|error| error.contains("entry point")));
}

#[tokio::test]
async fn a_malformed_body_never_reaches_the_harness() {
    let virtuoso = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/run")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("this is not json"))
        .expect("failed to build request");

    let response = virtuoso
        .oneshot(request)
        .await
        .expect("failed to await oneshot");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[cfg(feature = "javascript")]
#[tokio::test]
async fn a_javascript_submission_runs_end_to_end() {
    let (status, body) = post_run(json!({
        "language": "javascript",
        "userCode": "function add(a, b) {\n    return a + b;\n}",
        "testCases": [
            { "input": [2, 3], "expected": 5 },
            { "input": [1, 1], "expected": 3 }
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true), "body: {body}");
    assert_eq!(body["results"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["results"][0]["passed"], json!(true));
    assert_eq!(body["results"][0]["actual"], json!("5"));
    assert_eq!(body["results"][1]["passed"], json!(false));
    assert_eq!(body["results"][1]["expected"], json!("3"));
    // a completed run carries no envelope-level error
    assert!(body.get("error").is_none() || body["error"].is_null());
}
