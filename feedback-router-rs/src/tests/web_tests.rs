//! HTTP surface tests driven through `tower::ServiceExt::oneshot`

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use super::support::ScriptedGenerator;
use crate::classify::ClassifierMode;
use crate::web::app;
use crate::FeedbackRouter;

const BODY_LIMIT: usize = 64 * 1024;

fn form_post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_get_renders_form() {
    let generator = ScriptedGenerator::new();
    let app = app(Arc::new(FeedbackRouter::builder(generator.shared()).build()));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("<h1>Airline Experience Feedback</h1>"));
    assert!(page.contains("Share with us your experience of the latest trip."));
    assert!(page.contains("<textarea id=\"feedback\" name=\"feedback\"></textarea>"));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_post_shows_escaped_reply() {
    let generator = ScriptedGenerator::new().replies("Thanks <b>so</b> much & see you soon");
    let app = app(Arc::new(FeedbackRouter::builder(generator.shared()).build()));

    let response = app
        .oneshot(form_post("feedback=The+flight+was+great%2C+thank+you%21"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Thanks &lt;b&gt;so&lt;/b&gt; much &amp; see you soon"));
    assert!(page.contains(">The flight was great, thank you!</textarea>"));
    assert!(!page.contains("<b>so</b>"));
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn test_empty_feedback_is_unprocessable() {
    let generator = ScriptedGenerator::new().replies("unused");
    let app = app(Arc::new(FeedbackRouter::builder(generator.shared()).build()));

    for body in ["feedback=", "feedback=+++%0A", ""] {
        let response = app.clone().oneshot(form_post(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "body {:?}", body);
        let page = body_text(response).await;
        assert!(page.contains("role=\"alert\""));
    }
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_classification_failure_is_bad_gateway() {
    let generator = ScriptedGenerator::new().sentiment("no idea");
    let router = FeedbackRouter::builder(generator.shared())
        .sentiment_mode(ClassifierMode::Delegated)
        .build();
    let app = app(Arc::new(router));

    let response = app.oneshot(form_post("feedback=It+was+a+flight")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let page = body_text(response).await;
    assert!(page.contains("We could not understand your feedback right now."));
    assert!(!page.contains("no idea"));
}

#[tokio::test]
async fn test_generation_failure_is_bad_gateway() {
    // No scripted replies, so rendering fails
    let generator = ScriptedGenerator::new();
    let app = app(Arc::new(FeedbackRouter::builder(generator.shared()).build()));

    let response = app.oneshot(form_post("feedback=great")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let page = body_text(response).await;
    assert!(page.contains("We could not prepare a response right now."));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let generator = ScriptedGenerator::new().replies("unused");
    let router = FeedbackRouter::builder(generator.shared())
        .max_feedback_chars(10)
        .build();
    let app = app(Arc::new(router));

    let body = format!("feedback={}", "a".repeat(4096));
    let response = app.oneshot(form_post(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_other_paths_are_not_served() {
    let generator = ScriptedGenerator::new();
    let app = app(Arc::new(FeedbackRouter::builder(generator.shared()).build()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
