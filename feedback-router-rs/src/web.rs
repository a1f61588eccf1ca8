//! HTML form surface
//!
//! `GET /` serves the feedback form; `POST /` routes the submitted text and
//! renders the same page with the reply or an error message.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::RouterError;
use crate::router::FeedbackRouter;

const PAGE_TITLE: &str = "Airline Experience Feedback";
const FORM_PROMPT: &str = "Share with us your experience of the latest trip.";

// A form-encoded character can take up to 12 bytes (4 UTF-8 bytes, each %XX)
const BYTES_PER_ENCODED_CHAR: usize = 12;
const FORM_OVERHEAD_BYTES: usize = 1024;

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub feedback: String,
}

/// Build the axum application around a shared router
pub fn app(router: Arc<FeedbackRouter>) -> Router {
    let body_limit = form_body_limit(router.max_feedback_chars());

    Router::new()
        .route("/", get(show_form).post(submit_feedback))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(router)
}

/// Largest form body that can still carry `max_chars` characters of feedback
pub fn form_body_limit(max_chars: usize) -> usize {
    max_chars
        .saturating_mul(BYTES_PER_ENCODED_CHAR)
        .saturating_add(FORM_OVERHEAD_BYTES)
}

async fn show_form() -> Html<String> {
    Html(render_page("", None))
}

async fn submit_feedback(
    State(router): State<Arc<FeedbackRouter>>,
    Form(form): Form<FeedbackForm>,
) -> Response {
    match router.route(&form.feedback).await {
        Ok(response) => Html(render_page(
            &form.feedback,
            Some(Outcome::Reply(&response.text)),
        ))
        .into_response(),
        Err(err) => {
            let status = status_for(&err);
            if err.is_user_error() {
                log::warn!("Rejected feedback: {}", err);
            } else {
                log::error!("Feedback routing failed: {}", err);
            }
            (
                status,
                Html(render_page(&form.feedback, Some(Outcome::Error(&user_message(&err))))),
            )
                .into_response()
        }
    }
}

/// HTTP status for a failed routing run
pub fn status_for(err: &RouterError) -> StatusCode {
    match err {
        RouterError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RouterError::Classification { .. } | RouterError::Generation(_) => StatusCode::BAD_GATEWAY,
        RouterError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn user_message(err: &RouterError) -> String {
    match err {
        RouterError::Validation(message) => message.clone(),
        RouterError::Classification { .. } => {
            "We could not understand your feedback right now. Please try again.".to_string()
        }
        RouterError::Generation(_) | RouterError::Configuration(_) => {
            "We could not prepare a response right now. Please try again later.".to_string()
        }
    }
}

enum Outcome<'a> {
    Reply(&'a str),
    Error(&'a str),
}

fn render_page(feedback: &str, outcome: Option<Outcome<'_>>) -> String {
    let result = match outcome {
        Some(Outcome::Reply(text)) => format!(
            "<section class=\"reply\"><p>{}</p></section>",
            escape_html(text)
        ),
        Some(Outcome::Error(message)) => format!(
            "<section class=\"error\" role=\"alert\"><p>{}</p></section>",
            escape_html(message)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
textarea {{ width: 100%; min-height: 8rem; }}
section p {{ white-space: pre-wrap; }}
.error {{ color: #a00; }}
</style>
</head>
<body>
<h1>{title}</h1>
<form method="post" action="/">
<label for="feedback">{prompt}</label>
<textarea id="feedback" name="feedback">{feedback}</textarea>
<button type="submit">Submit</button>
</form>
{result}
</body>
</html>
"#,
        title = PAGE_TITLE,
        prompt = FORM_PROMPT,
        feedback = escape_html(feedback),
        result = result,
    )
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
