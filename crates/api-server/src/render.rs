//! The rendering boundary: every handler ends in either a JSON page or a
//! `303 See Other` redirect, both carrying the request's outcome explicitly.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use domain::{DomainError, Outcome};
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub outcome: Option<Outcome>,
    #[serde(flatten)]
    pub view: T,
}

#[derive(Debug, Serialize)]
struct RedirectBody<'a> {
    location: &'a str,
    outcome: Option<Outcome>,
}

pub fn page<T: Serialize>(view: T) -> Response {
    Json(Page {
        outcome: None,
        view,
    })
    .into_response()
}

/// Redisplay a form after a rejected submission.
pub fn rejected<T: Serialize>(outcome: Outcome, view: T) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(Page {
            outcome: Some(outcome),
            view,
        }),
    )
        .into_response()
}

pub fn redirect(location: &str, outcome: Option<Outcome>) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location.to_string())],
        Json(RedirectBody { location, outcome }),
    )
        .into_response()
}

pub fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == "XMLHttpRequest")
}

/// Map a service error onto the page flow.
pub fn domain_error(e: DomainError) -> Response {
    match e {
        DomainError::ListNotFound(_) | DomainError::TodoNotFound(_) => {
            warn!(error = %e, "requested resource not found");
            redirect("/lists", Some(Outcome::failure(e.notice())))
        }
        DomainError::InvalidCredentials | DomainError::Unauthenticated => {
            redirect("/login", Some(Outcome::failure(e.notice())))
        }
        DomainError::Validation(_) | DomainError::UsernameTaken(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(Page {
                outcome: Some(Outcome::failure(e.notice())),
                view: serde_json::Map::new(),
            }),
        )
            .into_response(),
        DomainError::InvalidCounts { .. } | DomainError::Repository(_) | DomainError::Hashing(_) => {
            error!(error = %e, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.notice()).into_response()
        }
    }
}

/// Ids that are not plain integers are treated like unknown ids.
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|id| id.to_string() == raw)
}
