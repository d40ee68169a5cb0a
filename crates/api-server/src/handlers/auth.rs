use crate::render::{domain_error, page, redirect, rejected};
use crate::session::{expired_session_cookie, session_cookie, session_token};
use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Form,
};
use domain::{Outcome, User};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct CredentialsView {
    form: &'static str,
    username: String,
}

async fn signed_in(state: &AppState, user: &User, outcome: Outcome) -> Response {
    let token = state.sessions.start(user).await;
    (
        [(header::SET_COOKIE, session_cookie(token, state.sessions.ttl()))],
        redirect("/lists", Some(outcome)),
    )
        .into_response()
}

pub async fn login_form() -> Response {
    page(CredentialsView {
        form: "login",
        username: String::new(),
    })
}

pub async fn signup_form() -> Response {
    page(CredentialsView {
        form: "signup",
        username: String::new(),
    })
}

pub async fn sign_up(State(state): State<AppState>, Form(form): Form<CredentialsForm>) -> Response {
    let result = state
        .todo_app
        .account_service
        .sign_up(&form.username, &form.password)
        .await;

    match result {
        Ok((Some(user), outcome)) => signed_in(&state, &user, outcome).await,
        Ok((None, outcome)) => rejected(
            outcome,
            CredentialsView {
                form: "signup",
                username: form.username,
            },
        ),
        Err(e) => domain_error(e),
    }
}

pub async fn log_in(State(state): State<AppState>, Form(form): Form<CredentialsForm>) -> Response {
    match state
        .todo_app
        .account_service
        .sign_in(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            let outcome = Outcome::success(format!("Welcome back, {}!", user.username));
            signed_in(&state, &user, outcome).await
        }
        Err(e) => domain_error(e),
    }
}

pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if let Some(session) = state.sessions.end(&token).await {
            info!(user_id = session.user_id, "signed out");
        }
    }

    (
        [(header::SET_COOKIE, expired_session_cookie())],
        redirect("/login", Some(Outcome::success("You have been signed out."))),
    )
        .into_response()
}
