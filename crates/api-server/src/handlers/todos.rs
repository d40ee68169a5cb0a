use crate::render::{domain_error, is_ajax, parse_id, redirect, rejected};
use crate::session::CurrentUser;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use domain::ListDetail;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TodoForm {
    pub todo: String,
}

/// Edge encoding of a todo's completion flag; the core only sees `bool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CompletedFlag {
    #[serde(rename = "t", alias = "true")]
    Completed,
    #[serde(rename = "f", alias = "false")]
    Open,
}

impl From<CompletedFlag> for bool {
    fn from(flag: CompletedFlag) -> Self {
        flag == CompletedFlag::Completed
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletedForm {
    pub completed: CompletedFlag,
}

#[derive(Debug, Serialize)]
struct TodoFormView {
    list: ListDetail,
    todo: String,
}

fn ids(list_id: &str, todo_id: &str) -> Option<(i32, i32)> {
    Some((parse_id(list_id)?, parse_id(todo_id)?))
}

pub async fn add_todo(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(list_id): Path<String>,
    Form(form): Form<TodoForm>,
) -> Response {
    let Some(list_id) = parse_id(&list_id) else {
        return redirect("/lists", None);
    };
    let service = &state.todo_app.list_service;

    let outcome = match service.add_todo(session.user_id, list_id, &form.todo).await {
        Ok(outcome) => outcome,
        Err(e) => return domain_error(e),
    };

    if outcome.ok {
        return redirect(&format!("/lists/{}", list_id), Some(outcome));
    }

    match service.list_detail(session.user_id, list_id).await {
        Ok(list) => rejected(
            outcome,
            TodoFormView {
                list,
                todo: form.todo.trim().to_string(),
            },
        ),
        Err(e) => domain_error(e),
    }
}

pub async fn delete_todo(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path((list_id, todo_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let Some((list_id, todo_id)) = ids(&list_id, &todo_id) else {
        return redirect("/lists", None);
    };

    let outcome = match state
        .todo_app
        .list_service
        .delete_todo(session.user_id, list_id, todo_id)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return domain_error(e),
    };

    if is_ajax(&headers) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        redirect(&format!("/lists/{}", list_id), Some(outcome))
    }
}

pub async fn set_completed(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path((list_id, todo_id)): Path<(String, String)>,
    Form(form): Form<CompletedForm>,
) -> Response {
    let Some((list_id, todo_id)) = ids(&list_id, &todo_id) else {
        return redirect("/lists", None);
    };

    match state
        .todo_app
        .list_service
        .set_todo_completed(session.user_id, list_id, todo_id, form.completed.into())
        .await
    {
        Ok(outcome) => redirect(&format!("/lists/{}", list_id), Some(outcome)),
        Err(e) => domain_error(e),
    }
}

pub async fn complete_all(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(list_id): Path<String>,
) -> Response {
    let Some(list_id) = parse_id(&list_id) else {
        return redirect("/lists", None);
    };

    match state
        .todo_app
        .list_service
        .complete_all(session.user_id, list_id)
        .await
    {
        Ok(outcome) => redirect(&format!("/lists/{}", list_id), Some(outcome)),
        Err(e) => domain_error(e),
    }
}
