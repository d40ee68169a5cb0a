use crate::render::{domain_error, is_ajax, page, parse_id, redirect, rejected};
use crate::session::CurrentUser;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use domain::{ListOverview, TodoList};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ListNameForm {
    pub list_name: String,
}

#[derive(Debug, Serialize)]
struct OverviewView {
    username: String,
    lists: Vec<ListOverview>,
}

#[derive(Debug, Serialize)]
struct NewListView {
    list_name: String,
}

#[derive(Debug, Serialize)]
struct EditListView {
    list: TodoList,
    list_name: String,
}

fn list_path(list_id: i32) -> String {
    format!("/lists/{}", list_id)
}

pub async fn overview(State(state): State<AppState>, CurrentUser(session): CurrentUser) -> Response {
    match state.todo_app.list_service.overview(session.user_id).await {
        Ok(lists) => page(OverviewView {
            username: session.username,
            lists,
        }),
        Err(e) => domain_error(e),
    }
}

pub async fn new_list_form(CurrentUser(_session): CurrentUser) -> Response {
    page(NewListView {
        list_name: String::new(),
    })
}

pub async fn create_list(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Form(form): Form<ListNameForm>,
) -> Response {
    let outcome = match state
        .todo_app
        .list_service
        .create_list(session.user_id, &form.list_name)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return domain_error(e),
    };

    if outcome.ok {
        redirect("/lists", Some(outcome))
    } else {
        rejected(
            outcome,
            NewListView {
                list_name: form.list_name.trim().to_string(),
            },
        )
    }
}

pub async fn show_list(
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
        .list_detail(session.user_id, list_id)
        .await
    {
        Ok(detail) => page(detail),
        Err(e) => domain_error(e),
    }
}

pub async fn edit_list(
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
        .find_list(session.user_id, list_id)
        .await
    {
        Ok(list) => {
            let list_name = list.name.clone();
            page(EditListView { list, list_name })
        }
        Err(e) => domain_error(e),
    }
}

pub async fn rename_list(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(list_id): Path<String>,
    Form(form): Form<ListNameForm>,
) -> Response {
    let Some(list_id) = parse_id(&list_id) else {
        return redirect("/lists", None);
    };
    let service = &state.todo_app.list_service;

    let outcome = match service
        .rename_list(session.user_id, list_id, &form.list_name)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return domain_error(e),
    };

    if outcome.ok {
        return redirect(&list_path(list_id), Some(outcome));
    }

    match service.find_list(session.user_id, list_id).await {
        Ok(list) => rejected(
            outcome,
            EditListView {
                list,
                list_name: form.list_name.trim().to_string(),
            },
        ),
        Err(e) => domain_error(e),
    }
}

pub async fn delete_list(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(list_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(list_id) = parse_id(&list_id) else {
        return redirect("/lists", None);
    };

    let outcome = match state
        .todo_app
        .list_service
        .delete_list(session.user_id, list_id)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return domain_error(e),
    };

    if is_ajax(&headers) {
        info!(list_id, "list deleted via xhr");
        (StatusCode::OK, "/lists").into_response()
    } else {
        redirect("/lists", Some(outcome))
    }
}
