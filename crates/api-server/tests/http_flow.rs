use api_server::{router, AppState};
use application::TodoApp;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(
        Arc::new(TodoApp::in_memory()),
        Duration::from_secs(3600),
    ))
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

fn xhr_post(uri: &str, cookie: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::COOKIE, cookie)
        .header("x-requested-with", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// Signs up and returns the `name=value` pair to send back as a cookie.
async fn sign_up(app: &Router, username: &str) -> String {
    let response = send(app, post("/signup", &format!("username={username}&password=secret"), None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/lists");

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=3600"), "{set_cookie}");
    set_cookie.split(';').next().unwrap().to_string()
}

async fn overview(app: &Router, cookie: &str) -> Value {
    let response = send(app, get("/lists", Some(cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    json(response).await
}

#[tokio::test]
async fn protected_pages_require_a_session() {
    let app = app();
    let response = send(&app, get("/lists", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let body = json(response).await;
    assert_eq!(body["outcome"]["message"], "You must be signed in to do that.");

    let forged = "todo_session=6f1c1d2e-0000-4000-8000-000000000000";
    let response = send(&app, get("/lists", Some(forged))).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn errands_flow() {
    let app = app();
    let cookie = sign_up(&app, "alice").await;

    let body = overview(&app, &cookie).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["lists"].as_array().unwrap().len(), 0);

    let response = send(&app, post("/lists", "list_name=Errands", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(json(response).await["outcome"]["message"], "List created successfully.");

    let body = overview(&app, &cookie).await;
    let list = &body["lists"][0];
    assert_eq!(list["name"], "Errands");
    assert_eq!(list["todos_count"], 0);
    assert_eq!(list["todos_remaining"], 0);
    assert_eq!(list["completed"], false);
    let list_id = list["id"].as_i64().unwrap();

    let response = send(
        &app,
        post(&format!("/lists/{list_id}/todos"), "todo=Buy+milk", Some(&cookie)),
    )
    .await;
    assert_eq!(location(&response), format!("/lists/{list_id}"));
    assert_eq!(overview(&app, &cookie).await["lists"][0]["todos_remaining"], 1);

    let detail = json(send(&app, get(&format!("/lists/{list_id}"), Some(&cookie))).await).await;
    assert_eq!(detail["name"], "Errands");
    assert_eq!(detail["todos"][0]["name"], "Buy milk");
    let todo_id = detail["todos"][0]["id"].as_i64().unwrap();

    let response = send(
        &app,
        post(&format!("/lists/{list_id}/todos/{todo_id}"), "completed=t", Some(&cookie)),
    )
    .await;
    assert_eq!(
        json(response).await["outcome"]["message"],
        "\"Buy milk\" has been marked as completed."
    );

    let body = overview(&app, &cookie).await;
    assert_eq!(body["lists"][0]["todos_remaining"], 0);
    assert_eq!(body["lists"][0]["completed"], true);

    let response = send(
        &app,
        post(&format!("/lists/{list_id}/todos/{todo_id}"), "completed=false", Some(&cookie)),
    )
    .await;
    assert_eq!(
        json(response).await["outcome"]["message"],
        "\"Buy milk\" has been marked as not yet completed."
    );

    send(&app, post(&format!("/lists/{list_id}/todo_all"), "", Some(&cookie))).await;
    assert_eq!(overview(&app, &cookie).await["lists"][0]["completed"], true);
}

#[tokio::test]
async fn invalid_names_redisplay_the_form() {
    let app = app();
    let cookie = sign_up(&app, "alice").await;

    let response = send(&app, post("/lists", "list_name=+++", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert_eq!(body["outcome"]["ok"], false);
    assert_eq!(body["outcome"]["message"], "Name must be between 1 and 100 characters.");

    send(&app, post("/lists", "list_name=Groceries", Some(&cookie))).await;
    let response = send(&app, post("/lists", "list_name=Groceries", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert_eq!(body["outcome"]["message"], "Name already exists.");
    assert_eq!(body["list_name"], "Groceries");

    let list_id = overview(&app, &cookie).await["lists"][0]["id"].as_i64().unwrap();
    let response = send(&app, post(&format!("/lists/{list_id}/todos"), "todo=", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert_eq!(body["list"]["id"], list_id);

    let response = send(&app, post(&format!("/lists/{list_id}"), "list_name=Food", Some(&cookie))).await;
    assert_eq!(location(&response), format!("/lists/{list_id}"));
    let edit = json(send(&app, get(&format!("/lists/{list_id}/edit"), Some(&cookie))).await).await;
    assert_eq!(edit["list"]["name"], "Food");
}

#[tokio::test]
async fn rejected_rename_echoes_the_submitted_name() {
    let app = app();
    let cookie = sign_up(&app, "alice").await;
    send(&app, post("/lists", "list_name=Groceries", Some(&cookie))).await;
    send(&app, post("/lists", "list_name=Chores", Some(&cookie))).await;
    let chores = overview(&app, &cookie).await["lists"]
        .as_array()
        .unwrap()
        .iter()
        .find(|list| list["name"] == "Chores")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let response = send(
        &app,
        post(&format!("/lists/{chores}"), "list_name=+Groceries+", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert_eq!(body["outcome"]["message"], "Name already exists.");
    assert_eq!(body["list_name"], "Groceries");
    assert_eq!(body["list"]["name"], "Chores");

    let response = send(&app, post(&format!("/lists/{chores}"), "list_name=", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert_eq!(body["outcome"]["message"], "Name must be between 1 and 100 characters.");
    assert_eq!(body["list_name"], "");
}

#[tokio::test]
async fn new_list_page_shows_an_empty_form() {
    let app = app();
    let response = send(&app, get("/lists/new", None)).await;
    assert_eq!(location(&response), "/login");

    let cookie = sign_up(&app, "alice").await;
    let response = send(&app, get("/lists/new", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["list_name"], "");
    assert_eq!(body["outcome"], Value::Null);
}

#[tokio::test]
async fn deleting_a_todo_redirects_to_its_list() {
    let app = app();
    let cookie = sign_up(&app, "alice").await;
    send(&app, post("/lists", "list_name=Chores", Some(&cookie))).await;
    let list_id = overview(&app, &cookie).await["lists"][0]["id"].as_i64().unwrap();
    send(&app, post(&format!("/lists/{list_id}/todos"), "todo=Dishes", Some(&cookie))).await;

    let response = send(
        &app,
        post(&format!("/lists/{list_id}/todos/1/delete"), "", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/lists/{list_id}"));
    assert_eq!(
        json(response).await["outcome"]["message"],
        "Todo item was successfully deleted."
    );
    assert_eq!(overview(&app, &cookie).await["lists"][0]["todos_count"], 0);
}

#[tokio::test]
async fn ajax_deletes_skip_the_redirect() {
    let app = app();
    let cookie = sign_up(&app, "alice").await;
    send(&app, post("/lists", "list_name=Chores", Some(&cookie))).await;
    let list_id = overview(&app, &cookie).await["lists"][0]["id"].as_i64().unwrap();
    send(&app, post(&format!("/lists/{list_id}/todos"), "todo=Dishes", Some(&cookie))).await;

    let response = send(&app, xhr_post(&format!("/lists/{list_id}/todos/1/delete"), &cookie)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, xhr_post(&format!("/lists/{list_id}/delete"), &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"/lists");

    assert!(overview(&app, &cookie).await["lists"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn foreign_lists_are_not_found() {
    let app = app();
    let alice = sign_up(&app, "alice").await;
    let mallory = sign_up(&app, "mallory").await;
    send(&app, post("/lists", "list_name=Errands", Some(&alice))).await;
    let list_id = overview(&app, &alice).await["lists"][0]["id"].as_i64().unwrap();

    let response = send(&app, post(&format!("/lists/{list_id}/delete"), "", Some(&mallory))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/lists");
    assert_eq!(
        json(response).await["outcome"]["message"],
        "The specified list was not found."
    );

    let response = send(&app, get(&format!("/lists/{list_id}"), Some(&mallory))).await;
    assert_eq!(location(&response), "/lists");
    assert_eq!(overview(&app, &alice).await["lists"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn odd_paths_go_back_to_the_overview() {
    let app = app();
    let cookie = sign_up(&app, "alice").await;

    for uri in ["/", "/lists/", "/nowhere", "/lists/abc"] {
        let response = send(&app, get(uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/lists", "{uri}");
    }
}

#[tokio::test]
async fn login_and_signout() {
    let app = app();
    let first = sign_up(&app, "alice").await;

    let response = send(&app, post("/login", "username=alice&password=nope", None)).await;
    assert_eq!(location(&response), "/login");
    assert_eq!(
        json(response).await["outcome"]["message"],
        "Invalid username or password."
    );

    let response = send(&app, post("/login", "username=alice&password=secret", None)).await;
    assert_eq!(location(&response), "/lists");
    assert!(response.headers().contains_key(header::SET_COOKIE));

    let response = send(&app, get("/signout", Some(&first))).await;
    assert_eq!(location(&response), "/login");
    let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let response = send(&app, get("/lists", Some(&first))).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn signup_rejects_bad_usernames() {
    let app = app();
    let response = send(&app, post("/signup", "username=bad+name&password=secret", None)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert_eq!(body["form"], "signup");
    assert_eq!(body["outcome"]["ok"], false);

    sign_up(&app, "alice").await;
    let response = send(&app, post("/signup", "username=alice&password=x", None)).await;
    assert_eq!(
        json(response).await["outcome"]["message"],
        "Username is already taken."
    );
}

#[tokio::test]
async fn health() {
    let response = send(&app(), get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["status"], "healthy");
}
