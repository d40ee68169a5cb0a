use crate::render::redirect;
use crate::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
    response::Response,
};
use cookie::{Cookie, SameSite};
use domain::{DomainError, Outcome, User};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "todo_session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i32,
    pub username: String,
}

#[derive(Debug)]
struct LiveSession {
    session: Session,
    issued_at: Instant,
}

/// Signed-in sessions keyed by the opaque token stored in the cookie.
///
/// Entries older than the ttl are dropped, matching the cookie's `Max-Age`.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, LiveSession>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn start(&self, user: &User) -> Uuid {
        let token = Uuid::new_v4();
        let live = LiveSession {
            session: Session {
                user_id: user.id,
                username: user.username.clone(),
            },
            issued_at: Instant::now(),
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, live| live.issued_at.elapsed() < self.ttl);
        if sessions.len() < before {
            debug!(expired = before - sessions.len(), "purged expired sessions");
        }
        sessions.insert(token, live);
        token
    }

    pub async fn get(&self, token: &Uuid) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(live) if live.issued_at.elapsed() < self.ttl => {
                    return Some(live.session.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }

        self.sessions.write().await.remove(token);
        None
    }

    pub async fn end(&self, token: &Uuid) -> Option<Session> {
        self.sessions
            .write()
            .await
            .remove(token)
            .map(|live| live.session)
    }
}

/// Session token from the request's `Cookie` headers, if any parses.
pub fn session_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value.to_string()))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub fn session_cookie(token: Uuid, ttl: Duration) -> String {
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(max_age))
        .build()
        .to_string()
}

pub fn expired_session_cookie() -> String {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .build();
    cookie.make_removal();
    cookie.to_string()
}

/// The signed-in user of the current request.
///
/// Rejects with a redirect to the login page when there is no live session.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = match session_token(&parts.headers) {
            Some(token) => state.sessions.get(&token).await,
            None => None,
        };

        session.map(CurrentUser).ok_or_else(|| {
            redirect(
                "/login",
                Some(Outcome::failure(DomainError::Unauthenticated.notice())),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_the_session_cookie_among_others() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, token)).unwrap(),
        );
        assert_eq!(session_token(&headers), Some(token));
    }

    #[test]
    fn ignores_garbage_tokens() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("todo_session=not-a-uuid"),
        );
        assert_eq!(session_token(&headers), None);
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn cookies_are_http_only_and_scoped_to_root() {
        let set = session_cookie(Uuid::nil(), Duration::from_secs(3600));
        assert!(set.starts_with("todo_session=00000000-0000-0000-0000-000000000000"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Path=/"));
        assert!(set.contains("Max-Age=3600"));

        let expired = expired_session_cookie();
        assert!(expired.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn sessions_end() {
        let store = SessionStore::new(Duration::from_secs(3600));
        let user = User::new(1, "alice".to_string(), String::new());
        let token = store.start(&user).await;

        assert_eq!(store.get(&token).await.map(|s| s.user_id), Some(1));
        assert!(store.end(&token).await.is_some());
        assert_eq!(store.get(&token).await, None);
    }

    #[tokio::test]
    async fn expired_sessions_are_rejected_and_dropped() {
        let store = SessionStore::new(Duration::from_millis(200));
        let user = User::new(1, "alice".to_string(), String::new());
        let token = store.start(&user).await;
        assert!(store.get(&token).await.is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(store.get(&token).await, None);
        // Already gone, so ending it finds nothing
        assert_eq!(store.end(&token).await, None);
    }

    #[tokio::test]
    async fn starting_a_session_purges_stale_ones() {
        let store = SessionStore::new(Duration::from_millis(200));
        let user = User::new(1, "alice".to_string(), String::new());
        let stale = store.start(&user).await;

        tokio::time::sleep(Duration::from_millis(300)).await;
        let fresh = store.start(&user).await;

        assert_eq!(store.sessions.read().await.len(), 1);
        assert!(!store.sessions.read().await.contains_key(&stale));
        assert!(store.get(&fresh).await.is_some());
    }
}
