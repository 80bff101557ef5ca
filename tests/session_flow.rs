#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tower::ServiceExt;
use uptime_web::web::{
    AppState, AuthError, IdentityBackend, WebConfig,
    identity::{Credentials, Identity},
    router,
};

const PUBLIC: &str = "https://uptime.example.com";
const TOKEN: &str = "valid-token";

#[derive(Default)]
struct MemoryBackend {
    lookups: AtomicUsize,
    invalidations: AtomicUsize,
    unreachable: bool,
    refuse_logout: bool,
    revoked: Mutex<Vec<String>>,
}

impl MemoryBackend {
    fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    fn refusing_logout() -> Self {
        Self {
            refuse_logout: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl IdentityBackend for MemoryBackend {
    async fn lookup(&self, credentials: &Credentials) -> Result<Option<Identity>, AuthError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(AuthError::BackendUnavailable("connection refused".into()));
        }
        let revoked = self.revoked.lock().unwrap();
        if credentials.expose() == TOKEN && !revoked.iter().any(|t| t == TOKEN) {
            Ok(Some(Identity::new("u1").with_email("u1@example.com")))
        } else {
            Ok(None)
        }
    }

    async fn invalidate(&self, credentials: &Credentials) -> Result<(), AuthError> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        if self.refuse_logout || self.unreachable {
            return Err(AuthError::SignOutFailed("503 from backend".into()));
        }
        self.revoked
            .lock()
            .unwrap()
            .push(credentials.expose().to_string());
        Ok(())
    }
}

fn app(backend: Arc<MemoryBackend>) -> Router {
    let config = WebConfig::new(PUBLIC, "https://auth.example.com").unwrap();
    router(Arc::new(AppState::new(config, backend)))
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("uptime_session={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn sign_out(token: Option<&str>, origin: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/auth/sign-out")
        .header(header::ORIGIN, origin);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("uptime_session={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> (StatusCode, HeaderMap, String) {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(ToString::to_string))
        .collect()
}

#[tokio::test]
async fn anonymous_request_renders_sign_in_without_backend_call() {
    let backend = Arc::new(MemoryBackend::default());
    let response = app(backend.clone()).oneshot(get("/", None)).await.unwrap();
    let (status, _, html) = body_text(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"href="/sign-in""#));
    assert!(html.contains("Sign in"));
    assert!(!html.contains("Sign out"));
    assert!(!html.contains(r#"href="/dashboard""#));
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_session_renders_sign_out_with_one_lookup() {
    let backend = Arc::new(MemoryBackend::default());
    let response = app(backend.clone())
        .oneshot(get("/", Some(TOKEN)))
        .await
        .unwrap();
    let (status, _, html) = body_text(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"action="/auth/sign-out""#));
    assert!(html.contains("Sign out"));
    assert!(!html.contains(r#"href="/sign-in""#));
    assert!(html.contains(r#"href="/dashboard""#));
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bearer_header_is_accepted() {
    let backend = Arc::new(MemoryBackend::default());
    let request = Request::builder()
        .uri("/")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (_, _, html) = body_text(app(backend).oneshot(request).await.unwrap()).await;
    assert!(html.contains("Sign out"));
}

#[tokio::test]
async fn unknown_token_renders_as_anonymous() {
    let backend = Arc::new(MemoryBackend::default());
    let (status, _, html) =
        body_text(app(backend).oneshot(get("/", Some("stale"))).await.unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Sign in"));
    assert!(!html.contains("Sign out"));
}

#[tokio::test]
async fn unreachable_backend_fails_closed() {
    let backend = Arc::new(MemoryBackend::unreachable());
    let (status, _, html) = body_text(
        app(backend.clone())
            .oneshot(get("/", Some(TOKEN)))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Sign in"));
    assert!(!html.contains("Sign out"));
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn sign_out_clears_cookie_and_redirects_home() {
    let backend = Arc::new(MemoryBackend::default());
    let app = app(backend.clone());

    let response = app
        .clone()
        .oneshot(sign_out(Some(TOKEN), PUBLIC))
        .await
        .unwrap();
    let (status, headers, _) = body_text(response).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/");
    assert!(
        set_cookies(&headers)
            .iter()
            .any(|c| c.starts_with("uptime_session=") && c.contains("Max-Age=0"))
    );
    assert_eq!(backend.invalidations.load(Ordering::SeqCst), 1);
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 0);

    // The next render with the old token no longer shows a session.
    let (_, _, html) = body_text(app.oneshot(get("/", Some(TOKEN))).await.unwrap()).await;
    assert!(html.contains("Sign in"));
}

#[tokio::test]
async fn failed_sign_out_keeps_session_visible() {
    let backend = Arc::new(MemoryBackend::refusing_logout());
    let response = app(backend.clone())
        .oneshot(sign_out(Some(TOKEN), PUBLIC))
        .await
        .unwrap();
    let (status, headers, html) = body_text(response).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(headers.get(header::LOCATION).is_none());
    assert!(
        set_cookies(&headers)
            .iter()
            .all(|c| !c.starts_with("uptime_session="))
    );
    assert!(html.contains("Sign-out did not complete"));
    assert!(html.contains("Sign out"));
    assert!(!html.contains(r#"href="/sign-in""#));
    assert_eq!(backend.invalidations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cross_origin_sign_out_is_forbidden() {
    let backend = Arc::new(MemoryBackend::default());
    let response = app(backend.clone())
        .oneshot(sign_out(Some(TOKEN), "https://evil.example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(backend.invalidations.load(Ordering::SeqCst), 0);
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_sign_out_with_unreachable_backend_keeps_sign_out_control() {
    let backend = Arc::new(MemoryBackend::unreachable());
    let response = app(backend.clone())
        .oneshot(sign_out(Some(TOKEN), PUBLIC))
        .await
        .unwrap();
    let (status, headers, html) = body_text(response).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(headers.get(header::LOCATION).is_none());
    assert!(
        set_cookies(&headers)
            .iter()
            .all(|c| !c.starts_with("uptime_session="))
    );
    assert!(html.contains("You are still signed in"));
    assert!(html.contains(r#"action="/auth/sign-out""#));
    assert!(!html.contains(r#"href="/sign-in""#));
    assert_eq!(backend.invalidations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn sign_out_without_session_redirects_home() {
    let backend = Arc::new(MemoryBackend::default());
    let response = app(backend.clone())
        .oneshot(sign_out(None, PUBLIC))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    assert_eq!(backend.invalidations.load(Ordering::SeqCst), 0);
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeated_sign_out_is_safe() {
    let backend = Arc::new(MemoryBackend::default());
    let app = app(backend.clone());

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(sign_out(Some(TOKEN), PUBLIC))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    assert_eq!(backend.invalidations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn sign_out_is_post_only() {
    let backend = Arc::new(MemoryBackend::default());
    let response = app(backend.clone())
        .oneshot(get("/auth/sign-out", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(backend.invalidations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn dashboard_requires_session() {
    let backend = Arc::new(MemoryBackend::default());
    let app = app(backend);

    let response = app.clone().oneshot(get("/dashboard", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/sign-in");

    let (status, _, html) =
        body_text(app.oneshot(get("/dashboard", Some(TOKEN))).await.unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Signed in as u1@example.com"));
    assert!(html.contains(r#"aria-current="page""#));
}

#[tokio::test]
async fn unknown_route_renders_not_found_shell() {
    let backend = Arc::new(MemoryBackend::default());
    let (status, _, html) =
        body_text(app(backend).oneshot(get("/nope", None)).await.unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Page not found"));
    assert!(html.contains("Sign in"));
}

#[tokio::test]
async fn theme_choice_is_stored_and_rendered() {
    let backend = Arc::new(MemoryBackend::default());
    let app = app(backend);

    let request = Request::builder()
        .method("POST")
        .uri("/theme")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("mode=dark&return_to=%2Fdashboard"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/dashboard"
    );
    assert!(
        set_cookies(response.headers())
            .iter()
            .any(|c| c.starts_with("theme=dark"))
    );

    let request = Request::builder()
        .uri("/")
        .header(header::COOKIE, "theme=dark")
        .body(Body::empty())
        .unwrap();
    let (_, _, html) = body_text(app.oneshot(request).await.unwrap()).await;
    assert!(html.contains(r#"class="dark""#));
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let backend = Arc::new(MemoryBackend::default());
    let response = app(backend).oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers().get(header::X_FRAME_OPTIONS).unwrap(),
        "DENY"
    );
    assert_eq!(
        response
            .headers()
            .get(header::X_CONTENT_TYPE_OPTIONS)
            .unwrap(),
        "nosniff"
    );
}
