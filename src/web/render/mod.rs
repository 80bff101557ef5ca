//! Server-side HTML rendering. Components are plain functions of an immutable
//! [`RenderContext`]; nothing here awaits or touches the backend, so a context
//! must be fully resolved before rendering starts.

pub mod auth_control;
pub mod footer;
pub mod navigation;
pub mod shell;

pub use self::shell::compose;

use crate::web::{
    config::SiteMeta,
    session::{CurrentSession, Session},
    state::AppState,
    theme::ThemeMode,
};
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Datelike, Utc};
use std::sync::Arc;

/// Escape text for HTML element content and double-quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Navigation state derived from the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavState {
    pub current_path: String,
}

impl NavState {
    #[must_use]
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
        }
    }
}

/// Everything a component may look at while rendering one request.
#[derive(Clone, Debug)]
pub struct RenderContext {
    session: Session,
    theme: ThemeMode,
    nav: NavState,
    site: Arc<SiteMeta>,
    year: i32,
}

impl RenderContext {
    #[must_use]
    pub fn new(
        session: Session,
        theme: ThemeMode,
        nav: NavState,
        site: Arc<SiteMeta>,
        year: i32,
    ) -> Self {
        Self {
            session,
            theme,
            nav,
            site,
            year,
        }
    }

    /// Render as if the request had been for `path`, e.g. after a form post.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.nav = NavState::new(path);
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    #[must_use]
    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    #[must_use]
    pub fn site(&self) -> &SiteMeta {
        &self.site
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }
}

impl<S> FromRequestParts<S> for RenderContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_parts(parts)?;
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(Self::new(
            session,
            app.config().theme().resolve(&jar),
            NavState::new(parts.uri.path()),
            app.config().site().clone(),
            Utc::now().year(),
        ))
    }
}

/// Page content slotted into the shell. `body` is trusted markup built by the
/// page handlers; any user-derived text must go through [`escape`] first.
#[derive(Clone, Debug, Default)]
pub struct Page {
    title: Option<String>,
    body: String,
}

impl Page {
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// A fully rendered HTML document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    status: StatusCode,
    html: String,
}

impl Document {
    #[must_use]
    pub fn new(html: String) -> Self {
        Self {
            status: StatusCode::OK,
            html,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}

impl IntoResponse for Document {
    fn into_response(self) -> Response {
        (self.status, Html(self.html)).into_response()
    }
}
