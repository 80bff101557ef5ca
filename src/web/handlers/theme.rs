use crate::web::{
    state::AppState,
    theme::{THEME_COOKIE, ThemeMode},
};
use axum::{
    extract::{Extension, Form},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    mode: String,
    return_to: Option<String>,
}

/// Only relative, same-site paths are followed after a theme change.
fn local_path(target: Option<&str>) -> &str {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// `POST /theme`
pub async fn set_theme(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ThemeForm>,
) -> Response {
    let Ok(mode) = form.mode.parse::<ThemeMode>() else {
        return (StatusCode::BAD_REQUEST, "Unknown theme").into_response();
    };

    let cookie = Cookie::build((THEME_COOKIE, mode.as_str()))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(state.config().secure_cookies())
        .max_age(time::Duration::days(365))
        .build();

    (
        jar.add(cookie),
        Redirect::to(local_path(form.return_to.as_deref())),
    )
        .into_response()
}
