use crate::web::{
    gateway::{LANDING_ROUTE, SignOutCommand},
    handlers::pages::sign_out_failed_page,
    identity::Identity,
    render::{RenderContext, compose},
    session::{RequestContext, Session},
    state::AppState,
};
use axum::{
    extract::{Extension, FromRequestParts, Request},
    http::{
        HeaderMap, StatusCode,
        header::{ORIGIN, REFERER},
        request::Parts,
    },
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::sync::Arc;
use tracing::{error, warn};
use url::Url;

/// Sign-out is a state change, so only same-origin form posts are accepted.
fn same_origin(headers: &HeaderMap, public_origin: &str) -> bool {
    if let Some(origin) = headers.get(ORIGIN).and_then(|v| v.to_str().ok()) {
        return origin.trim_end_matches('/') == public_origin;
    }

    headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| Url::parse(referer).ok())
        .is_some_and(|referer| referer.origin().ascii_serialization() == public_origin)
}

/// Shell for a sign-out the backend did not confirm. The caller still holds
/// their token, so they are shown as signed in even when the backend could
/// not vouch for it.
async fn failed_sign_out(parts: &mut Parts, request: &RequestContext) -> Response {
    let ctx = match RenderContext::from_request_parts(parts, &()).await {
        Ok(ctx) => ctx,
        Err(status) => return status.into_response(),
    };

    let ctx = match (ctx.session(), request.credentials()) {
        (Session::Absent, Some(_)) => ctx.with_session(Session::Present(Identity::unverified())),
        _ => ctx,
    };

    compose(&ctx.with_path(LANDING_ROUTE), &sign_out_failed_page())
        .with_status(StatusCode::BAD_GATEWAY)
        .into_response()
}

/// `POST /auth/sign-out`
///
/// On success the session cookie is cleared and the browser is sent to the
/// landing page. On failure nothing is cleared and the caller keeps seeing the
/// sign-out control.
pub async fn sign_out(Extension(state): Extension<Arc<AppState>>, request: Request) -> Response {
    let (mut parts, _body) = request.into_parts();

    if !same_origin(&parts.headers, state.config().public_origin()) {
        warn!("Rejected cross-origin sign-out");
        return StatusCode::FORBIDDEN.into_response();
    }

    let request = RequestContext::from_parts(&parts, state.config().session_cookie());

    match state
        .gateway()
        .sign_out(SignOutCommand::from_request(&request))
        .await
    {
        Ok(_) => {
            let removal = Cookie::build(state.config().session_cookie().to_string())
                .path("/")
                .build();
            let jar = CookieJar::from_headers(&parts.headers);
            (jar.remove(removal), Redirect::to(LANDING_ROUTE)).into_response()
        }
        Err(err) => {
            error!("Sign-out failed: {err}");
            failed_sign_out(&mut parts, &request).await
        }
    }
}
