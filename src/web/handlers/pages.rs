//! Page content. Pages only produce the body that the shell wraps; they never
//! decide the auth control themselves.

use crate::web::{
    identity::Identity,
    render::{Document, Page, RenderContext, compose, escape},
    session::Session,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

const FEATURES: [(&str, &str); 3] = [
    (
        "Website uptime",
        "Know the moment a site stops answering, before your customers do.",
    ),
    (
        "SSL certificates",
        "Get ahead of expiring or misconfigured certificates.",
    ),
    (
        "Domain names",
        "Never lose a domain to a missed renewal date.",
    ),
];

fn home_page(ctx: &RenderContext) -> Page {
    let mut cards = String::new();
    for (title, text) in FEATURES {
        cards.push_str(&format!(
            r#"<div class="rounded-lg border border-border p-6"><h2 class="font-semibold">{title}</h2><p class="text-sm text-muted-foreground">{text}</p></div>"#
        ));
    }

    Page::new(format!(
        concat!(
            r#"<section class="container mx-auto px-4 py-16 text-center">"#,
            r#"<h1 class="text-4xl font-bold">{title}</h1>"#,
            r#"<p class="mt-4 text-muted-foreground">{description}</p>"#,
            r#"<div class="mt-10 grid gap-6 md:grid-cols-3">{cards}</div>"#,
            "</section>"
        ),
        title = escape(&ctx.site().title),
        description = escape(&ctx.site().description),
        cards = cards
    ))
}

fn dashboard_page(identity: &Identity) -> Page {
    Page::new(format!(
        concat!(
            r#"<section class="container mx-auto px-4 py-16">"#,
            r#"<h1 class="text-2xl font-semibold">Dashboard</h1>"#,
            r#"<p class="mt-2 text-muted-foreground">Signed in as {label}</p>"#,
            "</section>"
        ),
        label = escape(identity.label())
    ))
    .with_title("Dashboard")
}

pub(crate) fn sign_out_failed_page() -> Page {
    Page::new(concat!(
        r#"<section class="container mx-auto px-4 py-16" role="alert">"#,
        r#"<h1 class="text-2xl font-semibold">Sign-out did not complete</h1>"#,
        r#"<p class="mt-2 text-muted-foreground">You are still signed in. Please try again in a moment.</p>"#,
        "</section>"
    ))
    .with_title("Sign-out failed")
}

fn not_found_page() -> Page {
    Page::new(concat!(
        r#"<section class="container mx-auto px-4 py-16 text-center">"#,
        r#"<h1 class="text-2xl font-semibold">Page not found</h1>"#,
        r#"<p class="mt-2"><a href="/">Back to home</a></p>"#,
        "</section>"
    ))
    .with_title("Not found")
}

pub async fn home(ctx: RenderContext) -> Document {
    compose(&ctx, &home_page(&ctx))
}

/// Signed-in only. Anonymous callers are sent to the sign-in entry point.
pub async fn dashboard(ctx: RenderContext) -> Response {
    match ctx.session() {
        Session::Present(identity) => compose(&ctx, &dashboard_page(identity)).into_response(),
        Session::Absent => Redirect::to(&ctx.site().sign_in_href).into_response(),
    }
}

pub async fn not_found(ctx: RenderContext) -> Document {
    compose(&ctx, &not_found_page()).with_status(StatusCode::NOT_FOUND)
}
