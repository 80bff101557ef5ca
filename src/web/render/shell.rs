//! Top-level document shell.
//!
//! Order is fixed: navigation, page content, auth control, footer. The same
//! context and page always produce the same bytes.

use super::{
    Document, Page, RenderContext, auth_control::AuthControl, escape, footer, navigation,
};

#[must_use]
pub fn compose(ctx: &RenderContext, page: &Page) -> Document {
    let site = ctx.site();
    let theme = ctx.theme();

    let title = match page.title() {
        Some(title) => format!("{} | {}", escape(title), escape(&site.title)),
        None => escape(&site.title),
    };

    let html_class = theme
        .html_class()
        .map_or_else(String::new, |class| format!(r#" class="{class}""#));

    let canonical = format!("{}{}", site.base_url, ctx.nav().current_path);

    let auth = AuthControl::for_session(ctx.session(), &site.sign_in_href);

    let html = format!(
        concat!(
            "<!DOCTYPE html>",
            r#"<html lang="en"{html_class} data-theme="{theme}">"#,
            "<head>",
            r#"<meta charset="utf-8">"#,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#,
            r#"<meta name="color-scheme" content="{color_scheme}">"#,
            "<title>{title}</title>",
            r#"<meta name="description" content="{description}">"#,
            r#"<link rel="canonical" href="{canonical}">"#,
            "</head>",
            r#"<body class="bg-background min-h-screen flex flex-col">"#,
            "{navigation}",
            r#"<main class="flex-1 flex flex-col items-center justify-center">{content}</main>"#,
            r#"<section class="auth-control container mx-auto px-4 py-4 flex justify-end" aria-label="Account">{auth}</section>"#,
            "{footer}",
            "</body></html>"
        ),
        html_class = html_class,
        theme = theme.as_str(),
        color_scheme = theme.color_scheme(),
        title = title,
        description = escape(&site.description),
        canonical = escape(&canonical),
        navigation = navigation::render(ctx),
        content = page.body(),
        auth = auth.to_html(),
        footer = footer::render(ctx),
    );

    Document::new(html)
}
