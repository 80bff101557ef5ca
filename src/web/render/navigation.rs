use super::{RenderContext, escape};
use crate::web::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
}

const HOME: NavItem = NavItem {
    href: "/",
    label: "Home",
};

const DASHBOARD: NavItem = NavItem {
    href: "/dashboard",
    label: "Dashboard",
};

/// Links shown for a session. Signed-in pages are only linked when signed in;
/// the routes themselves still check the session.
#[must_use]
pub fn items(session: &Session) -> Vec<NavItem> {
    match session {
        Session::Present(_) => vec![HOME, DASHBOARD],
        Session::Absent => vec![HOME],
    }
}

#[must_use]
pub fn render(ctx: &RenderContext) -> String {
    let mut links = String::new();
    for item in items(ctx.session()) {
        let current = if item.href == ctx.nav().current_path {
            r#" aria-current="page""#
        } else {
            ""
        };
        links.push_str(&format!(
            r#"<li><a href="{}" class="nav-link"{current}>{}</a></li>"#,
            item.href, item.label
        ));
    }

    format!(
        concat!(
            r#"<header class="w-full border-b border-border">"#,
            r#"<nav class="container mx-auto px-4 h-16 flex items-center justify-between">"#,
            r#"<a href="/" class="font-semibold">{title}</a>"#,
            r#"<ul class="flex items-center gap-6">{links}</ul>"#,
            "</nav></header>"
        ),
        title = escape(&ctx.site().title),
        links = links
    )
}
