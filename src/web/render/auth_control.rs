//! Header auth control: a sign-out form for signed-in callers, a sign-in link
//! for everyone else.

use super::escape;
use crate::web::session::Session;

pub const SIGN_OUT_ACTION: &str = "/auth/sign-out";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthControl<'a> {
    SignOut { action: &'static str },
    SignIn { href: &'a str },
}

impl<'a> AuthControl<'a> {
    #[must_use]
    pub fn for_session(session: &Session, sign_in_href: &'a str) -> Self {
        match session {
            Session::Present(_) => Self::SignOut {
                action: SIGN_OUT_ACTION,
            },
            Session::Absent => Self::SignIn { href: sign_in_href },
        }
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::SignOut { action } => format!(
                concat!(
                    r#"<div class="flex items-center gap-4">"#,
                    r#"<form action="{action}" method="post">"#,
                    r#"<button type="submit" class="btn btn-outline btn-sm">Sign out</button>"#,
                    "</form></div>"
                ),
                action = escape(action)
            ),
            Self::SignIn { href } => format!(
                concat!(
                    r#"<div class="flex gap-2">"#,
                    r#"<a href="{href}" class="btn btn-outline btn-sm">Sign in</a>"#,
                    "</div>"
                ),
                href = escape(href)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::render::tests::signed_in;

    #[test]
    fn present_session_renders_sign_out_form() {
        let control = AuthControl::for_session(&signed_in(), "/sign-in");
        assert_eq!(
            control,
            AuthControl::SignOut {
                action: SIGN_OUT_ACTION
            }
        );

        let html = control.to_html();
        assert!(html.contains(r#"<form action="/auth/sign-out" method="post">"#));
        assert!(html.contains("Sign out"));
        assert!(!html.contains("Sign in"));
        assert!(!html.contains("/sign-in"));
    }

    #[test]
    fn absent_session_renders_sign_in_link_only() {
        let control = AuthControl::for_session(&Session::Absent, "/sign-in");
        assert_eq!(control, AuthControl::SignIn { href: "/sign-in" });

        let html = control.to_html();
        assert!(html.contains(r#"<a href="/sign-in""#));
        assert!(!html.contains("<form"));
        assert!(!html.contains(SIGN_OUT_ACTION));
    }

    #[test]
    fn sign_in_href_is_escaped() {
        let html = AuthControl::for_session(&Session::Absent, r#"/login?next="x""#).to_html();
        assert!(html.contains("/login?next=&quot;x&quot;"));
    }
}
