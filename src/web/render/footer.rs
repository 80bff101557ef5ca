use super::{RenderContext, escape};

pub const THEME_ACTION: &str = "/theme";
const CREDIT_URL: &str = "https://webuildtrades.com/";

/// Site footer with the copyright line and the theme switcher.
#[must_use]
pub fn render(ctx: &RenderContext) -> String {
    let credit = format!(
        r#"<a href="{CREDIT_URL}" target="_blank" rel="noopener noreferrer" class="text-muted-foreground hover:text-brand text-sm">We Build Trades</a>"#
    );

    format!(
        concat!(
            r#"<footer class="border-t border-border py-6 md:py-0">"#,
            r#"<div class="container mx-auto px-4 md:flex md:items-center md:justify-between md:h-16">"#,
            r#"<div class="text-sm text-muted-foreground text-center md:text-left">"#,
            "&copy; {year} {title}. All rights reserved. | Developed by {credit}",
            "</div>",
            r#"<div class="mt-4 md:mt-0 flex justify-center md:justify-end items-center space-x-6">"#,
            r#"<a href="{credit_url}" target="_blank" rel="noopener noreferrer" class="text-muted-foreground hover:text-brand text-sm">Built by We Build Trades</a>"#,
            "{switcher}",
            "</div></div></footer>"
        ),
        year = ctx.year(),
        title = escape(&ctx.site().title),
        credit = credit,
        credit_url = CREDIT_URL,
        switcher = theme_switcher(ctx),
    )
}

fn theme_switcher(ctx: &RenderContext) -> String {
    let mut buttons = String::new();
    for mode in crate::web::theme::ThemeMode::ALL {
        let pressed = if mode == ctx.theme() { "true" } else { "false" };
        buttons.push_str(&format!(
            r#"<button type="submit" name="mode" value="{}" aria-pressed="{pressed}" class="btn btn-ghost btn-sm">{}</button>"#,
            mode.as_str(),
            mode.label()
        ));
    }

    format!(
        concat!(
            r#"<form action="{action}" method="post" class="theme-switcher" aria-label="Theme">"#,
            r#"<input type="hidden" name="return_to" value="{return_to}">"#,
            "{buttons}</form>"
        ),
        action = THEME_ACTION,
        return_to = escape(&ctx.nav().current_path),
        buttons = buttons
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::render::tests::context;
    use crate::web::session::Session;

    #[test]
    fn footer_carries_year_and_credit() {
        let html = render(&context(Session::Absent, "/"));
        assert!(html.contains("&copy; 2025 Uptime Monitor. All rights reserved."));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(html.contains("Built by We Build Trades"));
    }

    #[test]
    fn switcher_marks_active_mode_and_return_path() {
        let html = render(&context(Session::Absent, "/dashboard"));
        assert!(html.contains(r#"value="system" aria-pressed="true""#));
        assert!(html.contains(r#"value="dark" aria-pressed="false""#));
        assert!(html.contains(r#"name="return_to" value="/dashboard""#));
    }
}
