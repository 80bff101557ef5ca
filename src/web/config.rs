//! Runtime configuration for the web front end, built once at startup from the
//! CLI arguments. Secrets (the identity API key) stay in `SecretString`.

use crate::web::theme::{ThemeConfig, ThemeMode};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use url::Url;

pub const SITE_TITLE: &str = "Uptime Monitor";
pub const SITE_DESCRIPTION: &str = "Monitor your websites, SSL certificates, and domain names";

/// Static document metadata shared by every rendered page.
#[derive(Debug, Clone)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
    pub base_url: String,
    pub sign_in_href: String,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    public_origin: String,
    identity_url: Url,
    identity_api_key: Option<SecretString>,
    identity_timeout: Duration,
    session_cookie: String,
    secure_cookies: bool,
    site: Arc<SiteMeta>,
    theme: ThemeConfig,
}

impl WebConfig {
    /// # Errors
    /// Returns an error if either URL is invalid or lacks a host.
    pub fn new(public_url: &str, identity_url: &str) -> Result<Self> {
        let public = Url::parse(public_url)
            .with_context(|| format!("Invalid public URL: {public_url}"))?;
        let public_origin = origin_of(&public)?;

        let identity_url = Url::parse(identity_url)
            .with_context(|| format!("Invalid identity backend URL: {identity_url}"))?;
        if identity_url.host_str().is_none() {
            return Err(anyhow!(
                "Identity backend URL must include a host: {identity_url}"
            ));
        }

        Ok(Self {
            secure_cookies: public.scheme() == "https",
            site: Arc::new(SiteMeta {
                title: SITE_TITLE.to_string(),
                description: SITE_DESCRIPTION.to_string(),
                base_url: public_origin.clone(),
                sign_in_href: "/sign-in".to_string(),
            }),
            public_origin,
            identity_url,
            identity_api_key: None,
            identity_timeout: Duration::from_secs(5),
            session_cookie: "uptime_session".to_string(),
            theme: ThemeConfig::default(),
        })
    }

    #[must_use]
    pub fn with_identity_api_key(mut self, api_key: Option<SecretString>) -> Self {
        self.identity_api_key = api_key;
        self
    }

    #[must_use]
    pub fn with_identity_timeout(mut self, timeout: Duration) -> Self {
        self.identity_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_session_cookie(mut self, name: String) -> Self {
        self.session_cookie = name;
        self
    }

    #[must_use]
    pub fn with_sign_in_href(mut self, href: String) -> Self {
        Arc::make_mut(&mut self.site).sign_in_href = href;
        self
    }

    #[must_use]
    pub fn with_default_theme(mut self, mode: ThemeMode) -> Self {
        self.theme = self.theme.with_default_mode(mode);
        self
    }

    /// `scheme://host[:port]` of the public URL, compared against `Origin`.
    #[must_use]
    pub fn public_origin(&self) -> &str {
        &self.public_origin
    }

    #[must_use]
    pub fn identity_url(&self) -> &Url {
        &self.identity_url
    }

    #[must_use]
    pub fn identity_api_key(&self) -> Option<&SecretString> {
        self.identity_api_key.as_ref()
    }

    #[must_use]
    pub fn identity_timeout(&self) -> Duration {
        self.identity_timeout
    }

    #[must_use]
    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    /// Only mark cookies secure when the site is served over HTTPS.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    #[must_use]
    pub fn site(&self) -> &Arc<SiteMeta> {
        &self.site
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }
}

fn origin_of(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("Public URL must include a valid host: {url}"))?;
    let port = url
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    Ok(format!("{}://{}{}", url.scheme(), host, port))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn origin_strips_path_and_default_port() {
        let config = WebConfig::new("https://uptime.example.com/app/", "https://auth.example.com")
            .unwrap();
        assert_eq!(config.public_origin(), "https://uptime.example.com");
        assert!(config.secure_cookies());

        let config =
            WebConfig::new("http://localhost:3000", "http://127.0.0.1:9000").unwrap();
        assert_eq!(config.public_origin(), "http://localhost:3000");
        assert!(!config.secure_cookies());
    }

    #[test]
    fn invalid_urls_are_rejected() {
        assert!(WebConfig::new("not a url", "https://auth.example.com").is_err());
        assert!(WebConfig::new("https://uptime.example.com", "mailto:auth@example.com").is_err());
    }

    #[test]
    fn builders_override_defaults() {
        let config = WebConfig::new("http://localhost:3000", "https://auth.example.com")
            .unwrap()
            .with_session_cookie("sid".to_string())
            .with_sign_in_href("https://auth.example.com/login".to_string())
            .with_identity_timeout(Duration::from_secs(2))
            .with_default_theme(ThemeMode::Dark);

        assert_eq!(config.session_cookie(), "sid");
        assert_eq!(config.site().sign_in_href, "https://auth.example.com/login");
        assert_eq!(config.site().title, SITE_TITLE);
        assert_eq!(config.identity_timeout(), Duration::from_secs(2));
        assert_eq!(config.theme().default_mode(), ThemeMode::Dark);
        assert!(config.identity_api_key().is_none());
    }
}
