//! # Uptime Monitor (web front end)
//!
//! `uptime-web` serves the HTML shell of the Uptime Monitor product, which
//! watches websites, SSL certificates and domain registrations. Monitoring
//! itself and the identity service live elsewhere; this crate owns how each
//! page request learns who is asking and what the top-level shell shows them.
//!
//! ## Sessions
//!
//! Every request carries (at most) one session token, read from the session
//! cookie or an `Authorization: Bearer` header. The token is checked against
//! the identity backend once per request and the answer is memoized, so the
//! navigation and the auth control can never disagree about who is signed in.
//! When the backend cannot be reached the request renders as anonymous.
//!
//! ## Sign-out
//!
//! Sign-out is a same-origin `POST` only. A failed backend invalidation never
//! redirects and never clears the cookie, so the UI keeps showing the caller as
//! signed in until a later resolution says otherwise.

pub mod cli;
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
