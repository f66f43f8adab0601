//! # Folio
//!
//! `folio` backs a personal portfolio site. The interesting part is the
//! email-gated resume delivery flow: a one-time passcode is sent through a
//! hosted identity provider, verified, and only then is a short-lived signed
//! download link minted and opened. The passcode session is torn down right
//! after the link is opened.
//!
//! The remaining modules cover the page furniture that has observable
//! behaviour: clock-driven theme selection, scroll-spy navigation,
//! reveal-on-scroll, a slideshow, a scripted chat responder, a templated
//! "AI playground", a third-party story feed and client-local counters.

pub mod cli;
pub mod counters;
pub mod error;
pub mod feed;
pub mod gate;
pub mod gateway;
pub mod relay;
pub mod shell;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with("folio/"));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
