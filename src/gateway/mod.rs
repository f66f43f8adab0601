//! Identity gateway abstraction used by the resume gate.
//!
//! The gate only ever talks to an `IdentityGateway`; the hosted provider
//! client lives in [`hosted`]. Inputs are parsed into `Email` and `Passcode`
//! before they reach a gateway, so malformed values never leave the process.

pub mod hosted;

pub use self::hosted::{HostedConfig, HostedGateway};

use crate::error::{GatewayError, ValidationError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use secrecy::SecretString;
use std::{fmt, sync::LazyLock};
use url::Url;

static PASSCODE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").ok());

/// A non-empty, trimmed email address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// # Errors
    /// Returns `ValidationError::EmptyEmail` when the input is blank.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let email = input.trim();
        if email.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        Ok(Self(email.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Exactly six ASCII digits.
#[derive(Clone, PartialEq, Eq)]
pub struct Passcode(String);

impl Passcode {
    /// # Errors
    /// Returns `ValidationError::MalformedCode` unless the trimmed input is six digits.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let code = input.trim();
        match PASSCODE_RE.as_ref() {
            Some(re) if re.is_match(code) => Ok(Self(code.to_string())),
            _ => Err(ValidationError::MalformedCode),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// never print the code itself
impl fmt::Debug for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passcode(***)")
    }
}

/// Time-boxed URL to a stored object. Not `Clone`: opening it consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct SignedDownloadLink {
    url: Url,
    expires_at: DateTime<Utc>,
}

impl SignedDownloadLink {
    #[must_use]
    pub fn new(url: Url, expires_at: DateTime<Utc>) -> Self {
        Self { url, expires_at }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    #[must_use]
    pub fn into_url(self) -> Url {
        self.url
    }
}

/// Authenticated provider session minted by a successful verification.
///
/// Each flow holds its own session, so ending one never touches another.
/// Not `Clone`: `end_session` consumes it.
pub struct AuthSession {
    access_token: SecretString,
}

impl AuthSession {
    #[must_use]
    pub fn new(access_token: SecretString) -> Self {
        Self { access_token }
    }

    #[must_use]
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthSession(***)")
    }
}

/// Capabilities the resume gate needs from a hosted identity provider.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Ask the provider to email a one-time passcode.
    async fn request_passcode(&self, email: &Email) -> Result<(), GatewayError>;

    /// Verify the passcode and return the authenticated session it opens.
    async fn verify_passcode(
        &self,
        email: &Email,
        code: &Passcode,
    ) -> Result<AuthSession, GatewayError>;

    /// Mint a signed URL for `object_id`, valid for `ttl_seconds`.
    async fn issue_download_link(
        &self,
        session: &AuthSession,
        object_id: &str,
        ttl_seconds: u64,
    ) -> Result<SignedDownloadLink, GatewayError>;

    /// Terminate the authenticated session.
    async fn end_session(&self, session: AuthSession) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn email_rejects_blank() {
        assert_eq!(Email::parse(""), Err(ValidationError::EmptyEmail));
        assert_eq!(Email::parse("   "), Err(ValidationError::EmptyEmail));
        assert_eq!(
            Email::parse(" user@example.com ").map(|e| e.to_string()),
            Ok("user@example.com".to_string())
        );
    }

    #[test]
    fn passcode_requires_six_digits() {
        for bad in ["", "12345", "1234567", "12a45", "12a456", "12 456", "١٢٣٤٥٦"] {
            assert_eq!(
                Passcode::parse(bad),
                Err(ValidationError::MalformedCode),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(
            Passcode::parse(" 123456 ").map(|c| c.as_str().to_string()),
            Ok("123456".to_string())
        );
    }

    #[test]
    fn passcode_debug_hides_digits() {
        let code = Passcode::parse("123456").map(|c| format!("{c:?}"));
        assert_eq!(code, Ok("Passcode(***)".to_string()));
    }

    #[test]
    fn auth_session_debug_hides_token() {
        let session = AuthSession::new(SecretString::from("session-token".to_string()));
        assert_eq!(format!("{session:?}"), "AuthSession(***)");
    }

    #[test]
    fn link_expiry() -> anyhow::Result<()> {
        let now = Utc::now();
        let link = SignedDownloadLink::new(
            Url::parse("https://cdn.example.com/r.pdf?token=t")?,
            now + Duration::seconds(60),
        );
        assert!(!link.is_expired(now));
        assert!(link.is_expired(now + Duration::seconds(60)));
        Ok(())
    }
}
