//! Credential resolution for remote cart calls.
//!
//! The cart engine never chooses an auth mechanism itself; it defers to a
//! [`CredentialProvider`] that inspects the ambient session and hands back
//! whichever credential is present.

use mockall::automock;

/// The credential attached to a remote cart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `Authorization: Bearer <token>` header.
    Bearer(String),

    /// `Cookie: <cookie>` header carrying the session.
    SessionCookie(String),

    /// No credential present; the request goes out unauthenticated.
    Anonymous,
}

/// Resolves the credential for the current session.
///
/// Implementations must be cheap and non-blocking; resolution happens on
/// every remote call.
#[automock]
pub trait CredentialProvider: Send + Sync {
    /// Returns the credential to attach to the next request.
    fn resolve(&self) -> Credentials;
}

/// Ambient session store: prefers a bearer token when one is present,
/// falls back to the session cookie, else anonymous.
#[derive(Debug, Clone, Default)]
pub struct SessionCredentials {
    token: Option<String>,
    cookie: Option<String>,
}

impl SessionCredentials {
    /// Creates an empty (anonymous) session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session holding a bearer token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            cookie: None,
        }
    }

    /// Creates a session holding a session cookie.
    pub fn with_cookie(cookie: impl Into<String>) -> Self {
        Self {
            token: None,
            cookie: Some(cookie.into()),
        }
    }
}

impl CredentialProvider for SessionCredentials {
    fn resolve(&self) -> Credentials {
        if let Some(token) = &self.token {
            return Credentials::Bearer(token.clone());
        }

        if let Some(cookie) = &self.cookie {
            return Credentials::SessionCookie(cookie.clone());
        }

        Credentials::Anonymous
    }
}
