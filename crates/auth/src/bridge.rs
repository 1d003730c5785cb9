//! The sign-in capability consumed by form handlers.
//!
//! Failures are values, not exceptions: an authentication failure carries an
//! explicit [`AuthErrorKind`], and anything else is [`SignInError::Internal`]
//! for the caller to propagate.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use invoicedesk_core::FormData;

use crate::claims::SessionClaims;

/// Discriminates why authentication failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AuthErrorKind {
    /// Credentials were missing, malformed, unknown, or wrong.
    CredentialsSignin,
    /// The provider failed while checking credentials (e.g. lookup failed).
    CallbackRouteError,
    /// The requested provider is not configured.
    Configuration,
    /// The account is not allowed to sign in.
    AccessDenied,
}

impl AuthErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthErrorKind::CredentialsSignin => "CredentialsSignin",
            AuthErrorKind::CallbackRouteError => "CallbackRouteError",
            AuthErrorKind::Configuration => "Configuration",
            AuthErrorKind::AccessDenied => "AccessDenied",
        }
    }
}

impl core::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("authentication failed ({kind})")]
pub struct AuthError {
    pub kind: AuthErrorKind,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    pub fn credentials() -> Self {
        Self::new(AuthErrorKind::CredentialsSignin)
    }
}

#[derive(Debug, Error)]
pub enum SignInError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Not an authentication outcome; callers re-raise it.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// An established session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Signed token to hand back to the client (cookie value).
    pub token: String,
    pub claims: SessionClaims,
    /// Where the client asked to land after signing in.
    pub redirect_to: Option<String>,
}

/// Delegated credential check + session establishment.
#[async_trait::async_trait]
pub trait AuthBridge: Send + Sync {
    async fn sign_in(&self, provider: &str, credentials: &FormData) -> Result<Session, SignInError>;
}

#[async_trait::async_trait]
impl<B> AuthBridge for Arc<B>
where
    B: AuthBridge + ?Sized,
{
    async fn sign_in(&self, provider: &str, credentials: &FormData) -> Result<Session, SignInError> {
        (**self).sign_in(provider, credentials).await
    }
}
