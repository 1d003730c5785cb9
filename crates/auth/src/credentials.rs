//! Email/password provider backed by the users table.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, instrument, warn};

use invoicedesk_core::validation::Credentials;
use invoicedesk_core::{FormData, User};

use crate::bridge::{AuthBridge, AuthError, AuthErrorKind, Session, SignInError};
use crate::claims::SessionClaims;
use crate::password::verify_password;
use crate::session::Hs256SessionCodec;

/// Name under which the credentials provider is registered.
pub const CREDENTIALS_PROVIDER: &str = "credentials";

/// User lookup needed to check credentials.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
}

#[async_trait::async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        (**self).find_user_by_email(email).await
    }
}

/// Checks an email/password pair and issues a signed session token.
pub struct CredentialsProvider<S> {
    store: S,
    codec: Hs256SessionCodec,
    session_ttl: Duration,
}

impl<S> CredentialsProvider<S> {
    pub fn new(store: S, codec: Hs256SessionCodec, session_ttl: Duration) -> Self {
        Self {
            store,
            codec,
            session_ttl,
        }
    }
}

/// Only same-site absolute paths are honoured as post-login targets.
fn redirect_target(form: &FormData) -> Option<String> {
    form.get("redirectTo")
        .map(str::trim)
        .filter(|t| t.starts_with('/') && !t.starts_with("//"))
        .map(str::to_string)
}

#[async_trait::async_trait]
impl<S> AuthBridge for CredentialsProvider<S>
where
    S: CredentialStore,
{
    #[instrument(skip_all, fields(provider = %provider))]
    async fn sign_in(&self, provider: &str, form: &FormData) -> Result<Session, SignInError> {
        if provider != CREDENTIALS_PROVIDER {
            warn!("sign-in requested for unknown provider");
            return Err(AuthError::new(AuthErrorKind::Configuration).into());
        }

        let Ok(credentials) = Credentials::parse(form) else {
            debug!("credential payload failed validation");
            return Err(AuthError::credentials().into());
        };

        let user = match self.store.find_user_by_email(&credentials.email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!("no user with that email");
                return Err(AuthError::credentials().into());
            }
            Err(e) => {
                warn!("user lookup failed: {e:#}");
                return Err(AuthError::new(AuthErrorKind::CallbackRouteError).into());
            }
        };

        let password = credentials.password.clone();
        let stored = user.password.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| SignInError::Internal(anyhow::Error::new(e)))?;

        match verified {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::credentials().into()),
            Err(e) => {
                warn!(user_id = %user.id, "cannot verify password: {e}");
                return Err(AuthError::new(AuthErrorKind::CallbackRouteError).into());
            }
        }

        let claims = SessionClaims::new(user.id, user.email, user.name, Utc::now(), self.session_ttl);
        let token = self
            .codec
            .issue(&claims)
            .map_err(|e| SignInError::Internal(anyhow::Error::new(e)))?;

        debug!(user_id = %claims.sub, "session established");
        Ok(Session {
            token,
            claims,
            redirect_to: redirect_target(form),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;
    use crate::session::SessionValidator;
    use invoicedesk_core::UserId;

    struct OneUser(User);

    #[async_trait::async_trait]
    impl CredentialStore for OneUser {
        async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
            Ok((self.0.email == email).then(|| self.0.clone()))
        }
    }

    struct BrokenStore;

    #[async_trait::async_trait]
    impl CredentialStore for BrokenStore {
        async fn find_user_by_email(&self, _email: &str) -> anyhow::Result<Option<User>> {
            anyhow::bail!("connection refused")
        }
    }

    fn provider() -> CredentialsProvider<OneUser> {
        let user = User {
            id: UserId::new(),
            name: "User".into(),
            email: "user@nextmail.com".into(),
            password: hash_password("123456").unwrap(),
        };
        CredentialsProvider::new(OneUser(user), Hs256SessionCodec::new("secret"), Duration::hours(1))
    }

    fn login(email: &str, password: &str) -> FormData {
        FormData::new().with("email", email).with("password", password)
    }

    fn kind(err: SignInError) -> AuthErrorKind {
        match err {
            SignInError::Auth(e) => e.kind,
            SignInError::Internal(e) => panic!("unexpected internal error: {e}"),
        }
    }

    #[tokio::test]
    async fn correct_credentials_issue_a_valid_token() {
        let p = provider();
        let session = p
            .sign_in(CREDENTIALS_PROVIDER, &login("user@nextmail.com", "123456").with("redirectTo", "/dashboard"))
            .await
            .unwrap();
        assert_eq!(session.redirect_to.as_deref(), Some("/dashboard"));
        let claims = Hs256SessionCodec::new("secret").validate(&session.token, Utc::now()).unwrap();
        assert_eq!(claims.email, "user@nextmail.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_credentials_errors() {
        let p = provider();
        let err = p.sign_in(CREDENTIALS_PROVIDER, &login("user@nextmail.com", "badpass")).await.unwrap_err();
        assert_eq!(kind(err), AuthErrorKind::CredentialsSignin);

        let err = p.sign_in(CREDENTIALS_PROVIDER, &login("other@nextmail.com", "123456")).await.unwrap_err();
        assert_eq!(kind(err), AuthErrorKind::CredentialsSignin);

        let err = p.sign_in(CREDENTIALS_PROVIDER, &login("not-an-email", "123456")).await.unwrap_err();
        assert_eq!(kind(err), AuthErrorKind::CredentialsSignin);
    }

    #[tokio::test]
    async fn unknown_provider_is_a_configuration_error() {
        let err = provider().sign_in("github", &login("user@nextmail.com", "123456")).await.unwrap_err();
        assert_eq!(kind(err), AuthErrorKind::Configuration);
    }

    #[tokio::test]
    async fn store_failure_is_a_callback_error() {
        let p = CredentialsProvider::new(BrokenStore, Hs256SessionCodec::new("s"), Duration::hours(1));
        let err = p.sign_in(CREDENTIALS_PROVIDER, &login("user@nextmail.com", "123456")).await.unwrap_err();
        assert_eq!(kind(err), AuthErrorKind::CallbackRouteError);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn concurrent_sign_ins_complete_on_a_single_thread() {
        let p = provider();
        let form = login("user@nextmail.com", "123456");
        let wrong = login("user@nextmail.com", "654321");

        let (a, b, c, d) = tokio::join!(
            p.sign_in(CREDENTIALS_PROVIDER, &form),
            p.sign_in(CREDENTIALS_PROVIDER, &form),
            p.sign_in(CREDENTIALS_PROVIDER, &wrong),
            p.sign_in(CREDENTIALS_PROVIDER, &form),
        );

        for session in [a, b, d] {
            assert_eq!(session.unwrap().claims.email, "user@nextmail.com");
        }
        assert_eq!(kind(c.unwrap_err()), AuthErrorKind::CredentialsSignin);
    }

    #[test]
    fn off_site_redirects_are_dropped() {
        assert_eq!(redirect_target(&FormData::new().with("redirectTo", "//evil.example")), None);
        assert_eq!(redirect_target(&FormData::new().with("redirectTo", "https://evil.example")), None);
        assert_eq!(
            redirect_target(&FormData::new().with("redirectTo", "/dashboard/invoices")).as_deref(),
            Some("/dashboard/invoices")
        );
    }
}
