//! Form actions: validate → persist → invalidate → redirect.
//!
//! Each action runs straight through with sequential awaits and no retries.
//! Validation and authentication failures come back as an [`ActionState`] for
//! the form to render; only unexpected failures surface as [`ActionError`].

use std::sync::Arc;

use thiserror::Error;

use invoicedesk_auth::{AuthBridge, AuthErrorKind, CREDENTIALS_PROVIDER, Session, SignInError};
use invoicedesk_core::{ActionState, FormData};
use invoicedesk_infra::{InvoiceStore, UserStore, ViewCache};

pub mod accounts;
pub mod invoices;

/// View listing all invoices; invalidated by every invoice mutation.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Landing page after sign-in when the form names no target.
pub const DEFAULT_SIGN_IN_REDIRECT: &str = "/dashboard";

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const MSG_SOMETHING_WENT_WRONG: &str = "Something went wrong.";

/// Collaborators the actions run against. Cheap to clone.
#[derive(Clone)]
pub struct ActionContext {
    pub invoices: Arc<dyn InvoiceStore>,
    pub users: Arc<dyn UserStore>,
    pub auth: Arc<dyn AuthBridge>,
    pub cache: Arc<dyn ViewCache>,
}

/// Failures that are not the user's to fix; the host turns these into a 500.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Result of a sign-in style action: what the form sees plus the session, if any.
#[derive(Debug)]
pub struct AuthOutcome {
    pub state: ActionState,
    pub session: Option<Session>,
}

impl AuthOutcome {
    fn rejected(state: ActionState) -> Self {
        Self { state, session: None }
    }
}

fn auth_failure_message(kind: AuthErrorKind) -> &'static str {
    match kind {
        AuthErrorKind::CredentialsSignin => MSG_INVALID_CREDENTIALS,
        _ => MSG_SOMETHING_WENT_WRONG,
    }
}

/// Sign in through the bridge and map failures to form messages.
///
/// Non-authentication failures are propagated unchanged.
pub(crate) async fn sign_in_with_credentials(
    ctx: &ActionContext,
    form: &FormData,
) -> Result<AuthOutcome, ActionError> {
    match ctx.auth.sign_in(CREDENTIALS_PROVIDER, form).await {
        Ok(session) => {
            let to = session
                .redirect_to
                .clone()
                .unwrap_or_else(|| DEFAULT_SIGN_IN_REDIRECT.to_string());
            Ok(AuthOutcome {
                state: ActionState::redirect(to),
                session: Some(session),
            })
        }
        Err(SignInError::Auth(e)) => {
            tracing::info!(kind = %e.kind, "sign-in rejected");
            Ok(AuthOutcome::rejected(ActionState::message(auth_failure_message(e.kind))))
        }
        Err(SignInError::Internal(e)) => Err(ActionError::Internal(e)),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Test doubles shared by the action tests.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration;
    use invoicedesk_auth::{AuthError, CredentialsProvider, Hs256SessionCodec};
    use invoicedesk_core::{Invoice, InvoiceChanges, InvoiceId, NewInvoice, NewUser, User};
    use invoicedesk_infra::{InMemoryInvoiceStore, InMemoryUserStore, InMemoryViewCache, StoreError};

    use super::*;

    /// Records every statement and optionally fails all of them.
    #[derive(Default)]
    pub struct RecordingInvoiceStore {
        pub inner: InMemoryInvoiceStore,
        pub inserts: Mutex<Vec<NewInvoice>>,
        pub updates: Mutex<Vec<(InvoiceId, InvoiceChanges)>>,
        pub deletes: Mutex<Vec<InvoiceId>>,
        pub fail: bool,
    }

    impl RecordingInvoiceStore {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.fail {
                Err(StoreError::Unavailable("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl InvoiceStore for RecordingInvoiceStore {
        async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError> {
            self.inserts.lock().unwrap().push(invoice.clone());
            self.check()?;
            self.inner.insert(invoice).await
        }

        async fn update(&self, id: InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
            self.updates.lock().unwrap().push((id, changes.clone()));
            self.check()?;
            self.inner.update(id, changes).await
        }

        async fn delete(&self, id: InvoiceId) -> Result<u64, StoreError> {
            self.deletes.lock().unwrap().push(id);
            self.check()?;
            self.inner.delete(id).await
        }

        async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
            self.inner.get(id).await
        }

        async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
            self.inner.list().await
        }
    }

    /// User store whose inserts always collide or always fail.
    pub enum ScriptedUserStore {
        Colliding,
        Failing,
    }

    #[async_trait::async_trait]
    impl invoicedesk_auth::CredentialStore for ScriptedUserStore {
        async fn find_user_by_email(&self, _email: &str) -> anyhow::Result<Option<User>> {
            Ok(None)
        }
    }

    #[async_trait::async_trait]
    impl UserStore for ScriptedUserStore {
        async fn insert_if_absent(&self, _user: NewUser) -> Result<Vec<User>, StoreError> {
            match self {
                ScriptedUserStore::Colliding => Ok(vec![]),
                ScriptedUserStore::Failing => Err(StoreError::Database("relation \"users\" does not exist".into())),
            }
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
            Ok(None)
        }
    }

    /// Auth bridge that always fails the same way and counts calls.
    ///
    /// `None` fails with a non-authentication error.
    pub struct ScriptedAuth {
        pub failure: Option<AuthErrorKind>,
        pub calls: AtomicUsize,
    }

    impl ScriptedAuth {
        pub fn failing_with(kind: AuthErrorKind) -> Self {
            Self {
                failure: Some(kind),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn internal() -> Self {
            Self {
                failure: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AuthBridge for ScriptedAuth {
        async fn sign_in(&self, _provider: &str, _credentials: &FormData) -> Result<Session, SignInError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failure {
                Some(kind) => Err(AuthError::new(kind).into()),
                None => Err(SignInError::Internal(anyhow::anyhow!("session backend down"))),
            }
        }
    }

    pub struct Harness {
        pub ctx: ActionContext,
        pub cache: Arc<InMemoryViewCache>,
    }

    /// Context over the given stores with the real credentials provider.
    pub fn harness(invoices: Arc<dyn InvoiceStore>, users: Arc<dyn UserStore>) -> Harness {
        let auth = Arc::new(CredentialsProvider::new(
            users.clone(),
            Hs256SessionCodec::new("test-secret"),
            Duration::hours(1),
        ));
        harness_with_auth(invoices, users, auth)
    }

    pub fn harness_with_auth(
        invoices: Arc<dyn InvoiceStore>,
        users: Arc<dyn UserStore>,
        auth: Arc<dyn AuthBridge>,
    ) -> Harness {
        let cache = Arc::new(InMemoryViewCache::new());
        Harness {
            ctx: ActionContext {
                invoices,
                users,
                auth,
                cache: cache.clone(),
            },
            cache,
        }
    }

    pub fn memory_harness() -> Harness {
        harness(
            Arc::new(InMemoryInvoiceStore::new()),
            Arc::new(InMemoryUserStore::new()),
        )
    }
}
