use std::sync::Arc;

use invoicedesk_auth::CredentialStore;
use invoicedesk_core::{NewUser, User};

use crate::error::StoreError;

/// Account persistence gateway.
///
/// Also serves the credentials provider's lookups via [`CredentialStore`].
#[async_trait::async_trait]
pub trait UserStore: CredentialStore + Send + Sync {
    /// Insert unless a row with the same id exists.
    ///
    /// Returns the inserted rows: one on success, none when the id collided.
    async fn insert_if_absent(&self, user: NewUser) -> Result<Vec<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait::async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn insert_if_absent(&self, user: NewUser) -> Result<Vec<User>, StoreError> {
        (**self).insert_if_absent(user).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        (**self).find_by_email(email).await
    }
}
