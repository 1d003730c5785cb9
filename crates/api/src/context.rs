use invoicedesk_auth::SessionClaims;
use invoicedesk_core::UserId;

/// Signed-in user for a request.
///
/// Inserted by the session middleware; present on every `/dashboard` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
    email: String,
    name: String,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            name: name.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<SessionClaims> for PrincipalContext {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}
