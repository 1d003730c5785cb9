//! `invoicedesk-auth`: credential verification and session establishment.
//!
//! No HTTP and no storage here: user lookup
//! goes through [`CredentialStore`], which the infra layer implements.

pub mod bridge;
pub mod claims;
pub mod credentials;
pub mod password;
pub mod session;

pub use bridge::{AuthBridge, AuthError, AuthErrorKind, Session, SignInError};
pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use credentials::{CREDENTIALS_PROVIDER, CredentialStore, CredentialsProvider};
pub use password::{PasswordError, hash_password, verify_password};
pub use session::{Hs256SessionCodec, SessionValidator, TokenError};
