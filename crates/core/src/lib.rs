//! `invoicedesk-core`: domain foundation for the invoice desk.
//!
//! This crate contains **pure domain** types and the form validator (no IO).

pub mod error;
pub mod form;
pub mod id;
pub mod invoice;
pub mod money;
pub mod user;
pub mod validation;

pub use error::DomainError;
pub use form::{ActionState, FieldErrors, FormData};
pub use id::{CustomerId, InvoiceId, UserId};
pub use invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
pub use money::Cents;
pub use user::{NewUser, User};
