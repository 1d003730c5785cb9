//! `invoicedesk-web`
//!
//! Browser side of the sign-up flow.
//!
//! - [`form`]: target-independent form state, unit-tested on the host
//! - `frontend`: Leptos CSR component and the fetch binding (wasm32 only)

pub mod form;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use form::{SignUpFormModel, Submission};
