//! Declarative checks that turn raw form fields into typed values.
//!
//! Every rule runs; violations are collected per field rather than stopping at
//! the first failure, so a form can show all of its problems at once.

use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::form::{FieldErrors, FormData};
use crate::{Cents, CustomerId, InvoiceChanges, InvoiceStatus, NewInvoice};

pub const MSG_CUSTOMER: &str = "Please select a customer.";
pub const MSG_AMOUNT: &str = "Please enter an amount greater than $0.";
pub const MSG_STATUS: &str = "Please select an invoice status.";
pub const MSG_USERNAME: &str = "Please provide a username.";
pub const MSG_EMAIL: &str = "Invalid email";

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

/// Whether `s` matches the accepted email grammar.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

fn min_length_message(min: usize) -> String {
    format!("String must contain at least {min} character(s)")
}

fn required<'a>(form: &'a FormData, field: &str) -> Option<&'a str> {
    form.get(field).filter(|v| !v.trim().is_empty())
}

/// Parse a user-entered amount. Accepts plain and scientific notation.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.contains('_') {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Invoice form
// ─────────────────────────────────────────────────────────────────────────────

/// Validated create/update invoice submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceForm {
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

impl InvoiceForm {
    /// Check `customerId`, `amount` and `status`.
    pub fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let customer_id = match required(form, "customerId").map(CustomerId::from_str) {
            Some(Ok(id)) => Some(id),
            _ => {
                errors.push("customerId", MSG_CUSTOMER);
                None
            }
        };

        let amount = match form
            .get("amount")
            .and_then(parse_amount)
            .map(Cents::from_decimal)
        {
            Some(Ok(cents)) => Some(cents),
            _ => {
                errors.push("amount", MSG_AMOUNT);
                None
            }
        };

        let status = match form.get("status").map(InvoiceStatus::from_str) {
            Some(Ok(status)) => Some(status),
            _ => {
                errors.push("status", MSG_STATUS);
                None
            }
        };

        match (customer_id, amount, status) {
            (Some(customer_id), Some(amount), Some(status)) => Ok(Self {
                customer_id,
                amount,
                status,
            }),
            _ => Err(errors),
        }
    }

    pub fn into_new(self, date: chrono::NaiveDate) -> NewInvoice {
        NewInvoice {
            customer_id: self.customer_id,
            amount: self.amount,
            status: self.status,
            date,
        }
    }

    pub fn into_changes(self) -> InvoiceChanges {
        InvoiceChanges {
            customer_id: self.customer_id,
            amount: self.amount,
            status: self.status,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sign-up form
// ─────────────────────────────────────────────────────────────────────────────

/// Validated sign-up submission. Password equality is checked by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl core::fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SignUpForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl SignUpForm {
    pub fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = required(form, "username").map(|s| s.trim().to_string());
        if username.is_none() {
            errors.push("username", MSG_USERNAME);
        }

        let email = check_email(form, &mut errors);
        let password = check_password(form, "password", &mut errors);
        let confirm_password = check_password(form, "confirm_password", &mut errors);

        match (username, email, password, confirm_password) {
            (Some(username), Some(email), Some(password), Some(confirm_password)) => Ok(Self {
                username,
                email,
                password,
                confirm_password,
            }),
            _ => Err(errors),
        }
    }

    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Credentials
// ─────────────────────────────────────────────────────────────────────────────

/// Email/password pair submitted to sign in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = check_email(form, &mut errors);
        let password = check_password(form, "password", &mut errors);

        match (email, password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(errors),
        }
    }
}

fn check_email(form: &FormData, errors: &mut FieldErrors) -> Option<String> {
    match form.get("email").map(str::trim) {
        Some(email) if is_valid_email(email) => Some(email.to_string()),
        _ => {
            errors.push("email", MSG_EMAIL);
            None
        }
    }
}

fn check_password(form: &FormData, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match form.get(field) {
        Some(p) if p.chars().count() >= MIN_PASSWORD_LEN => Some(p.to_string()),
        _ => {
            errors.push(field, min_length_message(MIN_PASSWORD_LEN));
            None
        }
    }
}
