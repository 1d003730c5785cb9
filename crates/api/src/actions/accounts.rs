//! Sign-in and sign-up.

use anyhow::Context;
use tracing::{error, info, instrument};

use invoicedesk_auth::hash_password;
use invoicedesk_core::validation::SignUpForm;
use invoicedesk_core::{ActionState, FormData, NewUser, UserId};

use super::{ActionContext, ActionError, AuthOutcome, sign_in_with_credentials};

pub const MSG_SIGN_UP_FAILED: &str = "Missing Fields. Failed to Create Account.";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords don't match";
pub const MSG_ACCOUNT_NOT_CREATED: &str = "Failed to create account";

#[instrument(skip_all)]
pub async fn authenticate(ctx: &ActionContext, form: &FormData) -> Result<AuthOutcome, ActionError> {
    sign_in_with_credentials(ctx, form).await
}

/// Register a user and sign them in with the submitted credentials.
#[instrument(skip_all)]
pub async fn create_account(ctx: &ActionContext, form: &FormData) -> Result<AuthOutcome, ActionError> {
    let input = match SignUpForm::parse(form) {
        Ok(input) => input,
        Err(fields) => {
            return Ok(AuthOutcome::rejected(ActionState::field_errors(
                fields,
                MSG_SIGN_UP_FAILED,
            )));
        }
    };

    if !input.passwords_match() {
        return Ok(AuthOutcome::rejected(ActionState::message(MSG_PASSWORD_MISMATCH)));
    }

    let password = input.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")?;

    let user = NewUser {
        id: UserId::new(),
        name: input.username,
        email: input.email,
        password_hash,
    };
    let user_id = user.id;

    let inserted = match ctx.users.insert_if_absent(user).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "failed to create account");
            return Ok(AuthOutcome::rejected(ActionState::message(MSG_ACCOUNT_NOT_CREATED)));
        }
    };

    if inserted.is_empty() {
        info!(%user_id, "user id already taken; account not created");
        return Ok(AuthOutcome::rejected(ActionState::done()));
    }

    info!(%user_id, "account created");
    sign_in_with_credentials(ctx, form).await
}
