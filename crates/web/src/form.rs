//! Sign-up form state shared by the component and its tests.

use invoicedesk_core::ActionState;

/// Where the form sends the user when the page names no `callbackUrl`.
pub const DEFAULT_REDIRECT: &str = "/dashboard";

/// Message shown when the request never produced an action state.
pub const MSG_NETWORK: &str = "Something went wrong.";

/// Inputs rendered by the form, in order: (name, label, input type).
pub const FIELDS: [(&str, &str, &str); 4] = [
    ("username", "Username", "text"),
    ("email", "Email", "email"),
    ("password", "Password", "password"),
    ("confirm_password", "Confirm Password", "password"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Submission {
    #[default]
    Idle,
    Pending,
}

/// Last action result plus whether a submission is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpFormModel {
    submission: Submission,
    state: Option<ActionState>,
}

impl SignUpFormModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.submission == Submission::Pending
    }

    /// Enter the pending state. Returns `false` if already submitting.
    pub fn begin_submit(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        self.submission = Submission::Pending;
        true
    }

    pub fn finish(&mut self, state: ActionState) {
        self.submission = Submission::Idle;
        self.state = Some(state);
    }

    /// The request failed before the server answered.
    pub fn fail(&mut self) {
        self.finish(ActionState::message(MSG_NETWORK));
    }

    pub fn state(&self) -> Option<&ActionState> {
        self.state.as_ref()
    }

    /// Errors to list beneath `field`; empty unless the last result was field errors.
    pub fn field_errors(&self, field: &str) -> &[String] {
        match &self.state {
            Some(ActionState::FieldErrors { fields, .. }) => fields.get(field),
            _ => &[],
        }
    }

    /// Form-level message, only for a `message` result.
    pub fn form_message(&self) -> Option<&str> {
        match &self.state {
            Some(ActionState::Message { text }) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Summary shown above the fields when validation failed.
    pub fn summary(&self) -> Option<&str> {
        match &self.state {
            Some(ActionState::FieldErrors { message, .. }) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        self.state.as_ref().and_then(ActionState::redirect_target)
    }
}

/// Post-sign-up target from the page's `callbackUrl` query value.
pub fn redirect_from_callback(callback_url: Option<&str>) -> String {
    callback_url
        .map(str::trim)
        .filter(|url| url.starts_with('/') && !url.starts_with("//"))
        .unwrap_or(DEFAULT_REDIRECT)
        .to_string()
}
