//! Sign-up form component.

use leptos::*;

use crate::form::{FIELDS, SignUpFormModel, redirect_from_callback};
use crate::frontend::api;

fn callback_url() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search).ok()?.get("callbackUrl")
}

fn navigate(target: &str) {
    if let Some(w) = web_sys::window() {
        if let Err(e) = w.location().set_href(target) {
            leptos::logging::error!("navigation failed: {:?}", e);
        }
    }
}

#[component]
pub fn SignUpForm() -> impl IntoView {
    let model = create_rw_signal(SignUpFormModel::new());
    let values = FIELDS.map(|_| create_rw_signal(String::new()));
    let redirect_to = redirect_from_callback(callback_url().as_deref());
    let redirect_for_submit = redirect_to.clone();

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let mut started = false;
        model.update(|m| started = m.begin_submit());
        if !started {
            return;
        }

        let mut fields: Vec<(&str, String)> = FIELDS
            .iter()
            .zip(values.iter())
            .map(|(&(name, _, _), value)| (name, value.get_untracked()))
            .collect();
        fields.push(("redirectTo", redirect_for_submit.clone()));

        spawn_local(async move {
            match api::submit_sign_up(&fields).await {
                Ok(state) => {
                    let target = state.redirect_target().map(str::to_string);
                    model.update(|m| m.finish(state));
                    if let Some(target) = target {
                        navigate(&target);
                    }
                }
                Err(e) => {
                    leptos::logging::error!("sign-up failed: {}", e);
                    model.update(|m| m.fail());
                }
            }
        });
    };

    view! {
        <form class="signup-form" on:submit=on_submit>
            <h1>"Create an account"</h1>

            {FIELDS
                .iter()
                .zip(values)
                .map(|(&(name, label, kind), value)| {
                    let error_id = format!("{name}-error");
                    view! {
                        <div class="field">
                            <label for=name>{label}</label>
                            <input
                                id=name
                                name=name
                                type=kind
                                aria-describedby=error_id.clone()
                                prop:value=move || value.get()
                                on:input=move |ev| value.set(event_target_value(&ev))
                            />
                            <div id=error_id aria-live="polite" aria-atomic="true">
                                {move || {
                                    model.with(|m| {
                                        m.field_errors(name)
                                            .iter()
                                            .map(|e| view! { <p class="field-error">{e.clone()}</p> })
                                            .collect_view()
                                    })
                                }}
                            </div>
                        </div>
                    }
                })
                .collect_view()}

            <input type="hidden" name="redirectTo" value=redirect_to/>

            <div class="form-message" aria-live="polite" aria-atomic="true">
                {move || {
                    model.with(|m| {
                        m.form_message()
                            .or(m.summary())
                            .map(|msg| view! { <p class="form-error">{msg.to_string()}</p> })
                    })
                }}
            </div>

            <button type="submit" aria-disabled=move || model.with(|m| m.is_pending()).to_string()>
                "Create account"
            </button>
        </form>
    }
}
