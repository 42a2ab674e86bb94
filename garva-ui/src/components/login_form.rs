use crate::pages::{error_message, AdminLoginFn};
use leptos::form::ActionForm;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

#[component]
pub fn LoginForm() -> impl IntoView {
    let login = ServerAction::<AdminLoginFn>::new();
    let navigate = use_navigate();

    Effect::new(move |_| {
        if let Some(Ok(())) = login.value().get() {
            navigate("/admin/dashboard", Default::default());
        }
    });

    let error = move || {
        login
            .value()
            .get()
            .and_then(Result::err)
            .map(|e| view! { <div class="login-form__error" role="alert">{error_message(&e)}</div> })
    };

    view! {
        <ActionForm action=login attr:class="login-form">
            {error}
            <label class="login-form__field">
                "Användarnamn"
                <input type="text" name="username" autocomplete="username" required/>
            </label>
            <label class="login-form__field">
                "Lösenord"
                <input type="password" name="password" autocomplete="current-password" required/>
            </label>
            <button
                type="submit"
                class="button button--primary"
                prop:disabled=move || login.pending().get()
            >
                {move || if login.pending().get() { "Loggar in..." } else { "Logga in" }}
            </button>
        </ActionForm>
    }
}
