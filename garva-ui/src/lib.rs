#![recursion_limit = "256"]
pub mod browser;
pub mod components;
pub mod pages;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use pages::{AdminDashboardPage, AdminLoginPage, DeckPage};

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Garva - Skämt att svepa"/>
        <Meta name="description" content="Svep igenom skämt och rösta på dina favoriter"/>
        <Stylesheet id="leptos" href="/pkg/garva.css"/>

        <Router>
            <main class="container">
                <Routes fallback=|| "Sidan hittades inte">
                    <Route path=path!("/") view=DeckPage/>
                    <Route path=path!("/admin") view=AdminLoginPage/>
                    <Route path=path!("/admin/dashboard") view=AdminDashboardPage/>
                </Routes>
            </main>
        </Router>
    }
}

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
