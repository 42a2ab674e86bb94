use crate::components::{ErrorDisplay, JokeEditor, JokeRow, LoadingSpinner, LoginForm};
use crate::components::joke_editor::plain_text;
use garva_app::domain::{SortField, SortOrder, StoredJoke};
use garva_errors::AppError;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use server_fn::ServerFnError;

/// Fails with `Unauthorized` unless the session carries the admin flag.
#[cfg(feature = "ssr")]
async fn require_admin() -> Result<tower_sessions::Session, ServerFnError> {
    use garva_app::infrastructure::auth::ADMIN_SESSION_KEY;

    let session = leptos_axum::extract::<tower_sessions::Session>().await?;
    let is_admin = session
        .get::<bool>(ADMIN_SESSION_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?
        .unwrap_or(false);

    if is_admin {
        Ok(session)
    } else {
        Err(ServerFnError::new(AppError::Unauthorized.user_message()))
    }
}

#[server(AdminLoginFn, "/api", endpoint = "admin_login")]
pub async fn admin_login(username: String, password: String) -> Result<(), ServerFnError> {
    use garva_app::infrastructure::auth::ADMIN_SESSION_KEY;
    use garva_app::AppContext;

    let ctx = expect_context::<AppContext>();
    let session = leptos_axum::extract::<tower_sessions::Session>().await?;

    ctx.admin
        .verify(username.trim(), &password)
        .map_err(|e| ServerFnError::new(e.user_message()))?;

    session
        .cycle_id()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    session
        .insert(ADMIN_SESSION_KEY, true)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    tracing::info!("Admin logged in");
    Ok(())
}

#[server(AdminLogoutFn, "/api", endpoint = "admin_logout")]
pub async fn admin_logout() -> Result<(), ServerFnError> {
    let session = leptos_axum::extract::<tower_sessions::Session>().await?;
    session
        .flush()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

#[server(IsAdminFn, "/api", endpoint = "is_admin")]
pub async fn is_admin() -> Result<bool, ServerFnError> {
    Ok(require_admin().await.is_ok())
}

#[server(ListJokesFn, "/api", endpoint = "admin_list_jokes")]
pub async fn list_jokes(
    search: String,
    sort_by: String,
    sort_order: String,
) -> Result<Vec<StoredJoke>, ServerFnError> {
    use garva_app::domain::JokeQuery;
    use garva_app::AppContext;

    require_admin().await?;
    let ctx = expect_context::<AppContext>();

    let query = JokeQuery::from_params(
        Some(search.as_str()),
        Some(sort_by.as_str()),
        Some(sort_order.as_str()),
    );
    ctx.manage_jokes
        .list(&query)
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

#[server(CreateJokeFn, "/api", endpoint = "admin_create_joke")]
pub async fn create_joke(content: String) -> Result<StoredJoke, ServerFnError> {
    use garva_app::domain::JokeDraft;
    use garva_app::AppContext;

    require_admin().await?;
    let ctx = expect_context::<AppContext>();

    ctx.manage_jokes
        .create(JokeDraft::new(content))
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

#[server(UpdateJokeFn, "/api", endpoint = "admin_update_joke")]
pub async fn update_joke(
    id: i32,
    content: String,
    upvotes: Option<i32>,
    downvotes: Option<i32>,
) -> Result<StoredJoke, ServerFnError> {
    use garva_app::domain::JokeDraft;
    use garva_app::AppContext;

    require_admin().await?;
    let ctx = expect_context::<AppContext>();

    let draft = JokeDraft {
        content,
        upvotes,
        downvotes,
    };
    ctx.manage_jokes
        .update(id, draft)
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

#[server(DeleteJokeFn, "/api", endpoint = "admin_delete_joke")]
pub async fn delete_joke(id: i32) -> Result<(), ServerFnError> {
    use garva_app::AppContext;

    require_admin().await?;
    let ctx = expect_context::<AppContext>();

    ctx.manage_jokes
        .delete(id)
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

/// Message to show for a failed server call.
pub fn error_message(error: &ServerFnError) -> String {
    match error {
        ServerFnError::ServerError(message) => message.clone(),
        _ => "Ett fel uppstod. Vänligen försök igen.".to_string(),
    }
}

fn is_unauthorized(error: &ServerFnError) -> bool {
    matches!(error, ServerFnError::ServerError(message) if message == AppError::Unauthorized.user_message())
}

#[component]
pub fn AdminLoginPage() -> impl IntoView {
    let signed_in = Resource::new(|| (), |_| is_admin());
    let navigate = use_navigate();

    Effect::new(move |_| {
        if let Some(Ok(true)) = signed_in.get() {
            navigate("/admin/dashboard", Default::default());
        }
    });

    view! {
        <div class="admin-login">
            <h1 class="admin-login__title">"Garva Admin"</h1>
            <p class="admin-login__subtitle">"Logga in för att hantera skämt"</p>
            <LoginForm/>
        </div>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let search = RwSignal::new(String::new());
    let sort_by = RwSignal::new(SortField::Id);
    let sort_order = RwSignal::new(SortOrder::Asc);
    let new_joke = RwSignal::new(String::new());
    let editing = RwSignal::new(None::<StoredJoke>);
    let editor_epoch = RwSignal::new(0u32);

    let create = ServerAction::<CreateJokeFn>::new();
    let update = ServerAction::<UpdateJokeFn>::new();
    let delete = ServerAction::<DeleteJokeFn>::new();
    let logout = ServerAction::<AdminLogoutFn>::new();

    let jokes = Resource::new(
        move || {
            (
                search.get(),
                sort_by.get(),
                sort_order.get(),
                create.version().get(),
                update.version().get(),
                delete.version().get(),
            )
        },
        |(search, sort_by, sort_order, ..)| {
            list_jokes(
                search,
                sort_by.as_str().to_string(),
                sort_order.as_str().to_string(),
            )
        },
    );

    let navigate = use_navigate();
    Effect::new(move |_| {
        let unauthorized = matches!(jokes.get(), Some(Err(e)) if is_unauthorized(&e));
        let logged_out = matches!(logout.value().get(), Some(Ok(())));
        if unauthorized || logged_out {
            navigate("/admin", Default::default());
        }
    });

    Effect::new(move |_| match create.value().get() {
        Some(Ok(_)) => {
            new_joke.set(String::new());
            editor_epoch.update(|n| *n += 1);
        }
        Some(Err(e)) => tracing::error!("Failed to create joke: {}", e),
        None => {}
    });

    Effect::new(move |_| match update.value().get() {
        Some(Ok(_)) => editing.set(None),
        Some(Err(e)) => tracing::error!("Failed to update joke: {}", e),
        None => {}
    });

    Effect::new(move |_| {
        if let Some(Err(e)) = delete.value().get() {
            tracing::error!("Failed to delete joke: {}", e);
        }
    });

    let on_create = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let content = new_joke.get_untracked();
        if plain_text(&content).is_empty() {
            return;
        }
        create.dispatch(CreateJokeFn { content });
    };

    let on_save = Callback::new(move |joke: StoredJoke| {
        update.dispatch(UpdateJokeFn {
            id: joke.id,
            content: joke.content,
            upvotes: Some(joke.upvotes),
            downvotes: Some(joke.downvotes),
        });
    });

    let on_delete = Callback::new(move |id: i32| {
        let confirmed = window()
            .confirm_with_message("Är du säker på att du vill ta bort detta skämt?")
            .unwrap_or(false);
        if confirmed {
            delete.dispatch(DeleteJokeFn { id });
        }
    });

    let table = move || {
        jokes.get().map(|result| match result {
            Ok(list) if list.is_empty() => view! {
                <p class="admin-empty">"Inga skämt hittades. Lägg till några för att komma igång!"</p>
            }
            .into_any(),
            Ok(list) => view! {
                <table class="admin-table">
                    <thead>
                        <tr>
                            <th class="admin-table__id">"ID"</th>
                            <th>"Innehåll"</th>
                            <th class="admin-table__count">"Gillningar"</th>
                            <th class="admin-table__count">"Ogillamark."</th>
                            <th class="admin-table__actions">"Åtgärder"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {list
                            .into_iter()
                            .map(|joke| view! {
                                <JokeRow joke=joke editing=editing on_save=on_save on_delete=on_delete/>
                            })
                            .collect_view()}
                    </tbody>
                </table>
            }
            .into_any(),
            Err(e) => view! { <ErrorDisplay message=error_message(&e)/> }.into_any(),
        })
    };

    view! {
        <div class="admin">
            <header class="admin__header">
                <h1>"Garva Admin Panel"</h1>
                <button class="button button--danger" on:click=move |_| { logout.dispatch(AdminLogoutFn {}); }>
                    "Logga ut"
                </button>
            </header>

            <section class="admin__panel">
                <h2>"Lägg till nytt skämt"</h2>
                <form on:submit=on_create>
                    // Remounted after each successful create so the editor starts empty.
                    {move || {
                        editor_epoch.track();
                        view! {
                            <JokeEditor
                                value=new_joke
                                placeholder="Skriv in skämtets innehåll (stödjer flera stycken)"
                            />
                        }
                    }}
                    <button
                        type="submit"
                        class="button button--primary"
                        prop:disabled=move || create.pending().get()
                    >
                        "Lägg till skämt"
                    </button>
                </form>
            </section>

            <section class="admin__panel admin__filters">
                <label>
                    "Sök"
                    <input
                        type="text"
                        placeholder="Sök skämt..."
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Sortera efter"
                    <select
                        prop:value=move || sort_by.get().as_str()
                        on:change=move |ev| sort_by.set(SortField::parse(&event_target_value(&ev)))
                    >
                        <option value="id">"ID"</option>
                        <option value="upvotes">"Gillningar"</option>
                        <option value="downvotes">"Ogillamarkeringar"</option>
                        <option value="createdAt">"Skapad datum"</option>
                    </select>
                </label>
                <label>
                    "Sorteringsordning"
                    <select
                        prop:value=move || sort_order.get().as_str()
                        on:change=move |ev| sort_order.set(SortOrder::parse(&event_target_value(&ev)))
                    >
                        <option value="asc">"Stigande"</option>
                        <option value="desc">"Fallande"</option>
                    </select>
                </label>
            </section>

            <section class="admin__panel admin__jokes">
                <Transition fallback=move || view! { <LoadingSpinner/> }>{table}</Transition>
            </section>
        </div>
    }
}
