#![recursion_limit = "256"]
mod sitemap;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use garva_app::application::parse_joke_id;
use garva_app::domain::{VoteRequest, VoteResult};
use garva_app::{AppConfig, AppContext};
use garva_errors::AppError;
use garva_ui::pages::{
    AdminLoginFn, AdminLogoutFn, CreateJokeFn, DeleteJokeFn, GetJokesFn, IsAdminFn, ListJokesFn,
    UpdateJokeFn, VoteJokeFn,
};
use garva_ui::App;
use leptos::prelude::*;
use leptos_axum::{generate_route_list, handle_server_fns_with_context, LeptosRoutes};
use tower_http::compression::CompressionLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let conf = get_configuration(Some("Cargo.toml")).expect("Failed to load Leptos config");
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app_context = match AppContext::connect(&config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    let routes = generate_route_list(App);

    server_fn::axum::register_explicit::<GetJokesFn>();
    server_fn::axum::register_explicit::<VoteJokeFn>();
    server_fn::axum::register_explicit::<AdminLoginFn>();
    server_fn::axum::register_explicit::<AdminLogoutFn>();
    server_fn::axum::register_explicit::<IsAdminFn>();
    server_fn::axum::register_explicit::<ListJokesFn>();
    server_fn::axum::register_explicit::<CreateJokeFn>();
    server_fn::axum::register_explicit::<UpdateJokeFn>();
    server_fn::axum::register_explicit::<DeleteJokeFn>();
    tracing::info!("Registered server functions");

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name("garva_session")
        .with_secure(config.site_url.starts_with("https://"))
        .with_same_site(SameSite::Strict)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(24)));

    let app = Router::new()
        .route("/api/jokes", get({
            let ctx = app_context.clone();
            move || {
                let ctx = ctx.clone();
                async move { list_jokes(ctx).await }
            }
        }))
        .route("/api/jokes/{id}/vote", post({
            let ctx = app_context.clone();
            move |Path(id): Path<String>, body: Result<Json<VoteRequest>, JsonRejection>| {
                let ctx = ctx.clone();
                async move { cast_vote(ctx, id, body).await }
            }
        }))
        .route("/sitemap.xml", get({
            let site_url = app_context.site_url.clone();
            move || {
                let site_url = site_url.clone();
                async move {
                    (
                        [(header::CONTENT_TYPE, "application/xml")],
                        sitemap::render(&site_url, chrono::Utc::now()),
                    )
                }
            }
        }))
        .route("/api/{*fn_name}", post({
            let ctx = app_context.clone();
            move |req| {
                let ctx = ctx.clone();
                async move {
                    handle_server_fns_with_context(
                        move || provide_context(ctx.clone()),
                        req
                    ).await
                }
            }
        }))
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let ctx = app_context.clone();
                move || provide_context(ctx.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .layer(session_layer)
        .layer(CompressionLayer::new())
        .with_state(leptos_options);

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}

async fn list_jokes(ctx: AppContext) -> Result<impl IntoResponse, AppError> {
    let jokes = ctx.manage_jokes.catalog().await?;
    Ok(Json(serde_json::json!({ "jokes": jokes })))
}

async fn cast_vote(
    ctx: AppContext,
    id: String,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResult>, AppError> {
    let joke_id = parse_joke_id(&id)?;
    let Json(request) = body.map_err(|e| AppError::InvalidAction(e.body_text()))?;

    let result = ctx.cast_vote.execute(joke_id, request).await?;
    Ok(Json(result))
}

fn shell(options: LeptosOptions) -> impl IntoView {
    use leptos_meta::*;

    let css = r#"
        :root {
            --base: #faf4ed;
            --surface: #fffaf3;
            --overlay: #f2e9e1;
            --muted: #9893a5;
            --subtle: #797593;
            --text: #575279;
            --love: #b4637a;
            --gold: #ea9d34;
            --pine: #286983;
            --foam: #56949f;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        html, body { height: 100%; }
        body {
            font-family: 'Inter', -apple-system, sans-serif;
            background: var(--base);
            color: var(--text);
            min-height: 100dvh;
        }
        .container { max-width: 960px; margin: 0 auto; padding: 1.5rem; }
        .deck { display: flex; flex-direction: column; align-items: center; gap: 1rem; padding-top: 2rem; user-select: none; }
        .deck__stack { position: relative; width: min(92vw, 420px); height: min(70dvh, 560px); }
        .deck__card {
            position: absolute; inset: 0; border-radius: 20px; color: #fff;
            box-shadow: 0 12px 32px rgba(0, 0, 0, 0.18); touch-action: pan-y; cursor: grab;
        }
        .deck__card--current:active { cursor: grabbing; }
        .deck__card--backdrop { pointer-events: none; }
        .deck__hint { color: var(--subtle); font-size: 0.9rem; }
        .deck-empty { text-align: center; padding: 4rem 1rem; color: var(--subtle); font-size: 1.1rem; }
        .card { display: flex; flex-direction: column; justify-content: space-between; height: 100%; padding: 2rem 1.5rem; }
        .card__text { font-size: 1.35rem; line-height: 1.6; overflow-y: auto; }
        .card__text p { margin-bottom: 0.75rem; }
        .card__votes { display: flex; justify-content: center; gap: 1.5rem; }
        .vote-button {
            display: flex; align-items: center; gap: 0.5rem; padding: 0.6rem 1.2rem;
            border: 2px solid rgba(255, 255, 255, 0.6); border-radius: 999px;
            background: rgba(255, 255, 255, 0.12); color: #fff; font-size: 1.1rem; cursor: pointer;
            transition: transform 0.2s ease, background 0.2s ease;
        }
        .vote-button--active { background: rgba(255, 255, 255, 0.9); color: var(--text); }
        .vote-button--bump { transform: scale(1.2); }
        .loading { display: flex; flex-direction: column; align-items: center; padding: 3rem; }
        .loading__spinner {
            width: 50px; height: 50px; border: 4px solid var(--overlay);
            border-top-color: var(--gold); border-radius: 50%; animation: spin 1s linear infinite;
        }
        @keyframes spin { to { transform: rotate(360deg); } }
        .loading__text { margin-top: 1rem; color: var(--subtle); font-style: italic; }
        .error { background: #fce8ec; border: 2px solid var(--love); border-radius: 8px; padding: 1.25rem; margin: 2rem 0; }
        .error__title { color: var(--love); font-weight: 700; margin-bottom: 0.5rem; }
        .error__message { color: #8b3d4d; }
        .error__retry { margin-top: 1rem; padding: 0.5rem 1rem; background: var(--love); color: var(--base); border: none; border-radius: 4px; cursor: pointer; }
        .button { padding: 0.6rem 1.4rem; border: none; border-radius: 8px; font-weight: 600; cursor: pointer; color: var(--base); }
        .button--primary { background: var(--pine); }
        .button--danger { background: var(--love); }
        .button:disabled { background: var(--muted); cursor: not-allowed; }
        .link { background: none; border: none; color: var(--pine); font-weight: 600; cursor: pointer; margin-right: 0.5rem; }
        .link--save { color: #3b7a57; }
        .link--danger { color: var(--love); }
        .admin-login { max-width: 420px; margin: 4rem auto; text-align: center; }
        .admin-login__title { color: var(--love); font-size: 2rem; }
        .admin-login__subtitle { color: var(--subtle); margin: 0.5rem 0 2rem; }
        .login-form { display: flex; flex-direction: column; gap: 1rem; text-align: left; background: var(--surface); padding: 2rem; border-radius: 12px; border: 2px solid var(--overlay); }
        .login-form__field { display: flex; flex-direction: column; gap: 0.4rem; font-size: 0.9rem; }
        .login-form__error { background: #fce8ec; color: #8b3d4d; padding: 0.75rem; border-radius: 6px; }
        .admin__header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 2rem; }
        .admin__panel { background: var(--surface); border: 2px solid var(--overlay); border-radius: 12px; padding: 1.5rem; margin-bottom: 1.5rem; }
        .admin__panel h2 { margin-bottom: 1rem; font-size: 1.2rem; }
        .admin__filters { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; }
        .admin__filters label { display: flex; flex-direction: column; gap: 0.4rem; font-size: 0.9rem; }
        input, select, textarea { padding: 0.6rem 0.8rem; border: 2px solid var(--overlay); border-radius: 8px; background: var(--base); color: var(--text); font: inherit; }
        .editor { border: 2px solid var(--overlay); border-radius: 8px; margin-bottom: 1rem; background: var(--base); }
        .editor__content, .editor__source { width: 100%; min-height: 150px; padding: 1rem; border: none; outline: none; }
        .editor__content:empty::before { content: attr(data-placeholder); color: var(--muted); }
        .editor__source { font-family: monospace; font-size: 0.9rem; }
        .editor__footer { display: flex; justify-content: space-between; padding: 0.6rem 1rem; border-top: 1px solid var(--overlay); font-size: 0.8rem; color: var(--subtle); }
        .editor__toggle { background: none; border: none; color: var(--pine); cursor: pointer; font-weight: 600; }
        .admin-table { width: 100%; border-collapse: collapse; }
        .admin-table th { text-align: left; font-size: 0.75rem; text-transform: uppercase; color: var(--subtle); padding: 0.75rem; }
        .admin-table td { padding: 0.75rem; border-top: 1px solid var(--overlay); vertical-align: top; }
        .admin-table__id { width: 4rem; }
        .admin-table__count { width: 6rem; }
        .admin-table__actions { width: 9rem; white-space: nowrap; }
        .admin-table__input { width: 100%; min-height: 2.5rem; }
        .admin-table__input--count { width: 5rem; }
        .admin-empty { text-align: center; padding: 3rem 0; color: var(--subtle); }
    "#;

    view! {
        <!DOCTYPE html>
        <html lang="sv">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>"Garva"</title>
                <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>😂</text></svg>"/>
                <style>{css}</style>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}
