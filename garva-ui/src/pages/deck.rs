use crate::components::{ErrorDisplay, JokeDeck, LoadingSpinner};
use garva_app::domain::{Joke, VoteResult};
use leptos::prelude::*;
use server_fn::ServerFnError;

#[server(GetJokesFn, "/api", endpoint = "catalog")]
pub async fn get_jokes() -> Result<Vec<Joke>, ServerFnError> {
    use garva_app::AppContext;

    let ctx = expect_context::<AppContext>();

    ctx.manage_jokes
        .catalog()
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

#[server(VoteJokeFn, "/api", endpoint = "vote_joke")]
pub async fn vote_joke(
    joke_id: i32,
    action: String,
    previous_vote: Option<String>,
) -> Result<VoteResult, ServerFnError> {
    use garva_app::domain::{VoteAction, VoteKind, VoteRequest};
    use garva_app::AppContext;

    let ctx = expect_context::<AppContext>();

    let action: VoteAction = action
        .parse()
        .map_err(|e: garva_errors::AppError| ServerFnError::new(e.user_message()))?;
    let previous_vote = previous_vote
        .as_deref()
        .map(str::parse::<VoteKind>)
        .transpose()
        .map_err(|e| ServerFnError::new(e.user_message()))?;

    ctx.cast_vote
        .execute(
            joke_id,
            VoteRequest {
                action,
                previous_vote,
            },
        )
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

#[component]
pub fn DeckPage() -> impl IntoView {
    let jokes = Resource::new(|| (), |_| get_jokes());

    view! {
        <Suspense fallback=move || view! { <LoadingSpinner/> }>
            {move || {
                jokes.get().map(|result| match result {
                    Ok(jokes) => view! { <JokeDeck jokes=jokes/> }.into_any(),
                    Err(e) => {
                        tracing::error!("Unable to load jokes: {}", e);
                        view! { <ErrorDisplay message="Kunde inte ladda skämten just nu."/> }.into_any()
                    }
                })
            }}
        </Suspense>
    }
}
