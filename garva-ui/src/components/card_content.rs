use garva_app::domain::{VoteCounts, VoteKind};
use leptos::prelude::*;
use std::time::Duration;

const BUMP: Duration = Duration::from_millis(200);

/// Joke body (stored as HTML) with its vote buttons. A muted card shows the counters but
/// ignores presses.
#[component]
pub fn CardContent(
    #[prop(into)] content: String,
    #[prop(into)] counts: Signal<VoteCounts>,
    #[prop(into)] vote: Signal<Option<VoteKind>>,
    #[prop(optional)] muted: bool,
    #[prop(optional)] on_vote: Option<Callback<VoteKind>>,
) -> impl IntoView {
    view! {
        <div class="card">
            <div class="card__text" inner_html=content></div>
            <div class="card__votes">
                <VoteButton
                    kind=VoteKind::Upvote
                    count=Signal::derive(move || counts.get().upvotes)
                    vote=vote
                    muted=muted
                    on_vote=on_vote
                />
                <VoteButton
                    kind=VoteKind::Downvote
                    count=Signal::derive(move || counts.get().downvotes)
                    vote=vote
                    muted=muted
                    on_vote=on_vote
                />
            </div>
        </div>
    }
}

#[component]
fn VoteButton(
    kind: VoteKind,
    #[prop(into)] count: Signal<i32>,
    vote: Signal<Option<VoteKind>>,
    muted: bool,
    on_vote: Option<Callback<VoteKind>>,
) -> impl IntoView {
    let bumped = RwSignal::new(false);

    let (icon, label) = match kind {
        VoteKind::Upvote => ("👍", "Rösta upp"),
        VoteKind::Downvote => ("👎", "Rösta ner"),
    };

    let class = move || {
        let mut class = format!("vote-button vote-button--{}", kind.as_str());
        if vote.get() == Some(kind) {
            class.push_str(" vote-button--active");
        }
        if bumped.get() {
            class.push_str(" vote-button--bump");
        }
        class
    };

    let on_click = move |_| {
        if muted {
            return;
        }
        if let Some(on_vote) = on_vote {
            bumped.set(true);
            set_timeout(move || bumped.set(false), BUMP);
            on_vote.run(kind);
        }
    };

    view! {
        <button
            type="button"
            class=class
            aria-label=label
            aria-pressed=move || (vote.get() == Some(kind)).to_string()
            tabindex=if muted { "-1" } else { "0" }
            on:pointerdown=|ev| ev.stop_propagation()
            on:click=on_click
        >
            <span class="vote-button__icon">{icon}</span>
            <span class="vote-button__count">{move || count.get()}</span>
        </button>
    }
}
