use crate::browser::{BrowserScheduler, BrowserStorage};
use crate::components::{CardContent, LoadingSpinner};
use crate::pages::vote_joke;
use garva_app::deck::{Deck, DeckCard, Direction, Motion, SwipeController};
use garva_app::domain::{Joke, VoteKind};
use garva_app::vote::{VoteLedger, VoteReconciler, VoteSubmission};
use garva_errors::AppError;
use leptos::ev::PointerEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos::wasm_bindgen::JsCast;
use std::collections::BTreeMap;
use web_sys::Element;

type Votes = VoteReconciler<BrowserStorage, BrowserScheduler>;

/// Swipeable stack of joke cards. Dragging left moves forward, dragging right
/// goes back through the cards already seen.
#[component]
pub fn JokeDeck(jokes: Vec<Joke>) -> impl IntoView {
    let deck = match Deck::new(jokes, &mut rand::thread_rng()) {
        Ok(deck) => RwSignal::new(deck),
        Err(e) => {
            return view! {
                <div class="deck-empty">
                    <p>{e.user_message().to_string()}</p>
                </div>
            }
            .into_any()
        }
    };

    let swipe = RwSignal::new(SwipeController::new());
    let motion = RwSignal::new(None::<Motion>);
    let drag_origin = StoredValue::new(None::<f64>);
    let mounted = RwSignal::new(false);
    let user_votes = RwSignal::new(BTreeMap::<i32, VoteKind>::new());
    let votes = StoredValue::new(None::<Votes>);

    let on_fire = Callback::new(move |submission: VoteSubmission| {
        votes.update_value(|v| {
            if let Some(v) = v.as_mut() {
                v.dispatched(&submission);
            }
        });

        spawn_local(async move {
            let request = submission.request;
            let result = vote_joke(
                submission.joke_id,
                request.action.as_str().to_string(),
                request.previous_vote.map(|v| v.as_str().to_string()),
            )
            .await;

            match result {
                Ok(result) => {
                    let confirmed = votes
                        .try_update_value(|v| v.as_mut().and_then(|v| v.confirm(&submission, result)))
                        .flatten();
                    if let Some(counts) = confirmed {
                        deck.update(|d| d.apply_counts(submission.joke_id, counts));
                    }
                }
                Err(e) => {
                    let error = AppError::Internal(e.to_string());
                    votes.update_value(|v| {
                        if let Some(v) = v.as_mut() {
                            v.fail(&submission, &error);
                        }
                    });
                }
            }
        });
    });

    // Browser-only state: the stored ledger and the timers behind it.
    Effect::new(move |_| {
        let reconciler = VoteReconciler::new(
            VoteLedger::new(BrowserStorage),
            BrowserScheduler::new(on_fire),
        );
        user_votes.set(reconciler.ledger().all());
        votes.set_value(Some(reconciler));
        mounted.set(true);
    });

    let on_vote = Callback::new(move |(joke_id, pressed): (i32, VoteKind)| {
        let displayed = deck
            .with_untracked(|d| d.counts(joke_id))
            .unwrap_or_default();
        let outcome = votes
            .try_update_value(|v| v.as_mut().map(|v| v.press(joke_id, pressed, displayed)))
            .flatten();
        let Some(outcome) = outcome else { return };

        deck.update(|d| d.apply_counts(joke_id, outcome.counts));
        user_votes.update(|m| match outcome.vote {
            Some(vote) => {
                m.insert(joke_id, vote);
            }
            None => {
                m.remove(&joke_id);
            }
        });
    });

    let play = move |m: Motion| {
        motion.set(Some(m));
        set_timeout(
            move || {
                match swipe.try_update(|s| s.finish()).flatten() {
                    Some(Direction::Forward) => deck.update(|d| {
                        d.advance(&mut rand::thread_rng());
                    }),
                    Some(Direction::Backward) => deck.update(|d| {
                        d.retreat();
                    }),
                    None => {}
                }
                motion.set(None);
            },
            m.duration(),
        );
    };

    let on_pointer_down = move |ev: PointerEvent| {
        if swipe.try_update(|s| s.begin()).unwrap_or(false) {
            drag_origin.set_value(Some(ev.client_x() as f64));
            // Keep move/up on the card once the pointer outruns it.
            if let Some(card) = ev.current_target().and_then(|t| t.dyn_into::<Element>().ok()) {
                if let Err(e) = card.set_pointer_capture(ev.pointer_id()) {
                    tracing::debug!(?e, "Pointer capture unavailable");
                }
            }
        }
    };

    let on_pointer_move = move |ev: PointerEvent| {
        let Some(origin) = drag_origin.get_value() else { return };
        let neighbors = deck.with_untracked(Deck::neighbors);
        swipe.update(|s| s.drag(ev.client_x() as f64 - origin, neighbors));
    };

    let on_pointer_up = move |ev: PointerEvent| {
        let Some(origin) = drag_origin.get_value() else { return };
        drag_origin.set_value(None);
        let neighbors = deck.with_untracked(Deck::neighbors);
        let released = swipe
            .try_update(|s| s.release(ev.client_x() as f64 - origin, neighbors))
            .flatten();
        if let Some(m) = released {
            play(m);
        }
    };

    let peek = Memo::new(move |_| swipe.with(SwipeController::peek));
    let current_key = Memo::new(move |_| deck.with(|d| d.current().map(|c| c.key)));
    let backdrop_key = Memo::new(move |_| deck.with(|d| d.backdrop(peek.get()).map(|c| c.key)));

    let card_counts = move |key: uuid::Uuid| {
        Signal::derive(move || {
            deck.with(|d| {
                d.cards()
                    .iter()
                    .find(|c| c.key == key)
                    .map(DeckCard::counts)
                    .unwrap_or_default()
            })
        })
    };

    let card_vote = move |joke_id: i32| {
        Signal::derive(move || user_votes.with(|m| m.get(&joke_id).copied()))
    };

    let current_view = move || {
        let key = current_key.get()?;
        let card = deck.with_untracked(|d| d.current().cloned())?;
        let color = card.color.to_string();
        let joke_id = card.joke_id();

        let style = move || {
            let (transform, transition) = match motion.get() {
                Some(m) => (m.transform().to_string(), m.transition()),
                None => swipe.with(|s| {
                    if s.is_dragging() {
                        (s.drag_transform(), "none".to_string())
                    } else {
                        ("none".to_string(), "none".to_string())
                    }
                }),
            };
            format!(
                "background-color: {color}; z-index: 10; transform: {transform}; transition: {transition};"
            )
        };

        Some(view! {
            <article
                class="deck__card deck__card--current"
                style=style
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
                on:pointercancel=on_pointer_up
            >
                <CardContent
                    content=card.joke.content.clone()
                    counts=card_counts(key)
                    vote=card_vote(joke_id)
                    on_vote=Callback::new(move |pressed| on_vote.run((joke_id, pressed)))
                />
            </article>
        })
    };

    let backdrop_view = move || {
        let key = backdrop_key.get()?;
        let card = deck.with_untracked(|d| d.cards().iter().find(|c| c.key == key).cloned())?;
        let joke_id = card.joke_id();

        Some(view! {
            <article
                class="deck__card deck__card--backdrop"
                style=format!("background-color: {}; z-index: 5;", card.color)
                aria-hidden="true"
            >
                <CardContent
                    content=card.joke.content.clone()
                    counts=card_counts(key)
                    vote=card_vote(joke_id)
                    muted=true
                />
            </article>
        })
    };

    let hint = move || {
        if deck.with(|d| d.neighbors().has_previous) {
            "← Svep åt vänster för nästa, åt höger för föregående →"
        } else {
            "← Svep åt vänster för nästa skämt"
        }
    };

    view! {
        {move || {
            if !mounted.get() {
                return view! { <LoadingSpinner/> }.into_any();
            }
            view! {
                <section class="deck">
                    <div class="deck__stack">{backdrop_view} {current_view}</div>
                    <p class="deck__hint">{hint}</p>
                </section>
            }
            .into_any()
        }}
    }
    .into_any()
}

