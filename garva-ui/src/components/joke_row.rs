use garva_app::domain::StoredJoke;
use leptos::prelude::*;

/// One row of the admin table. Switches to inline inputs while `editing`
/// holds this joke.
#[component]
pub fn JokeRow(
    joke: StoredJoke,
    editing: RwSignal<Option<StoredJoke>>,
    on_save: Callback<StoredJoke>,
    on_delete: Callback<i32>,
) -> impl IntoView {
    let id = joke.id;
    let is_editing = Memo::new(move |_| editing.with(|e| e.as_ref().map(|e| e.id) == Some(id)));

    let edit_field = move |f: fn(&mut StoredJoke, String)| {
        move |ev: leptos::ev::Event| {
            let value = event_target_value(&ev);
            editing.update(|e| {
                if let Some(e) = e.as_mut() {
                    f(e, value);
                }
            });
        }
    };

    move || {
        if is_editing.get() {
            let draft = editing.get_untracked().unwrap_or_else(|| joke.clone());
            view! {
                <tr class="admin-table__row admin-table__row--editing">
                    <td>{id}</td>
                    <td>
                        <textarea
                            class="admin-table__input"
                            prop:value=draft.content
                            on:input=edit_field(|e, v| e.content = v)
                        ></textarea>
                    </td>
                    <td>
                        <input
                            type="number"
                            class="admin-table__input admin-table__input--count"
                            prop:value=draft.upvotes.to_string()
                            on:input=edit_field(|e, v| e.upvotes = v.parse().unwrap_or(0))
                        />
                    </td>
                    <td>
                        <input
                            type="number"
                            class="admin-table__input admin-table__input--count"
                            prop:value=draft.downvotes.to_string()
                            on:input=edit_field(|e, v| e.downvotes = v.parse().unwrap_or(0))
                        />
                    </td>
                    <td class="admin-table__actions">
                        <button
                            class="link link--save"
                            on:click=move |_| {
                                if let Some(joke) = editing.get_untracked() {
                                    on_save.run(joke);
                                }
                            }
                        >
                            "Spara"
                        </button>
                        <button class="link" on:click=move |_| editing.set(None)>
                            "Avbryt"
                        </button>
                    </td>
                </tr>
            }
            .into_any()
        } else {
            let joke = joke.clone();
            let selected = joke.clone();
            view! {
                <tr class="admin-table__row">
                    <td>{joke.id}</td>
                    <td><div class="admin-table__content" inner_html=joke.content></div></td>
                    <td>{joke.upvotes}</td>
                    <td>{joke.downvotes}</td>
                    <td class="admin-table__actions">
                        <button
                            class="link"
                            on:click=move |_| editing.set(Some(selected.clone()))
                        >
                            "Redigera"
                        </button>
                        <button class="link link--danger" on:click=move |_| on_delete.run(id)>
                            "Ta bort"
                        </button>
                    </td>
                </tr>
            }
            .into_any()
        }
    }
}
