use leptos::prelude::*;

/// Paragraph editor for joke bodies. Writes HTML into `value`; the source
/// view edits that HTML directly.
#[component]
pub fn JokeEditor(
    value: RwSignal<String>,
    #[prop(optional, into)] placeholder: Option<String>,
) -> impl IntoView {
    let show_source = RwSignal::new(false);
    let placeholder = placeholder.unwrap_or_default();

    let body = move || {
        if show_source.get() {
            view! {
                <textarea
                    class="editor__source"
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                ></textarea>
            }
            .into_any()
        } else {
            // Seeded once per mode switch so typing keeps the caret in place.
            view! {
                <div
                    class="editor__content"
                    contenteditable="true"
                    data-placeholder=placeholder.clone()
                    inner_html=value.get_untracked()
                    on:input=move |ev| {
                        let target = event_target::<web_sys::HtmlElement>(&ev);
                        value.set(target.inner_html());
                    }
                ></div>
            }
            .into_any()
        }
    };

    view! {
        <div class="editor">
            {body}
            <div class="editor__footer">
                <span>"Enter = ny paragraf • Shift+Enter = radbrytning"</span>
                <button
                    type="button"
                    class="editor__toggle"
                    on:click=move |_| show_source.update(|s| *s = !*s)
                >
                    {move || if show_source.get() { "← Tillbaka" } else { "Visa HTML" }}
                </button>
            </div>
        </div>
    }
}

/// Visible text of an HTML fragment, used to reject bodies that are only markup.
pub fn plain_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_strips_tags() {
        assert_eq!(plain_text("<p>Hej</p><p>då</p>"), "Hejdå");
        assert_eq!(plain_text("  vanlig text "), "vanlig text");
    }

    #[test]
    fn test_plain_text_of_empty_markup() {
        assert_eq!(plain_text("<p><br></p>"), "");
        assert_eq!(plain_text("<div>&nbsp;</div>"), "");
    }
}
