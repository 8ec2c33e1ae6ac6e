//! Editable text items
//!
//! Cards are keyed and tagged by their index in the full OCR result list,
//! which is the identity the server uses for updates.

use review_core::view::{
    CardView, TextListView, EMPTY_TEXT, NO_EDITABLE_DETAIL, NO_EDITABLE_TITLE, NO_RESULTS,
};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

/// Inline style for a card under the "show only edited" toggle
pub fn card_style(card: &CardView, only_edited: bool) -> &'static str {
    if card.is_visible(only_edited) {
        ""
    } else {
        "display: none"
    }
}

#[derive(Properties, PartialEq)]
pub struct TextListProps {
    pub view: TextListView,
    pub on_edit: Callback<usize>,
    pub on_draft: Callback<(usize, String)>,
    pub on_cancel: Callback<usize>,
    pub on_save: Callback<usize>,
    pub on_toggle_edited: Callback<bool>,
}

#[function_component(TextList)]
pub fn text_list(props: &TextListProps) -> Html {
    match &props.view {
        TextListView::Placeholder(copy) => html! { <p class="text-muted">{ *copy }</p> },
        TextListView::NoResults => html! { <div class="no-results">{ NO_RESULTS }</div> },
        TextListView::NoEditableText { causes } => html! {
            <div class="alert alert-info">
                <strong>{ NO_EDITABLE_TITLE }</strong>{ " " }{ NO_EDITABLE_DETAIL }
                <br />
                { "If you were expecting editable content, try one of these:" }
                <ul>
                    { for causes.iter().map(|cause| html! { <li>{ *cause }</li> }) }
                </ul>
            </div>
        },
        TextListView::Cards {
            template_note,
            editable_count,
            only_edited,
            cards,
        } => {
            let onchange = props.on_toggle_edited.reform(|e: Event| {
                e.target_unchecked_into::<HtmlInputElement>().checked()
            });
            html! {
                <>
                    <div class="mb-4">
                        <div class="alert alert-info">
                            <strong>{ "Template-Based Mode:" }</strong>{ " " }{ *template_note }
                        </div>
                        <div class="d-flex justify-content-between align-items-center">
                            <h4>{ format!("Editable Text Items ({})", editable_count) }</h4>
                            <div class="form-check form-switch">
                                <input
                                    class="form-check-input"
                                    type="checkbox"
                                    id="toggleEdited"
                                    checked={*only_edited}
                                    {onchange}
                                />
                                <label class="form-check-label" for="toggleEdited">
                                    { "Show only edited items" }
                                </label>
                            </div>
                        </div>
                    </div>
                    <div class="row" id="textItemsContainer">
                        { for cards.iter().map(|card| html! {
                            <TextCard
                                key={card.index}
                                card={card.clone()}
                                only_edited={*only_edited}
                                on_edit={props.on_edit.clone()}
                                on_draft={props.on_draft.clone()}
                                on_cancel={props.on_cancel.clone()}
                                on_save={props.on_save.clone()}
                            />
                        }) }
                    </div>
                </>
            }
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct TextCardProps {
    pub card: CardView,
    pub only_edited: bool,
    pub on_edit: Callback<usize>,
    pub on_draft: Callback<(usize, String)>,
    pub on_cancel: Callback<usize>,
    pub on_save: Callback<usize>,
}

#[function_component(TextCard)]
pub fn text_card(props: &TextCardProps) -> Html {
    let card = &props.card;
    let index = card.index;
    let item_class = classes!(
        "text-item",
        "text-item-handwritten",
        card.edited.then_some("text-item-edited")
    );

    let content = match &card.editor {
        Some(editor) => {
            let oninput = props.on_draft.reform(move |e: InputEvent| {
                let value = e.target_unchecked_into::<HtmlTextAreaElement>().value();
                (index, value)
            });
            html! {
                <>
                    <textarea class="form-control mb-2" value={editor.draft.clone()} {oninput} />
                    <div class="d-flex justify-content-end">
                        <button
                            class="btn btn-sm btn-secondary me-2 btn-cancel"
                            onclick={props.on_cancel.reform(move |_| index)}
                        >
                            { "Cancel" }
                        </button>
                        <button
                            class="btn btn-sm btn-success btn-save"
                            disabled={editor.in_flight}
                            onclick={props.on_save.reform(move |_| index)}
                        >
                            { "Save" }
                        </button>
                    </div>
                </>
            }
        }
        None => match card.display_text() {
            Some(text) => html! { { text.to_string() } },
            None => html! { <i>{ EMPTY_TEXT }</i> },
        },
    };

    html! {
        <div
            class="col-md-6 col-lg-4 text-item-container"
            data-edited={card.edited.to_string()}
            data-index={index.to_string()}
            style={card_style(card, props.only_edited)}
        >
            <div class={item_class} data-index={index.to_string()}>
                <div class="d-flex justify-content-between align-items-start">
                    <span class="text-index">{ format!("Item #{}", index) }</span>
                    <button
                        class="btn btn-sm btn-primary btn-edit"
                        data-index={index.to_string()}
                        disabled={card.editor.is_some()}
                        onclick={props.on_edit.reform(move |_| index)}
                    >
                        { "Edit" }
                    </button>
                </div>
                <div class="text-content mt-2">
                    <div class="text-type-badge badge-handwritten">{ "Editable" }</div>
                    { content }
                </div>
                <div class="text-coords">{ format!("Region: {}", card.region) }</div>
            </div>
        </div>
    }
}
