//! Document and template upload forms

use review_core::UploadFlow;
use web_sys::{File, HtmlInputElement, SubmitEvent};
use yew::prelude::*;

/// First file selected in a file input
fn selected_file(input: &NodeRef) -> Option<File> {
    input
        .cast::<HtmlInputElement>()
        .and_then(|input| input.files())
        .and_then(|files| files.get(0))
}

#[derive(Properties, PartialEq)]
pub struct UploadFormProps {
    pub flow: UploadFlow,
    /// Called with `(image, json)`; presence is validated by the receiver
    pub on_submit: Callback<(Option<File>, Option<File>)>,
}

#[function_component(UploadForm)]
pub fn upload_form(props: &UploadFormProps) -> Html {
    let image_input = use_node_ref();
    let json_input = use_node_ref();
    let combined = props.flow == UploadFlow::Combined;

    let onsubmit = {
        let image_input = image_input.clone();
        let json_input = json_input.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let json = if combined {
                selected_file(&json_input)
            } else {
                None
            };
            on_submit.emit((selected_file(&image_input), json));
        })
    };

    html! {
        <form id="processImageForm" class="upload-form" {onsubmit}>
            if combined {
                <div class="mb-3">
                    <label for="jsonFile" class="form-label">{ "Template JSON" }</label>
                    <input
                        type="file"
                        id="jsonFile"
                        class="form-control"
                        accept=".json,application/json"
                        ref={json_input}
                    />
                </div>
            }
            <div class="mb-3">
                <label for="imageFile" class="form-label">{ "Scanned image" }</label>
                <input
                    type="file"
                    id="imageFile"
                    class="form-control"
                    accept="image/*"
                    ref={image_input}
                />
            </div>
            <button type="submit" class="btn btn-primary">
                { if combined { "Load Data" } else { "Process Image" } }
            </button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct TemplateFormProps {
    pub on_submit: Callback<Option<File>>,
}

#[function_component(TemplateForm)]
pub fn template_form(props: &TemplateFormProps) -> Html {
    let json_input = use_node_ref();

    let onsubmit = {
        let json_input = json_input.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(selected_file(&json_input));
        })
    };

    html! {
        <form id="createTemplateForm" class="template-form" {onsubmit}>
            <div class="mb-3">
                <label for="templateFile" class="form-label">{ "Template JSON" }</label>
                <input
                    type="file"
                    id="templateFile"
                    class="form-control"
                    accept=".json,application/json"
                    ref={json_input}
                />
            </div>
            <button type="submit" class="btn btn-secondary">{ "Create Template" }</button>
        </form>
    }
}
