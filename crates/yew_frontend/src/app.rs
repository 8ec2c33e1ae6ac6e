//! Main application component
//!
//! Owns the [`ReviewState`] for the page. Every user action runs the
//! matching `begin_*` step synchronously, then the request is sent through
//! `send_future` and its outcome comes back as a `*Finished` message, so
//! several requests may be in flight at once.

use crate::api::GlooReviewApi;
use crate::components::image_panel::ImagePanelView;
use crate::components::status::StatusAlert;
use crate::components::text_list::TextList;
use crate::components::upload::{TemplateForm, UploadForm};
use review_core::api::send_upload;
use review_core::{
    EditAck, LoadedDocument, ReviewApi, ReviewConfig, ReviewError, ReviewState, SavedSession,
    UpdateRequest, UploadFlow,
};
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::File;
use yew::prelude::*;

pub enum Msg {
    SubmitUpload(Option<File>, Option<File>),
    LoadFinished(Result<LoadedDocument, ReviewError>),
    SubmitTemplate(Option<File>),
    TemplateFinished(Result<(), ReviewError>),
    Edit(usize),
    Draft(usize, String),
    Cancel(usize),
    SaveEdit(usize),
    EditFinished(UpdateRequest, Result<EditAck, ReviewError>),
    ToggleEdited(bool),
    Save,
    SaveFinished(Result<SavedSession, ReviewError>),
}

/// Read deployment flags the server page sets on `window`
pub fn page_config() -> ReviewConfig {
    let window: JsValue = gloo::utils::window().into();
    let global = |name: &str| js_sys::Reflect::get(&window, &JsValue::from_str(name)).ok();
    ReviewConfig {
        flow: flow_from_name(global("reviewFlow").and_then(|v| v.as_string()).as_deref()),
        has_template: global("hasTemplate")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
    }
}

pub fn flow_from_name(name: Option<&str>) -> UploadFlow {
    match name {
        Some("combined") => UploadFlow::Combined,
        _ => UploadFlow::TemplateFirst,
    }
}

pub struct App {
    api: Rc<GlooReviewApi>,
    state: ReviewState,
}

impl App {
    /// Surface a pending notice as a blocking alert
    fn flush_notice(&mut self) {
        if let Some(notice) = self.state.notice() {
            gloo::console::error!(notice.to_string());
            gloo::dialogs::alert(notice);
        }
        self.state.dismiss_notice();
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            api: Rc::new(GlooReviewApi::default()),
            state: ReviewState::new(page_config()),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let link = ctx.link();
        match msg {
            Msg::SubmitUpload(image, json) => {
                if let Ok(upload) = self.state.begin_load(image, json) {
                    let api = self.api.clone();
                    link.send_future(async move {
                        Msg::LoadFinished(send_upload(api.as_ref(), &upload).await)
                    });
                }
            }
            Msg::LoadFinished(result) => {
                if let Err(error) = self.state.finish_load(result) {
                    gloo::console::error!(format!("Error processing image: {}", error));
                }
            }
            Msg::SubmitTemplate(json) => {
                if let Ok(json) = self.state.begin_template(json) {
                    let api = self.api.clone();
                    link.send_future(async move {
                        Msg::TemplateFinished(api.create_template(&json).await)
                    });
                }
            }
            Msg::TemplateFinished(result) => {
                let _ = self.state.finish_template(result);
            }
            Msg::Edit(index) => {
                let _ = self.state.open_editor(index);
            }
            Msg::Draft(index, draft) => self.state.set_draft(index, draft),
            Msg::Cancel(index) => {
                self.state.cancel_edit(index);
            }
            Msg::SaveEdit(index) => {
                if let Ok(request) = self.state.submit_edit(index) {
                    let api = self.api.clone();
                    link.send_future(async move {
                        let result = api.update_text(&request).await;
                        Msg::EditFinished(request, result)
                    });
                }
            }
            Msg::EditFinished(request, result) => {
                let _ = self.state.finish_edit(&request, result);
            }
            Msg::ToggleEdited(only_edited) => self.state.set_only_edited(only_edited),
            Msg::Save => {
                if self.state.begin_save().is_ok() {
                    let api = self.api.clone();
                    link.send_future(async move { Msg::SaveFinished(api.save().await) });
                }
            }
            Msg::SaveFinished(result) => {
                let _ = self.state.finish_save(result);
            }
        }
        self.flush_notice();
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let state = &self.state;
        let spinner_class = classes!(
            "spinner-border",
            (!state.spinner_visible()).then_some("d-none")
        );
        let save_class = classes!(state
            .save_message()
            .map(|m| if m.is_error() { "error" } else { "success" }));

        html! {
            <div class="app container">
                <header class="app-header">
                    <h1>{ "OCR Review" }</h1>
                    <p>{ "Upload a scan, correct the editable text, and save" }</p>
                </header>
                <main class="app-main">
                    <section class="upload-section">
                        if state.flow() == UploadFlow::TemplateFirst {
                            <>
                                <TemplateForm on_submit={link.callback(Msg::SubmitTemplate)} />
                                <StatusAlert message={state.template_message().cloned()} />
                            </>
                        }
                        <UploadForm
                            flow={state.flow()}
                            on_submit={link.callback(|(image, json)| Msg::SubmitUpload(image, json))}
                        />
                        <div id="spinner" class={spinner_class} role="status"></div>
                        <div id="processResult">
                            <StatusAlert message={state.process_message().cloned()} />
                        </div>
                    </section>
                    <section class="row images-section">
                        <div class="col-md-6">
                            <h3>{ "Original Image" }</h3>
                            <div id="originalImageContainer">
                                <ImagePanelView panel={state.original_image().clone()} alt="Original Image" />
                            </div>
                        </div>
                        <div class="col-md-6">
                            <h3>{ "Annotated Image" }</h3>
                            <div id="imageContainer">
                                <ImagePanelView
                                    panel={state.annotated_image().clone()}
                                    alt="Annotated Image"
                                    legend=true
                                />
                            </div>
                        </div>
                    </section>
                    <section id="textResults" class="text-section">
                        <TextList
                            view={state.text_list()}
                            on_edit={link.callback(Msg::Edit)}
                            on_draft={link.callback(|(index, draft)| Msg::Draft(index, draft))}
                            on_cancel={link.callback(Msg::Cancel)}
                            on_save={link.callback(Msg::SaveEdit)}
                            on_toggle_edited={link.callback(Msg::ToggleEdited)}
                        />
                    </section>
                    <section class="save-section">
                        <button
                            id="saveBtn"
                            class="btn btn-success"
                            disabled={!state.save_enabled()}
                            onclick={link.callback(|_| Msg::Save)}
                        >
                            { "Save" }
                        </button>
                        <div id="saveResult" class={save_class}>
                            { state.save_message().map(|m| m.text.clone()).unwrap_or_default() }
                        </div>
                    </section>
                </main>
            </div>
        }
    }
}
