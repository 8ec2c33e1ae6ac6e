//! Review session controller
//!
//! [`ReviewState`] owns everything one review page needs: the loaded
//! [`Session`], the spinner, the output regions and the open editors. Each
//! network operation is split into a `begin_*` step that validates input and
//! enters the loading state, and a `finish_*` step that consumes the
//! endpoint result. Front ends that can overlap requests (the browser) call
//! the two halves around their own futures; [`ReviewController`] runs them
//! back to back for sequential front ends.
//!
//! The spinner is a count of requests in flight. Every `finish_*` releases
//! its slot whatever the outcome, so no failure path can leave it stuck.

use crate::api::{send_upload, ReviewApi};
use crate::error::ReviewError;
use crate::session::Session;
use crate::types::{EditAck, LoadedDocument, SavedSession, UpdateRequest, Upload, UploadFlow};
use crate::view::{
    render_text_list, Editor, ImagePanel, OutputPhase, StatusMessage, TextListView,
    ANNOTATED_IDLE, ANNOTATED_UNAVAILABLE, LOADING, ORIGINAL_IDLE, ORIGINAL_UNAVAILABLE,
};
use std::collections::BTreeMap;

/// Deployment settings for a review page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewConfig {
    /// Request-shape variant the server speaks
    pub flow: UploadFlow,
    /// Whether the server already holds a template when the page opens
    pub has_template: bool,
}

/// Client-side state of one review page
#[derive(Debug, Clone)]
pub struct ReviewState {
    config: ReviewConfig,
    has_template: bool,
    session: Option<Session>,
    generation: u64,
    in_flight: usize,
    phase: OutputPhase,
    original_image: ImagePanel,
    annotated_image: ImagePanel,
    editors: BTreeMap<usize, Editor>,
    only_edited: bool,
    process_message: Option<StatusMessage>,
    template_message: Option<StatusMessage>,
    save_message: Option<StatusMessage>,
    notice: Option<String>,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self::new(ReviewConfig::default())
    }
}

impl ReviewState {
    pub fn new(config: ReviewConfig) -> Self {
        if config.has_template {
            tracing::info!("Template is loaded. Only non-template text will be editable.");
        }
        Self {
            has_template: config.has_template,
            config,
            session: None,
            generation: 0,
            in_flight: 0,
            phase: OutputPhase::Idle,
            original_image: ImagePanel::Placeholder(ORIGINAL_IDLE),
            annotated_image: ImagePanel::Placeholder(ANNOTATED_IDLE),
            editors: BTreeMap::new(),
            only_edited: false,
            process_message: None,
            template_message: None,
            save_message: None,
            notice: None,
        }
    }

    pub fn flow(&self) -> UploadFlow {
        self.config.flow
    }

    pub fn has_template(&self) -> bool {
        self.has_template
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> OutputPhase {
        self.phase
    }

    pub fn spinner_visible(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn original_image(&self) -> &ImagePanel {
        &self.original_image
    }

    pub fn annotated_image(&self) -> &ImagePanel {
        &self.annotated_image
    }

    pub fn editor(&self, index: usize) -> Option<&Editor> {
        self.editors.get(&index)
    }

    pub fn only_edited(&self) -> bool {
        self.only_edited
    }

    /// Hide or show cards that have not been edited
    pub fn set_only_edited(&mut self, only_edited: bool) {
        self.only_edited = only_edited;
    }

    pub fn save_enabled(&self) -> bool {
        self.session.is_some()
    }

    pub fn process_message(&self) -> Option<&StatusMessage> {
        self.process_message.as_ref()
    }

    pub fn template_message(&self) -> Option<&StatusMessage> {
        self.template_message.as_ref()
    }

    pub fn save_message(&self) -> Option<&StatusMessage> {
        self.save_message.as_ref()
    }

    /// Blocking notification awaiting acknowledgement
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn text_list(&self) -> TextListView {
        render_text_list(
            self.session.as_ref(),
            self.phase,
            &self.editors,
            self.only_edited,
        )
    }

    fn reject(&mut self, message: impl Into<String>) -> ReviewError {
        let error = ReviewError::validation(message);
        self.notice = Some(error.to_string());
        error
    }

    fn release(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Validate a document upload and enter the loading state
    pub fn begin_load<F>(
        &mut self,
        image: Option<F>,
        json: Option<F>,
    ) -> Result<Upload<F>, ReviewError> {
        let upload = match (self.config.flow, image, json) {
            (UploadFlow::TemplateFirst, _, Some(_)) => {
                return Err(self.reject("Upload the template JSON with the template form"))
            }
            (UploadFlow::TemplateFirst, Some(image), None) => Upload::Image { image },
            (UploadFlow::TemplateFirst, None, None) => {
                return Err(self.reject("Image file is required"))
            }
            (UploadFlow::Combined, Some(image), Some(json)) => Upload::Combined { json, image },
            (UploadFlow::Combined, _, _) => {
                return Err(self.reject("Both JSON and image files are required"))
            }
        };

        self.in_flight += 1;
        self.phase = OutputPhase::Loading;
        self.original_image = ImagePanel::Placeholder(LOADING);
        self.annotated_image = ImagePanel::Placeholder(LOADING);
        self.editors.clear();
        self.process_message = Some(StatusMessage::info("Processing your image, please wait..."));
        tracing::debug!(flow = self.config.flow.name(), "document upload started");
        Ok(upload)
    }

    /// Apply the response to a document upload
    pub fn finish_load(
        &mut self,
        result: Result<LoadedDocument, ReviewError>,
    ) -> Result<(), ReviewError> {
        self.release();
        match result {
            Ok(document) => {
                if self.config.flow == UploadFlow::Combined {
                    self.has_template = true;
                }
                self.generation += 1;
                let count = document.ocr_results.len();
                self.session = Some(Session::load(
                    document.ocr_results,
                    self.has_template,
                    self.generation,
                ));
                self.editors.clear();
                self.only_edited = false;
                self.phase = OutputPhase::Loaded;
                self.original_image = match (document.original_image, self.config.flow) {
                    (Some(data), _) => ImagePanel::Jpeg(data),
                    (None, UploadFlow::Combined) => ImagePanel::Placeholder(ORIGINAL_IDLE),
                    (None, UploadFlow::TemplateFirst) => {
                        ImagePanel::Unavailable(ORIGINAL_UNAVAILABLE)
                    }
                };
                self.annotated_image =
                    ImagePanel::from_payload(document.image, ANNOTATED_UNAVAILABLE);
                self.process_message = Some(StatusMessage::success(format!(
                    "Image processed successfully! {} text elements detected",
                    count
                )));
                tracing::debug!(count, generation = self.generation, "document loaded");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "document upload failed");
                self.phase = OutputPhase::Idle;
                self.original_image = ImagePanel::Placeholder(ORIGINAL_IDLE);
                self.annotated_image = ImagePanel::Placeholder(ANNOTATED_IDLE);
                self.editors.clear();
                self.process_message = Some(StatusMessage::error(format!(
                    "Error processing image: {}",
                    error
                )));
                Err(error)
            }
        }
    }

    /// Validate a template upload
    pub fn begin_template<F>(&mut self, json: Option<F>) -> Result<F, ReviewError> {
        if self.config.flow != UploadFlow::TemplateFirst {
            return Err(self.reject("Templates are uploaded together with the image"));
        }
        let json = match json {
            Some(json) => json,
            None => return Err(self.reject("JSON file is required")),
        };
        self.in_flight += 1;
        self.template_message = Some(StatusMessage::info("Creating template..."));
        Ok(json)
    }

    pub fn finish_template(&mut self, result: Result<(), ReviewError>) -> Result<(), ReviewError> {
        self.release();
        match result {
            Ok(()) => {
                self.has_template = true;
                self.template_message =
                    Some(StatusMessage::success("Template created successfully"));
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "template creation failed");
                self.template_message = Some(StatusMessage::error(format!(
                    "Error creating template: {}",
                    error
                )));
                Err(error)
            }
        }
    }

    /// Swap a card into edit mode, pre-filled with its current text
    pub fn open_editor(&mut self, index: usize) -> Result<(), ReviewError> {
        let text = match (&self.session, self.phase) {
            (Some(session), OutputPhase::Loaded) if session.is_editable(index) => {
                session.item(index).map(|item| item.text.clone())
            }
            _ => None,
        };
        let Some(text) = text else {
            return Err(self.reject(format!("Text item #{} is not editable", index)));
        };
        self.editors.entry(index).or_insert_with(|| Editor {
            draft: text,
            in_flight: false,
        });
        Ok(())
    }

    pub fn set_draft(&mut self, index: usize, draft: impl Into<String>) {
        if let Some(editor) = self.editors.get_mut(&index) {
            editor.draft = draft.into();
        }
    }

    /// Close an editor without saving, returning whether one was open
    pub fn cancel_edit(&mut self, index: usize) -> bool {
        self.editors.remove(&index).is_some()
    }

    /// Validate a card's draft and mark its update as in flight
    pub fn submit_edit(&mut self, index: usize) -> Result<UpdateRequest, ReviewError> {
        let text = match self.editors.get(&index) {
            None => return Err(self.reject(format!("Text item #{} is not being edited", index))),
            Some(editor) if editor.in_flight => {
                return Err(self.reject(format!(
                    "An update for item #{} is already in progress",
                    index
                )))
            }
            Some(editor) => editor.draft.trim().to_string(),
        };
        if text.is_empty() {
            return Err(self.reject("Text cannot be empty"));
        }
        if let Some(editor) = self.editors.get_mut(&index) {
            editor.in_flight = true;
        }
        self.in_flight += 1;
        Ok(UpdateRequest {
            index,
            text,
            generation: self.generation,
        })
    }

    /// Apply the response to an update request
    ///
    /// Mutations are keyed by the request's own index, so overlapping
    /// updates to different cards commute.
    pub fn finish_edit(
        &mut self,
        request: &UpdateRequest,
        result: Result<EditAck, ReviewError>,
    ) -> Result<(), ReviewError> {
        self.release();
        if request.generation != self.generation {
            tracing::debug!(index = request.index, "dropping update for a replaced document");
            return result.map(|_| ());
        }
        match result {
            Ok(ack) => {
                if let Some(session) = self.session.as_mut() {
                    session.apply_edit(request.index, &request.text)?;
                }
                self.editors.remove(&request.index);
                if self.phase == OutputPhase::Loaded {
                    self.annotated_image =
                        ImagePanel::from_payload(ack.image, ANNOTATED_UNAVAILABLE);
                }
                tracing::debug!(index = request.index, "text updated");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(index = request.index, %error, "text update failed");
                if let Some(editor) = self.editors.get_mut(&request.index) {
                    editor.in_flight = false;
                }
                self.notice = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Check that there is something to save
    pub fn begin_save(&mut self) -> Result<(), ReviewError> {
        if self.session.is_none() {
            return Err(self.reject("No data to save"));
        }
        self.in_flight += 1;
        Ok(())
    }

    pub fn finish_save(
        &mut self,
        result: Result<SavedSession, ReviewError>,
    ) -> Result<(), ReviewError> {
        self.release();
        match result {
            Ok(saved) => {
                self.save_message = Some(StatusMessage::success(format!(
                    "Successfully saved to: {}",
                    saved.path
                )));
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "save failed");
                self.save_message = Some(StatusMessage::error(format!("Error: {}", error)));
                Err(error)
            }
        }
    }
}

/// Runs review operations end to end against one API
pub struct ReviewController<A: ReviewApi> {
    api: A,
    state: ReviewState,
}

impl<A: ReviewApi> ReviewController<A> {
    pub fn new(api: A, config: ReviewConfig) -> Self {
        Self {
            api,
            state: ReviewState::new(config),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ReviewState {
        &mut self.state
    }

    /// Upload a document and replace the session with the result
    pub async fn load_document(
        &mut self,
        image: Option<A::File>,
        json: Option<A::File>,
    ) -> Result<(), ReviewError> {
        let upload = self.state.begin_load(image, json)?;
        let result = send_upload(&self.api, &upload).await;
        self.state.finish_load(result)
    }

    pub async fn create_template(&mut self, json: Option<A::File>) -> Result<(), ReviewError> {
        let json = self.state.begin_template(json)?;
        let result = self.api.create_template(&json).await;
        self.state.finish_template(result)
    }

    /// Edit one card and send the change to the server
    pub async fn save_edit(&mut self, index: usize, text: &str) -> Result<(), ReviewError> {
        self.state.open_editor(index)?;
        self.state.set_draft(index, text);
        let request = self.state.submit_edit(index)?;
        let result = self.api.update_text(&request).await;
        self.state.finish_edit(&request, result)
    }

    pub async fn save_session(&mut self) -> Result<(), ReviewError> {
        self.state.begin_save()?;
        let result = self.api.save().await;
        self.state.finish_save(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextItem;
    use crate::view::{CardView, TEXT_IDLE};
    use async_trait::async_trait;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct MockApi {
        calls: RefCell<Vec<String>>,
        loads: RefCell<VecDeque<Result<LoadedDocument, ReviewError>>>,
        updates: RefCell<VecDeque<Result<EditAck, ReviewError>>>,
        saves: RefCell<VecDeque<Result<SavedSession, ReviewError>>>,
        templates: RefCell<VecDeque<Result<(), ReviewError>>>,
    }

    impl MockApi {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn next<T>(
            &self,
            queue: &RefCell<VecDeque<Result<T, ReviewError>>>,
        ) -> Result<T, ReviewError> {
            queue
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ReviewError::transport(None, "no scripted response")))
        }
    }

    #[async_trait(?Send)]
    impl ReviewApi for MockApi {
        type File = &'static str;

        async fn process_image(
            &self,
            image: &&'static str,
        ) -> Result<LoadedDocument, ReviewError> {
            self.calls.borrow_mut().push(format!("process_image {}", image));
            self.next(&self.loads)
        }

        async fn load_data(
            &self,
            json: &&'static str,
            image: &&'static str,
        ) -> Result<LoadedDocument, ReviewError> {
            self.calls.borrow_mut().push(format!("load_data {} {}", json, image));
            self.next(&self.loads)
        }

        async fn create_template(&self, json: &&'static str) -> Result<(), ReviewError> {
            self.calls.borrow_mut().push(format!("create_template {}", json));
            self.next(&self.templates)
        }

        async fn update_text(&self, request: &UpdateRequest) -> Result<EditAck, ReviewError> {
            self.calls
                .borrow_mut()
                .push(format!("update_text {} {}", request.index, request.text));
            self.next(&self.updates)
        }

        async fn save(&self) -> Result<SavedSession, ReviewError> {
            self.calls.borrow_mut().push("save".to_string());
            self.next(&self.saves)
        }
    }

    fn document(flags: &[bool]) -> LoadedDocument {
        LoadedDocument {
            ocr_results: flags
                .iter()
                .enumerate()
                .map(|(i, &h)| {
                    TextItem::new(format!("text {}", i), h, json!([i, i, i + 1, i + 1]))
                })
                .collect(),
            image: Some("ANNOTATED".to_string()),
            original_image: Some("ORIGINAL".to_string()),
        }
    }

    fn loaded_state(flags: &[bool]) -> ReviewState {
        let mut state = ReviewState::new(ReviewConfig::default());
        state.begin_load(Some("scan.jpg"), None).unwrap();
        state.finish_load(Ok(document(flags))).unwrap();
        state
    }

    fn cards(state: &ReviewState) -> Vec<CardView> {
        match state.text_list() {
            TextListView::Cards { cards, .. } => cards,
            other => panic!("unexpected view: {:?}", other),
        }
    }

    fn card(state: &ReviewState, index: usize) -> CardView {
        cards(state)
            .into_iter()
            .find(|c| c.index == index)
            .expect("card rendered")
    }

    #[tokio::test]
    async fn test_load_document_success() {
        let api = MockApi::default();
        api.loads.borrow_mut().push_back(Ok(document(&[false, true, true])));
        let mut controller = ReviewController::new(api, ReviewConfig::default());

        controller.load_document(Some("scan.jpg"), None).await.unwrap();

        let state = controller.state();
        let session = state.session().unwrap();
        assert_eq!(session.len(), 3);
        assert!(session.edited().is_empty());
        assert!(!state.spinner_visible());
        assert!(state.save_enabled());
        assert_eq!(state.annotated_image(), &ImagePanel::Jpeg("ANNOTATED".to_string()));
        assert_eq!(state.original_image(), &ImagePanel::Jpeg("ORIGINAL".to_string()));
        assert_eq!(
            state.process_message().unwrap().text,
            "Image processed successfully! 3 text elements detected"
        );
        assert_eq!(state.text_list().visible_indices(), vec![1, 2]);
        assert_eq!(controller.api().calls(), vec!["process_image scan.jpg"]);
    }

    #[tokio::test]
    async fn test_load_document_http_failure_resets_outputs() {
        let api = MockApi::default();
        api.loads
            .borrow_mut()
            .push_back(crate::api::decode_process_image(500, r#"{"error":"bad image"}"#));
        let mut controller = ReviewController::new(api, ReviewConfig::default());

        let err = controller.load_document(Some("scan.jpg"), None).await.unwrap_err();
        assert_eq!(err.to_string(), "bad image");

        let state = controller.state();
        assert!(!state.spinner_visible());
        let message = state.process_message().unwrap();
        assert!(message.is_error());
        assert!(message.text.contains("bad image"));
        assert_eq!(state.text_list(), TextListView::Placeholder(TEXT_IDLE));
        assert_eq!(state.annotated_image(), &ImagePanel::Placeholder(ANNOTATED_IDLE));
        assert_eq!(state.original_image(), &ImagePanel::Placeholder(ORIGINAL_IDLE));
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected_without_request() {
        let mut controller = ReviewController::new(MockApi::default(), ReviewConfig::default());
        let err = controller.load_document(None, None).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(controller.state().notice(), Some("Image file is required"));
        assert!(controller.api().calls().is_empty());
        assert!(!controller.state().spinner_visible());
        assert_eq!(controller.state().phase(), OutputPhase::Idle);
    }

    #[tokio::test]
    async fn test_combined_flow_uses_load_data() {
        let api = MockApi::default();
        api.loads.borrow_mut().push_back(Ok(LoadedDocument {
            original_image: None,
            ..document(&[false, false])
        }));
        let config = ReviewConfig {
            flow: UploadFlow::Combined,
            has_template: false,
        };
        let mut controller = ReviewController::new(api, config);

        let err = controller.load_document(Some("scan.jpg"), None).await.unwrap_err();
        assert_eq!(err.to_string(), "Both JSON and image files are required");

        controller
            .load_document(Some("scan.jpg"), Some("template.json"))
            .await
            .unwrap();
        assert_eq!(controller.api().calls(), vec!["load_data template.json scan.jpg"]);
        assert!(controller.state().session().unwrap().has_template());
        assert_eq!(
            controller.state().original_image(),
            &ImagePanel::Placeholder(ORIGINAL_IDLE)
        );
        assert!(matches!(
            controller.state().text_list(),
            TextListView::NoEditableText { .. }
        ));
        let err = controller.create_template(Some("template.json")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_template_first_flow() {
        let api = MockApi::default();
        api.templates.borrow_mut().push_back(Ok(()));
        api.loads.borrow_mut().push_back(Ok(document(&[false])));
        let mut controller = ReviewController::new(api, ReviewConfig::default());

        assert!(controller.create_template(None).await.unwrap_err().is_validation());
        controller.create_template(Some("template.json")).await.unwrap();
        assert!(controller.state().has_template());
        assert!(!controller.state().spinner_visible());

        let err = controller
            .load_document(Some("scan.jpg"), Some("template.json"))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        controller.load_document(Some("scan.jpg"), None).await.unwrap();
        assert!(controller.state().session().unwrap().has_template());
        assert_eq!(
            controller.api().calls(),
            vec!["create_template template.json", "process_image scan.jpg"]
        );
    }

    #[tokio::test]
    async fn test_template_failure_clears_spinner() {
        let api = MockApi::default();
        api.templates
            .borrow_mut()
            .push_back(Err(ReviewError::application("not a template")));
        let mut controller = ReviewController::new(api, ReviewConfig::default());
        controller.create_template(Some("t.json")).await.unwrap_err();
        let state = controller.state();
        assert!(!state.spinner_visible());
        assert!(!state.has_template());
        assert_eq!(
            state.template_message().unwrap().text,
            "Error creating template: not a template"
        );
    }

    #[tokio::test]
    async fn test_save_edit_success() {
        let api = MockApi::default();
        api.loads.borrow_mut().push_back(Ok(document(&[false, true])));
        api.updates.borrow_mut().push_back(Ok(EditAck {
            image: Some("REANNOTATED".to_string()),
        }));
        let mut controller = ReviewController::new(api, ReviewConfig::default());
        controller.load_document(Some("scan.jpg"), None).await.unwrap();

        controller.save_edit(1, "  Jane Doe  ").await.unwrap();

        let state = controller.state();
        let session = state.session().unwrap();
        assert_eq!(session.item(1).unwrap().text, "Jane Doe");
        assert!(session.is_edited(1));
        assert_eq!(state.annotated_image(), &ImagePanel::Jpeg("REANNOTATED".to_string()));
        assert!(state.editor(1).is_none());
        assert!(card(state, 1).edited);
        assert!(!state.spinner_visible());
        assert_eq!(controller.api().calls()[1], "update_text 1 Jane Doe");
    }

    #[tokio::test]
    async fn test_empty_edit_never_reaches_server() {
        let api = MockApi::default();
        api.loads.borrow_mut().push_back(Ok(document(&[true])));
        let mut controller = ReviewController::new(api, ReviewConfig::default());
        controller.load_document(Some("scan.jpg"), None).await.unwrap();

        for text in ["", "   \n\t"] {
            let err = controller.save_edit(0, text).await.unwrap_err();
            assert!(err.is_validation());
        }
        let state = controller.state();
        assert_eq!(state.session().unwrap().item(0).unwrap().text, "text 0");
        assert!(state.editor(0).is_some());
        assert!(!state.spinner_visible());
        assert_eq!(controller.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_edit_keeps_editor_open() {
        let api = MockApi::default();
        api.loads.borrow_mut().push_back(Ok(document(&[true])));
        api.updates
            .borrow_mut()
            .push_back(Err(ReviewError::transport(Some(400), "Invalid index")));
        let mut controller = ReviewController::new(api, ReviewConfig::default());
        controller.load_document(Some("scan.jpg"), None).await.unwrap();

        controller.save_edit(0, "typed text").await.unwrap_err();

        let state = controller.state();
        let editor = state.editor(0).unwrap();
        assert_eq!(editor.draft, "typed text");
        assert!(!editor.in_flight);
        assert_eq!(state.notice(), Some("Invalid index"));
        assert_eq!(state.session().unwrap().item(0).unwrap().text, "text 0");
        assert!(!state.session().unwrap().is_edited(0));
        assert_eq!(state.annotated_image(), &ImagePanel::Jpeg("ANNOTATED".to_string()));
        assert!(!state.spinner_visible());
    }

    #[test]
    fn test_cancel_edit_restores_display() {
        let mut state = loaded_state(&[true, true]);
        let before = card(&state, 1);

        state.open_editor(1).unwrap();
        state.set_draft(1, "something else");
        assert!(state.cancel_edit(1));
        assert!(!state.cancel_edit(1));

        let after = card(&state, 1);
        assert_eq!(after.display_text(), before.display_text());
        assert_eq!(after, before);
        assert!(!state.spinner_visible());
    }

    #[test]
    fn test_open_editor_rejects_printed_text() {
        let mut state = loaded_state(&[false, true]);
        assert!(state.open_editor(0).is_err());
        assert!(state.open_editor(5).is_err());
        assert!(state.open_editor(1).is_ok());
    }

    #[test]
    fn test_concurrent_edits_do_not_cross_contaminate() {
        let mut state = loaded_state(&[true, true, true]);
        state.open_editor(0).unwrap();
        state.open_editor(2).unwrap();
        state.set_draft(0, "zero");
        state.set_draft(2, "two");
        let first = state.submit_edit(0).unwrap();
        let second = state.submit_edit(2).unwrap();
        assert_eq!(state.in_flight(), 2);
        assert!(state.submit_edit(2).is_err());

        state
            .finish_edit(&second, Err(ReviewError::application("Error updating text")))
            .unwrap_err();
        assert!(state.spinner_visible());
        state
            .finish_edit(
                &first,
                Ok(EditAck {
                    image: Some("AFTER_ZERO".to_string()),
                }),
            )
            .unwrap();

        assert!(!state.spinner_visible());
        let session = state.session().unwrap();
        assert_eq!(session.item(0).unwrap().text, "zero");
        assert_eq!(session.item(2).unwrap().text, "text 2");
        assert_eq!(session.edited().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert!(state.editor(0).is_none());
        assert_eq!(state.editor(2).unwrap().draft, "two");
        assert_eq!(state.annotated_image(), &ImagePanel::Jpeg("AFTER_ZERO".to_string()));
    }

    #[test]
    fn test_stale_edit_after_reload_is_dropped() {
        let mut state = loaded_state(&[true, true]);
        state.open_editor(1).unwrap();
        state.set_draft(1, "old");
        let request = state.submit_edit(1).unwrap();

        state.begin_load(Some("other.jpg"), None).unwrap();
        state.finish_load(Ok(document(&[true, true]))).unwrap();
        state
            .finish_edit(
                &request,
                Ok(EditAck {
                    image: Some("STALE".to_string()),
                }),
            )
            .unwrap();

        let session = state.session().unwrap();
        assert_eq!(session.item(1).unwrap().text, "text 1");
        assert!(session.edited().is_empty());
        assert_eq!(state.annotated_image(), &ImagePanel::Jpeg("ANNOTATED".to_string()));
        assert!(!state.spinner_visible());
    }

    #[test]
    fn test_edit_landing_during_reload_keeps_loading_copy() {
        let mut state = loaded_state(&[true, true]);
        state.open_editor(0).unwrap();
        state.set_draft(0, "Jane Doe");
        let request = state.submit_edit(0).unwrap();

        state.begin_load(Some("next.jpg"), None).unwrap();
        state
            .finish_edit(
                &request,
                Ok(EditAck {
                    image: Some("OLD_DOC_EDIT".to_string()),
                }),
            )
            .unwrap();

        let session = state.session().unwrap();
        assert!(session.is_edited(0));
        assert_eq!(session.item(0).unwrap().text, "Jane Doe");
        assert_eq!(state.annotated_image(), &ImagePanel::Placeholder(LOADING));
        assert_eq!(state.original_image(), &ImagePanel::Placeholder(LOADING));
        assert_eq!(state.text_list(), TextListView::Placeholder(LOADING));
        assert!(state.spinner_visible());

        state.finish_load(Ok(document(&[true, true]))).unwrap();
        assert_eq!(state.annotated_image(), &ImagePanel::Jpeg("ANNOTATED".to_string()));
        assert!(!state.spinner_visible());
    }

    #[test]
    fn test_edit_landing_after_failed_reload_keeps_idle_copy() {
        let mut state = loaded_state(&[true, true]);
        state.open_editor(1).unwrap();
        state.set_draft(1, "2025-03-14");
        let request = state.submit_edit(1).unwrap();

        state.begin_load(Some("next.jpg"), None).unwrap();
        state
            .finish_load(Err(ReviewError::transport(None, "connection refused")))
            .unwrap_err();
        state
            .finish_edit(
                &request,
                Ok(EditAck {
                    image: Some("OLD_DOC_EDIT".to_string()),
                }),
            )
            .unwrap();

        let session = state.session().unwrap();
        assert!(session.is_edited(1));
        assert_eq!(session.item(1).unwrap().text, "2025-03-14");
        assert_eq!(state.annotated_image(), &ImagePanel::Placeholder(ANNOTATED_IDLE));
        assert_eq!(state.original_image(), &ImagePanel::Placeholder(ORIGINAL_IDLE));
        assert_eq!(state.text_list(), TextListView::Placeholder(TEXT_IDLE));
        assert!(!state.spinner_visible());
    }

    #[test]
    fn test_reload_resets_edit_history() {
        let mut state = loaded_state(&[true, true]);
        state.open_editor(0).unwrap();
        state.set_draft(0, "edited");
        let request = state.submit_edit(0).unwrap();
        state.finish_edit(&request, Ok(EditAck::default())).unwrap();
        state.set_only_edited(true);
        assert_eq!(state.annotated_image(), &ImagePanel::Unavailable(ANNOTATED_UNAVAILABLE));

        state.begin_load(Some("next.jpg"), None).unwrap();
        assert_eq!(state.text_list(), TextListView::Placeholder(LOADING));
        assert!(state.spinner_visible());
        state.finish_load(Ok(document(&[true, false, true, true]))).unwrap();

        let session = state.session().unwrap();
        assert_eq!(session.len(), 4);
        assert!(session.edited().is_empty());
        assert!(!state.only_edited());
        assert_eq!(state.text_list().visible_indices(), vec![0, 2, 3]);
    }

    #[test]
    fn test_sentinel_text_renders_empty() {
        let mut state = ReviewState::default();
        state.begin_load(Some("scan.jpg"), None).unwrap();
        let document = crate::api::decode_process_image(
            200,
            r#"{"success":true,"ocr_results":[{"text":"NO_TEXT_DETECTED","handwritten":true,"text_region":[0,0,1,1]}],"image":"QQ=="}"#,
        );
        state.finish_load(document).unwrap();

        let card = card(&state, 0);
        assert_eq!(card.display_text(), None);
        assert_eq!(card.region, "[0,0,1,1]");
    }

    #[test]
    fn test_failed_reload_keeps_session_for_save() {
        let mut state = loaded_state(&[true]);
        state.begin_load(Some("next.jpg"), None).unwrap();
        state
            .finish_load(Err(ReviewError::transport(None, "connection refused")))
            .unwrap_err();
        assert_eq!(state.text_list(), TextListView::Placeholder(TEXT_IDLE));
        assert!(state.save_enabled());
        assert!(state.open_editor(0).is_err());
    }

    #[tokio::test]
    async fn test_save_session() {
        let api = MockApi::default();
        api.loads.borrow_mut().push_back(Ok(document(&[true])));
        api.saves.borrow_mut().push_back(Ok(SavedSession {
            path: "output/scan.json".to_string(),
        }));
        api.saves
            .borrow_mut()
            .push_back(Err(ReviewError::application("disk full")));
        let mut controller = ReviewController::new(api, ReviewConfig::default());

        let err = controller.save_session().await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(controller.state().notice(), Some("No data to save"));
        assert!(controller.api().calls().is_empty());

        controller.load_document(Some("scan.jpg"), None).await.unwrap();
        controller.save_session().await.unwrap();
        assert_eq!(
            controller.state().save_message().unwrap().text,
            "Successfully saved to: output/scan.json"
        );

        controller.save_session().await.unwrap_err();
        let message = controller.state().save_message().unwrap();
        assert!(message.is_error());
        assert_eq!(message.text, "Error: disk full");
        assert!(!controller.state().spinner_visible());
    }
}
