//! Review server client for the browser

use async_trait::async_trait;
use gloo_net::http::Request;
use review_core::api::{
    self, ReviewApi, CREATE_TEMPLATE_PATH, IMAGE_FIELD, JSON_FIELD, LOAD_DATA_PATH,
    PROCESS_IMAGE_PATH, SAVE_PATH, UPDATE_TEXT_PATH,
};
use review_core::{EditAck, LoadedDocument, ReviewError, SavedSession, UpdateRequest};
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

/// Same-origin client built on `fetch`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlooReviewApi {
    /// Prefix for endpoint paths, empty for the page's own origin
    base_url: String,
}

impl GlooReviewApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }
}

pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn js_error(context: &str, value: JsValue) -> ReviewError {
    let detail = value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value));
    ReviewError::transport(None, format!("{}: {}", context, detail))
}

fn form(fields: &[(&str, &File)]) -> Result<FormData, ReviewError> {
    let data = FormData::new().map_err(|e| js_error("Cannot build form", e))?;
    for (name, file) in fields {
        data.append_with_blob_and_filename(name, file, &file.name())
            .map_err(|e| js_error("Cannot attach file", e))?;
    }
    Ok(data)
}

async fn send(request: Result<Request, gloo_net::Error>) -> Result<(u16, String), ReviewError> {
    let request =
        request.map_err(|e| ReviewError::transport(None, format!("Invalid request: {}", e)))?;
    let response = request
        .send()
        .await
        .map_err(|e| ReviewError::transport(None, format!("Request failed: {}", e)))?;
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        ReviewError::transport(Some(status), format!("Failed to read response: {}", e))
    })?;
    Ok((status, body))
}

async fn post_form(url: String, data: FormData) -> Result<(u16, String), ReviewError> {
    send(Request::post(&url).body(data)).await
}

#[async_trait(?Send)]
impl ReviewApi for GlooReviewApi {
    type File = File;

    async fn process_image(&self, image: &File) -> Result<LoadedDocument, ReviewError> {
        let data = form(&[(IMAGE_FIELD, image)])?;
        let (status, body) = post_form(self.url(PROCESS_IMAGE_PATH), data).await?;
        api::decode_process_image(status, &body)
    }

    async fn load_data(&self, json: &File, image: &File) -> Result<LoadedDocument, ReviewError> {
        let data = form(&[(JSON_FIELD, json), (IMAGE_FIELD, image)])?;
        let (status, body) = post_form(self.url(LOAD_DATA_PATH), data).await?;
        api::decode_load_data(status, &body)
    }

    async fn create_template(&self, json: &File) -> Result<(), ReviewError> {
        let data = form(&[(JSON_FIELD, json)])?;
        let (status, body) = post_form(self.url(CREATE_TEMPLATE_PATH), data).await?;
        api::decode_create_template(status, &body)
    }

    async fn update_text(&self, request: &UpdateRequest) -> Result<EditAck, ReviewError> {
        let (status, body) = send(Request::post(&self.url(UPDATE_TEXT_PATH)).json(request)).await?;
        api::decode_update_text(status, &body)
    }

    async fn save(&self) -> Result<SavedSession, ReviewError> {
        let (status, body) = send(Request::post(&self.url(SAVE_PATH)).build()).await?;
        api::decode_save(status, &body)
    }
}
