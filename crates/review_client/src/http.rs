//! Review server HTTP client

use anyhow::Result;
use async_trait::async_trait;
use review_core::api::{
    self, ReviewApi, CREATE_TEMPLATE_PATH, IMAGE_FIELD, JSON_FIELD, LOAD_DATA_PATH,
    PROCESS_IMAGE_PATH, SAVE_PATH, UPDATE_TEXT_PATH,
};
use review_core::{EditAck, LoadedDocument, ReviewError, SavedSession, UpdateRequest};
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

/// Configuration for the review client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the review server (default: http://127.0.0.1:5000)
    pub base_url: String,
    /// Timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Review server client
pub struct ReviewHttpClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl ReviewHttpClient {
    /// Create a new review client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Create a client with default configuration
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send a request and hand back the status and raw body
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), ReviewError> {
        let response = request
            .send()
            .await
            .map_err(|e| ReviewError::transport(None, format!("Request failed: {}", e)))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            ReviewError::transport(Some(status), format!("Failed to read response: {}", e))
        })?;
        tracing::debug!(status, bytes = body.len(), "review server responded");
        Ok((status, body))
    }

    async fn post_form(&self, path: &str, form: Form) -> Result<(u16, String), ReviewError> {
        tracing::debug!(path, "posting multipart form");
        self.send(self.client.post(self.url(path)).multipart(form))
            .await
    }
}

/// Read an upload from disk into a named multipart part
async fn file_part(path: &Path) -> Result<Part, ReviewError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        ReviewError::validation(format!("Cannot read {}: {}", path.display(), e))
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(name))
}

#[async_trait(?Send)]
impl ReviewApi for ReviewHttpClient {
    type File = PathBuf;

    async fn process_image(&self, image: &PathBuf) -> Result<LoadedDocument, ReviewError> {
        let form = Form::new().part(IMAGE_FIELD, file_part(image).await?);
        let (status, body) = self.post_form(PROCESS_IMAGE_PATH, form).await?;
        api::decode_process_image(status, &body)
    }

    async fn load_data(
        &self,
        json: &PathBuf,
        image: &PathBuf,
    ) -> Result<LoadedDocument, ReviewError> {
        let form = Form::new()
            .part(JSON_FIELD, file_part(json).await?)
            .part(IMAGE_FIELD, file_part(image).await?);
        let (status, body) = self.post_form(LOAD_DATA_PATH, form).await?;
        api::decode_load_data(status, &body)
    }

    async fn create_template(&self, json: &PathBuf) -> Result<(), ReviewError> {
        let form = Form::new().part(JSON_FIELD, file_part(json).await?);
        let (status, body) = self.post_form(CREATE_TEMPLATE_PATH, form).await?;
        api::decode_create_template(status, &body)
    }

    async fn update_text(&self, request: &UpdateRequest) -> Result<EditAck, ReviewError> {
        let (status, body) = self
            .send(self.client.post(self.url(UPDATE_TEXT_PATH)).json(request))
            .await?;
        api::decode_update_text(status, &body)
    }

    async fn save(&self) -> Result<SavedSession, ReviewError> {
        let (status, body) = self.send(self.client.post(self.url(SAVE_PATH))).await?;
        api::decode_save(status, &body)
    }
}
