//! Core types for the review workflow
//!
//! Wire shapes exchanged with the review server and the small value types
//! shared by every front end.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Text values the server uses to mean "nothing was read here"
pub const NO_TEXT_SENTINELS: &[&str] = &["undefined", "NO_TEXT_DETECTED"];

/// One detected text region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    /// Recognized text, empty when nothing usable was detected
    #[serde(default, deserialize_with = "deserialize_text")]
    pub text: String,
    /// Server-assigned editability flag
    #[serde(default, deserialize_with = "deserialize_strict_true")]
    pub handwritten: bool,
    /// Region coordinates, opaque to the client
    #[serde(default)]
    pub text_region: Value,
}

impl TextItem {
    pub fn new(text: impl Into<String>, handwritten: bool, text_region: Value) -> Self {
        Self {
            text: normalize_text(&text.into()),
            handwritten,
            text_region,
        }
    }

    /// Compact rendering of the region for display
    pub fn region_label(&self) -> String {
        self.text_region.to_string()
    }
}

/// Map sentinel "no detection" values to the empty string
pub fn normalize_text(raw: &str) -> String {
    if NO_TEXT_SENTINELS.contains(&raw) {
        String::new()
    } else {
        raw.to_string()
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::String(s)) => normalize_text(&s),
        Some(other) => other.to_string(),
    })
}

fn deserialize_strict_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

/// Successful response of `/process_image` or `/load_data`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedDocument {
    pub ocr_results: Vec<TextItem>,
    /// Annotated image, base64 JPEG
    pub image: Option<String>,
    /// Uploaded image as the server decoded it, base64 JPEG
    pub original_image: Option<String>,
}

/// Body of `/update_text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    pub index: usize,
    pub text: String,
    /// Session generation the edit was issued against
    #[serde(skip)]
    pub generation: u64,
}

/// Successful response of `/update_text`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditAck {
    /// Re-annotated image, base64 JPEG
    pub image: Option<String>,
}

/// Successful response of `/save`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub path: String,
}

/// Request-shape variant used by a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadFlow {
    /// `/create_template` once, then `/process_image` per image
    #[default]
    TemplateFirst,
    /// `/load_data` with template JSON and image together
    Combined,
}

impl UploadFlow {
    pub fn name(self) -> &'static str {
        match self {
            UploadFlow::TemplateFirst => "template-first",
            UploadFlow::Combined => "combined",
        }
    }
}

/// A validated document upload, generic over the platform's file handle
#[derive(Debug, Clone, PartialEq)]
pub enum Upload<F> {
    Image { image: F },
    Combined { json: F, image: F },
}

impl<F> Upload<F> {
    pub fn flow(&self) -> UploadFlow {
        match self {
            Upload::Image { .. } => UploadFlow::TemplateFirst,
            Upload::Combined { .. } => UploadFlow::Combined,
        }
    }

    /// Whether the upload itself supplies a template
    pub fn carries_template(&self) -> bool {
        matches!(self, Upload::Combined { .. })
    }
}
