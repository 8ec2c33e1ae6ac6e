//! Review server endpoint contract
//!
//! [`ReviewApi`] is the seam between the controller and a transport. The
//! `decode_*` functions interpret raw `(status, body)` pairs so that every
//! transport turns server responses into the same `Ok`/`Err` results.

use crate::error::ReviewError;
use crate::types::{EditAck, LoadedDocument, SavedSession, TextItem, UpdateRequest, Upload};
use async_trait::async_trait;
use serde_json::Value;

pub const PROCESS_IMAGE_PATH: &str = "/process_image";
pub const LOAD_DATA_PATH: &str = "/load_data";
pub const CREATE_TEMPLATE_PATH: &str = "/create_template";
pub const UPDATE_TEXT_PATH: &str = "/update_text";
pub const SAVE_PATH: &str = "/save";

/// Multipart field carrying the image upload
pub const IMAGE_FIELD: &str = "image_file";
/// Multipart field carrying the template JSON upload
pub const JSON_FIELD: &str = "json_file";

const INVALID_OCR_DATA: &str = "Invalid OCR data received from server";

/// Endpoints of the review server
///
/// Futures are not required to be `Send` so that browser implementations
/// built on JS promises qualify.
#[async_trait(?Send)]
pub trait ReviewApi {
    /// Platform file handle used for uploads
    type File;

    /// `POST /process_image` with `image_file`
    async fn process_image(&self, image: &Self::File) -> Result<LoadedDocument, ReviewError>;

    /// `POST /load_data` with `json_file` and `image_file`
    async fn load_data(
        &self,
        json: &Self::File,
        image: &Self::File,
    ) -> Result<LoadedDocument, ReviewError>;

    /// `POST /create_template` with `json_file`
    async fn create_template(&self, json: &Self::File) -> Result<(), ReviewError>;

    /// `POST /update_text` with a JSON body
    async fn update_text(&self, request: &UpdateRequest) -> Result<EditAck, ReviewError>;

    /// `POST /save` without a body
    async fn save(&self) -> Result<SavedSession, ReviewError>;
}

/// Send a validated upload to the endpoint its flow uses
pub async fn send_upload<A>(
    api: &A,
    upload: &Upload<A::File>,
) -> Result<LoadedDocument, ReviewError>
where
    A: ReviewApi + ?Sized,
{
    match upload {
        Upload::Image { image } => api.process_image(image).await,
        Upload::Combined { json, image } => api.load_data(json, image).await,
    }
}

fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

fn error_field(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn success_flag(body: &Value) -> Option<bool> {
    body.get("success").map(|v| match v {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a response body, turning HTTP failures into transport errors
///
/// For non-2xx statuses the server's `error` message is preferred; the
/// generic fallbacks distinguish JSON bodies without one from bodies that
/// are not JSON at all.
pub fn parse_body(status: u16, body: &str) -> Result<Value, ReviewError> {
    let parsed = serde_json::from_str::<Value>(body);
    if !is_success_status(status) {
        let message = match &parsed {
            Ok(value) => {
                error_field(value).unwrap_or_else(|| format!("Server error: {}", status))
            }
            Err(_) => format!("Network response was not ok: {}", status),
        };
        return Err(ReviewError::transport(Some(status), message));
    }
    parsed.map_err(|_| ReviewError::transport(Some(status), "Invalid JSON in server response"))
}

fn require_success(body: &Value, fallback: &str) -> Result<(), ReviewError> {
    if success_flag(body) == Some(true) {
        Ok(())
    } else {
        Err(ReviewError::application(
            error_field(body).unwrap_or_else(|| fallback.to_string()),
        ))
    }
}

fn decode_document(body: &Value) -> Result<LoadedDocument, ReviewError> {
    let results = body
        .get("ocr_results")
        .filter(|v| v.is_array())
        .ok_or_else(|| ReviewError::application(INVALID_OCR_DATA))?;
    let ocr_results: Vec<TextItem> = serde_json::from_value(results.clone())
        .map_err(|_| ReviewError::application(INVALID_OCR_DATA))?;
    Ok(LoadedDocument {
        ocr_results,
        image: string_field(body, "image"),
        original_image: string_field(body, "original_image"),
    })
}

/// Interpret a `/process_image` response
pub fn decode_process_image(status: u16, body: &str) -> Result<LoadedDocument, ReviewError> {
    let body = parse_body(status, body)?;
    require_success(&body, "Unknown server error")?;
    decode_document(&body)
}

/// Interpret a `/load_data` response
///
/// This endpoint's contract carries no `success` flag, so only an explicit
/// falsy flag is treated as failure.
pub fn decode_load_data(status: u16, body: &str) -> Result<LoadedDocument, ReviewError> {
    let body = parse_body(status, body)?;
    if success_flag(&body) == Some(false) {
        return Err(ReviewError::application(
            error_field(&body).unwrap_or_else(|| "Unknown server error".to_string()),
        ));
    }
    decode_document(&body)
}

/// Interpret a `/create_template` response
pub fn decode_create_template(status: u16, body: &str) -> Result<(), ReviewError> {
    let body = parse_body(status, body)?;
    require_success(&body, "Error creating template")
}

/// Interpret an `/update_text` response
pub fn decode_update_text(status: u16, body: &str) -> Result<EditAck, ReviewError> {
    let body = parse_body(status, body)?;
    require_success(&body, "Error updating text")?;
    Ok(EditAck {
        image: string_field(&body, "image"),
    })
}

/// Interpret a `/save` response
///
/// The server reports save failures in the body, so it is read whatever
/// the HTTP status.
pub fn decode_save(status: u16, body: &str) -> Result<SavedSession, ReviewError> {
    let body = match serde_json::from_str::<Value>(body) {
        Ok(body) => body,
        Err(_) if !is_success_status(status) => {
            return Err(ReviewError::transport(
                Some(status),
                format!("Network response was not ok: {}", status),
            ))
        }
        Err(_) => {
            return Err(ReviewError::transport(
                Some(status),
                "Invalid JSON in server response",
            ))
        }
    };
    require_success(&body, "Error saving data")?;
    string_field(&body, "path")
        .map(|path| SavedSession { path })
        .ok_or_else(|| ReviewError::application("Save response did not include a path"))
}
