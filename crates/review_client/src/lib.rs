//! HTTP client for the OCR review server
//!
//! Implements [`review_core::ReviewApi`] over `reqwest` for native front
//! ends. Uploads are read from disk and sent as multipart forms.
//!
//! Copyright (c) 2025 Michael A Wright

pub mod http;

pub use http::{ClientConfig, ReviewHttpClient};
