//! Core of the OCR review workflow
//!
//! This crate holds the client-side state for one review session and the
//! rules that keep it consistent with the review server, which is the sole
//! source of truth for OCR data. It performs no I/O itself: transports
//! implement [`ReviewApi`] and front ends render the [`view`] model.

pub mod api;
pub mod controller;
pub mod error;
pub mod session;
pub mod types;
pub mod view;

pub use api::ReviewApi;
pub use controller::{ReviewConfig, ReviewController, ReviewState};
pub use error::ReviewError;
pub use session::Session;
pub use types::*;
