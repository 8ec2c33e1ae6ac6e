//! Rendering model for review front ends
//!
//! Everything here is a pure function of controller state. Front ends turn
//! these values into DOM nodes or terminal output without re-deriving any
//! of the filtering rules.

use crate::session::Session;
use std::collections::BTreeMap;

pub const TEXT_IDLE: &str = "Upload an image to view and edit detected text";
pub const ANNOTATED_IDLE: &str = "Upload an image to see annotated results";
pub const ORIGINAL_IDLE: &str = "Upload an image to see it here";
pub const LOADING: &str = "Processing image...";
pub const ANNOTATED_UNAVAILABLE: &str = "Unable to load annotated image";
pub const ORIGINAL_UNAVAILABLE: &str = "Unable to load original image";
pub const NO_RESULTS: &str = "No OCR results available";
pub const EMPTY_TEXT: &str = "Empty text";

pub const TEMPLATE_NOTE: &str =
    "Only text that doesn't match the template is shown below and can be edited.";
pub const NO_TEMPLATE_NOTE: &str =
    "No template found. All text is displayed and can be toggled for editing.";

pub const NO_EDITABLE_TITLE: &str = "No editable text found.";
pub const NO_EDITABLE_DETAIL: &str = "All detected text appears to be part of the template.";
pub const NO_EDITABLE_CAUSES: &[&str] = &[
    "Adjust the template matching threshold in the backend",
    "Check if the uploaded image has the same orientation as the template",
    "Verify that the OCR has correctly detected handwritten content",
];

/// Where the output regions are in the load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
}

/// An image output region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePanel {
    Placeholder(&'static str),
    /// Base64 JPEG payload as received from the server
    Jpeg(String),
    Unavailable(&'static str),
}

impl ImagePanel {
    pub fn from_payload(payload: Option<String>, unavailable: &'static str) -> Self {
        match payload {
            Some(data) => ImagePanel::Jpeg(data),
            None => ImagePanel::Unavailable(unavailable),
        }
    }

    pub fn data_uri(&self) -> Option<String> {
        match self {
            ImagePanel::Jpeg(data) => Some(jpeg_data_uri(data)),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            ImagePanel::Jpeg(data) => Some(data),
            _ => None,
        }
    }
}

pub fn jpeg_data_uri(base64: &str) -> String {
    format!("data:image/jpeg;base64,{}", base64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Inline status shown near a form or button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

/// An open inline editor on one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    /// Current contents of the text control
    pub draft: String,
    /// An update request for this card is awaiting its response
    pub in_flight: bool,
}

/// One editable item as displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Index in the full result list, never the position among cards
    pub index: usize,
    pub text: String,
    pub region: String,
    pub edited: bool,
    pub editor: Option<Editor>,
}

impl CardView {
    /// Text to display, `None` when the item is empty
    pub fn display_text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    pub fn is_visible(&self, only_edited: bool) -> bool {
        !only_edited || self.edited
    }
}

/// The text results region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextListView {
    Placeholder(&'static str),
    NoResults,
    NoEditableText { causes: &'static [&'static str] },
    Cards {
        template_note: &'static str,
        editable_count: usize,
        only_edited: bool,
        cards: Vec<CardView>,
    },
}

impl TextListView {
    /// Cards shown under the current "show only edited" setting
    pub fn visible_indices(&self) -> Vec<usize> {
        match self {
            TextListView::Cards {
                only_edited, cards, ..
            } => cards
                .iter()
                .filter(|card| card.is_visible(*only_edited))
                .map(|card| card.index)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Build the text results region from the session
pub fn render_text_list(
    session: Option<&Session>,
    phase: OutputPhase,
    editors: &BTreeMap<usize, Editor>,
    only_edited: bool,
) -> TextListView {
    let session = match (phase, session) {
        (OutputPhase::Loading, _) => return TextListView::Placeholder(LOADING),
        (OutputPhase::Idle, _) | (OutputPhase::Loaded, None) => {
            return TextListView::Placeholder(TEXT_IDLE)
        }
        (OutputPhase::Loaded, Some(session)) => session,
    };

    if session.is_empty() {
        return TextListView::NoResults;
    }

    let editable = session.editable_indices();
    tracing::debug!(
        total = session.len(),
        editable = editable.len(),
        "filtered editable items"
    );

    if editable.is_empty() && session.has_template() {
        return TextListView::NoEditableText {
            causes: NO_EDITABLE_CAUSES,
        };
    }

    let cards = editable
        .iter()
        .filter_map(|&index| {
            let item = session.item(index)?;
            Some(CardView {
                index,
                text: item.text.clone(),
                region: item.region_label(),
                edited: session.is_edited(index),
                editor: editors.get(&index).cloned(),
            })
        })
        .collect();

    TextListView::Cards {
        template_note: if session.has_template() {
            TEMPLATE_NOTE
        } else {
            NO_TEMPLATE_NOTE
        },
        editable_count: editable.len(),
        only_edited,
        cards,
    }
}
