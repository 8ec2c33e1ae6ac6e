//! Terminal rendering of the review view model

use review_core::view::{
    CardView, ImagePanel, MessageKind, StatusMessage, TextListView, EMPTY_TEXT,
    NO_EDITABLE_DETAIL, NO_EDITABLE_TITLE, NO_RESULTS,
};
use std::fmt::Write;

pub fn message(message: &StatusMessage) -> String {
    let tag = match message.kind {
        MessageKind::Info => "..",
        MessageKind::Success => "ok",
        MessageKind::Error => "!!",
    };
    format!("[{}] {}", tag, message.text)
}

pub fn image_panel(label: &str, panel: &ImagePanel) -> String {
    match panel {
        ImagePanel::Placeholder(copy) | ImagePanel::Unavailable(copy) => {
            format!("{}: {}", label, copy)
        }
        ImagePanel::Jpeg(data) => format!("{}: JPEG, {} base64 chars", label, data.len()),
    }
}

fn card(out: &mut String, card: &CardView) {
    let marker = if card.edited { " [edited]" } else { "" };
    let text = card.display_text().unwrap_or(EMPTY_TEXT);
    let _ = writeln!(out, "  #{:<4}{}  {}", card.index, marker, text);
    let _ = writeln!(out, "        region: {}", card.region);
}

pub fn text_list(view: &TextListView) -> String {
    let mut out = String::new();
    match view {
        TextListView::Placeholder(copy) => out.push_str(copy),
        TextListView::NoResults => out.push_str(NO_RESULTS),
        TextListView::NoEditableText { causes } => {
            let _ = writeln!(out, "{} {}", NO_EDITABLE_TITLE, NO_EDITABLE_DETAIL);
            out.push_str("If you were expecting editable content, try one of these:");
            for cause in causes.iter() {
                let _ = write!(out, "\n  - {}", cause);
            }
        }
        TextListView::Cards {
            template_note,
            editable_count,
            only_edited,
            cards,
        } => {
            let _ = writeln!(out, "{}", template_note);
            let _ = write!(out, "Editable Text Items ({})", editable_count);
            if *only_edited {
                out.push_str(" - showing only edited items");
            }
            out.push('\n');
            for c in cards.iter().filter(|c| c.is_visible(*only_edited)) {
                card(&mut out, c);
            }
        }
    }
    out.trim_end().to_string()
}
