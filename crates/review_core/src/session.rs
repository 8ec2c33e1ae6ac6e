//! In-memory state of one loaded document

use crate::error::ReviewError;
use crate::types::TextItem;
use std::collections::BTreeSet;

/// The client's view of one loaded document's OCR items and edit history
///
/// Items are addressed by their position in the server's result list; that
/// index is the only identity shared with the server, so items are never
/// inserted, removed or reordered after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    items: Vec<TextItem>,
    edited: BTreeSet<usize>,
    has_template: bool,
    generation: u64,
}

impl Session {
    /// Start a session from a fresh result list
    pub fn load(items: Vec<TextItem>, has_template: bool, generation: u64) -> Self {
        Self {
            items,
            edited: BTreeSet::new(),
            has_template,
            generation,
        }
    }

    pub fn items(&self) -> &[TextItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&TextItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_template(&self) -> bool {
        self.has_template
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Indices of the items the user may edit, in document order
    pub fn editable_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.handwritten)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_editable(&self, index: usize) -> bool {
        self.item(index).is_some_and(|item| item.handwritten)
    }

    pub fn edited(&self) -> &BTreeSet<usize> {
        &self.edited
    }

    pub fn is_edited(&self, index: usize) -> bool {
        self.edited.contains(&index)
    }

    /// Record a server-confirmed edit
    pub fn apply_edit(&mut self, index: usize, text: &str) -> Result<(), ReviewError> {
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| ReviewError::validation(format!("No text item #{}", index)))?;
        item.text = text.to_string();
        self.edited.insert(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Session {
        Session::load(
            vec![
                TextItem::new("Name:", false, json!([0, 0, 1, 1])),
                TextItem::new("Jane", true, json!([1, 0, 2, 1])),
                TextItem::new("Date:", false, json!([0, 1, 1, 2])),
                TextItem::new("", true, json!([1, 1, 2, 2])),
            ],
            true,
            1,
        )
    }

    #[test]
    fn test_load_starts_unedited() {
        let session = sample();
        assert_eq!(session.len(), 4);
        assert!(session.edited().is_empty());
        assert!(session.has_template());
    }

    #[test]
    fn test_editable_indices_follow_handwritten_flag() {
        let session = sample();
        assert_eq!(session.editable_indices(), vec![1, 3]);
        assert!(session.is_editable(1));
        assert!(!session.is_editable(0));
        assert!(!session.is_editable(99));
    }

    #[test]
    fn test_apply_edit() {
        let mut session = sample();
        session.apply_edit(3, "2025-01-01").unwrap();
        assert_eq!(session.item(3).unwrap().text, "2025-01-01");
        assert!(session.is_edited(3));
        assert!(!session.is_edited(1));
        assert_eq!(session.editable_indices(), vec![1, 3]);
    }

    #[test]
    fn test_apply_edit_out_of_range() {
        let mut session = sample();
        let before = session.clone();
        assert!(session.apply_edit(10, "x").is_err());
        assert_eq!(session, before);
    }
}
