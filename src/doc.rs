//! Document store: the raw JSON text of every open tab.
//!
//! The store is the single source of truth for level data. It holds text, not
//! parsed structures: every render or query parses on demand, so an edit is
//! visible to the next read without any cache invalidation. Writes never
//! validate; a malformed document only surfaces as [`DocError::Parse`] when
//! something reads it.
//!
//! The `board` tab always exists. Zone tabs are keyed by zone id and listed
//! in creation order after the board.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::consts::BOARD_TAB;
use crate::error::DocError;
use crate::model::{Board, Zone};

/// In-memory store of tab texts.
pub struct DocStore {
    texts: HashMap<String, String>,
    order: Vec<String>,
}

impl DocStore {
    /// Create a store holding an empty board tab.
    #[must_use]
    pub fn new() -> Self {
        Self::with_board(String::new())
    }

    /// Create a store whose board tab holds `board_text`.
    #[must_use]
    pub fn with_board(board_text: String) -> Self {
        let mut texts = HashMap::new();
        texts.insert(BOARD_TAB.to_owned(), board_text);
        Self { texts, order: vec![BOARD_TAB.to_owned()] }
    }

    /// Raw text of a tab.
    #[must_use]
    pub fn get(&self, tab: &str) -> Option<&str> {
        self.texts.get(tab).map(String::as_str)
    }

    /// Whether a tab is open.
    #[must_use]
    pub fn contains(&self, tab: &str) -> bool {
        self.texts.contains_key(tab)
    }

    /// Replace a tab's text, opening the tab if needed. No validation.
    pub fn set(&mut self, tab: &str, text: String) {
        if !self.texts.contains_key(tab) {
            self.order.push(tab.to_owned());
        }
        self.texts.insert(tab.to_owned(), text);
    }

    /// Open a zone tab. Returns `false` without touching anything when the tab
    /// already exists. Without `initial_text` (or with an empty one) the tab
    /// starts from [`default_zone_text`].
    pub fn add_zone_tab(&mut self, zone_id: &str, initial_text: Option<String>) -> bool {
        if self.contains(zone_id) {
            return false;
        }
        let text = initial_text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| default_zone_text(zone_id));
        self.set(zone_id, text);
        true
    }

    /// Close a zone tab, returning its text.
    ///
    /// # Errors
    ///
    /// [`DocError::ProtectedTab`] for the board tab, [`DocError::MissingTab`]
    /// when no such tab is open.
    pub fn remove_zone_tab(&mut self, zone_id: &str) -> Result<String, DocError> {
        if zone_id == BOARD_TAB {
            return Err(DocError::ProtectedTab(zone_id.to_owned()));
        }
        let text = self
            .texts
            .remove(zone_id)
            .ok_or_else(|| DocError::MissingTab(zone_id.to_owned()))?;
        self.order.retain(|id| id != zone_id);
        Ok(text)
    }

    /// Tab ids in display order, board first.
    #[must_use]
    pub fn tab_ids(&self) -> &[String] {
        &self.order
    }

    /// Parse a tab as untyped JSON.
    ///
    /// # Errors
    ///
    /// [`DocError::MissingTab`] or [`DocError::Parse`].
    pub fn parse_value(&self, tab: &str) -> Result<Value, DocError> {
        let text = self.get(tab).ok_or_else(|| DocError::MissingTab(tab.to_owned()))?;
        serde_json::from_str(text).map_err(|e| DocError::parse(tab, e))
    }

    /// Parse the board tab.
    ///
    /// Only broken JSON is an error; mistyped fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// [`DocError::Parse`] when the text is not JSON, or
    /// [`DocError::NotAnObject`] when its root is not an object.
    pub fn parse_board(&self) -> Result<Board, DocError> {
        self.parse_typed(BOARD_TAB)
    }

    /// Parse a zone tab, leniently like [`DocStore::parse_board`].
    ///
    /// # Errors
    ///
    /// [`DocError::MissingTab`] when no tab is open for the zone,
    /// [`DocError::Parse`] when its text is not JSON, or
    /// [`DocError::NotAnObject`] when its root is not an object.
    pub fn parse_zone(&self, zone_id: &str) -> Result<Zone, DocError> {
        self.parse_typed(zone_id)
    }

    fn parse_typed<T: DeserializeOwned>(&self, tab: &str) -> Result<T, DocError> {
        let value = self.parse_value(tab)?;
        if !value.is_object() {
            return Err(DocError::NotAnObject(tab.to_owned()));
        }
        serde_json::from_value(value).map_err(|e| DocError::parse(tab, e))
    }

    /// Append an entity to a tab: `globalEntities` on the board, `entities` on
    /// a zone. The array is created when missing or not an array. The document
    /// is re-serialized with 2-space indentation; everything else in it,
    /// including keys the editor does not know, is kept in place.
    ///
    /// Returns the new text, which is also stored.
    ///
    /// # Errors
    ///
    /// [`DocError::InvalidTemplate`] when `entity_json` is not JSON,
    /// [`DocError::MissingTab`], [`DocError::Parse`] or
    /// [`DocError::NotAnObject`] for the target tab. The tab is unchanged on
    /// error.
    pub fn append_entity(&mut self, tab: &str, entity_json: &str) -> Result<String, DocError> {
        let entity: Value = serde_json::from_str(entity_json).map_err(DocError::InvalidTemplate)?;
        let mut doc = self.parse_value(tab)?;
        let Some(root) = doc.as_object_mut() else {
            return Err(DocError::NotAnObject(tab.to_owned()));
        };

        let key = if tab == BOARD_TAB { "globalEntities" } else { "entities" };
        let slot = root.entry(key).or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            items.push(entity);
        }

        let text = serde_json::to_string_pretty(&doc).map_err(|e| DocError::parse(tab, e))?;
        self.set(tab, text.clone());
        Ok(text)
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Text of a freshly opened zone tab.
#[must_use]
pub fn default_zone_text(zone_id: &str) -> String {
    let id = Value::String(zone_id.to_owned());
    format!(
        r#"{{
  "zoneId": {id},
  "name": "none",
  "size": {{
    "width": 0,
    "height": 0
  }},
  "entities": [
  ],
  "metadata": {{
    "difficulty": 0,
    "theme": "none",
    "isBeaten": false,
    "questTriggers": [
    ]
  }}
}}"#
    )
}
