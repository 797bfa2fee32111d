//! Source-span location: find the text of an entity inside a tab's raw JSON.
//!
//! This is a text search, not a JSON parser with source positions. It expects
//! the formatting the editor itself produces (2-space pretty printing) and
//! returns `None` whenever the text has been laid out differently. Callers
//! treat `None` as "nothing to highlight".
//!
//! All offsets are byte offsets into the tab text and always fall on UTF-8
//! character boundaries.

#[cfg(test)]
#[path = "locate_test.rs"]
mod locate_test;

use serde::Serialize;
use serde_json::Value;

/// Half-open byte range `[start, end)` into a tab's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 1-based line number of `start`.
    #[must_use]
    pub fn line(self, text: &str) -> usize {
        text.get(..self.start).map_or(1, |head| head.matches('\n').count() + 1)
    }

    /// Scroll offset that shows the span's first line with one line of context
    /// above it.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scroll_top(self, text: &str, line_height: f64) -> f64 {
        (self.line(text).saturating_sub(2) as f64) * line_height
    }
}

/// Which entity to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `entities[index]` of a zone document.
    ZoneEntity { index: usize },
    /// `globalEntities[index]` of the board document.
    GlobalEntity { index: usize },
}

/// Locate the selected entity in `text`.
///
/// Returns `None` when the text does not parse, the index is out of range,
/// or no heuristic matches.
#[must_use]
pub fn locate(text: &str, selector: &Selector) -> Option<Span> {
    let Ok(doc) = serde_json::from_str::<Value>(text) else {
        return None;
    };
    match *selector {
        Selector::ZoneEntity { index } => {
            let entity = doc.get("entities")?.get(index)?;
            locate_by_position(text, entity).or_else(|| locate_by_serialized(text, entity))
        }
        Selector::GlobalEntity { index } => {
            let entity = doc.get("globalEntities")?.get(index)?;
            let tag = entity.get("type")?.as_str()?;
            locate_by_type_marker(text, tag, index)
        }
    }
}

/// Match the `position` block as the editor prints it inside an entities array.
fn locate_by_position(text: &str, entity: &Value) -> Option<Span> {
    let pos = entity.get("position")?;
    let x = pos.get("x")?;
    let y = pos.get("y")?;
    let needle = format!("\"position\": {{\n        \"x\": {x},\n        \"y\": {y}");
    find(text, &needle)
}

/// Match the entity's own 2-space pretty-printed text.
fn locate_by_serialized(text: &str, entity: &Value) -> Option<Span> {
    let Ok(needle) = serde_json::to_string_pretty(entity) else {
        return None;
    };
    find(text, &needle)
}

/// Select from the `nth` occurrence of the entity's type marker to the end of
/// its object.
fn locate_by_type_marker(text: &str, tag: &str, nth: usize) -> Option<Span> {
    let marker = format!("\"type\": {}", Value::String(tag.to_owned()));
    let start = text.match_indices(&marker).nth(nth).map(|(i, _)| i)?;
    let rest = &text[start..];
    let close = rest
        .find("},")
        .or_else(|| rest.find("}]"))
        .or_else(|| rest.find('}'))?;
    Some(Span::new(start, start + close + 1))
}

fn find(text: &str, needle: &str) -> Option<Span> {
    let start = text.find(needle)?;
    Some(Span::new(start, start + needle.len()))
}
