//! Human-readable property summaries for the entity info panel.

#[cfg(test)]
#[path = "summary_test.rs"]
mod summary_test;

use serde::Serialize;

use crate::camera::Cell;
use crate::model::{Entity, EntityKind, StructureType};

/// One `label: value` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
}

impl SummaryLine {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self { label: label.to_owned(), value: value.into() }
    }
}

/// Rows describing the clicked cell.
#[must_use]
pub fn cell_line(cell: Cell) -> SummaryLine {
    SummaryLine::new("Cell", format!("({}, {})", cell.x, cell.y))
}

/// Rows for an empty-cell click.
#[must_use]
pub fn empty_cell(cell: Cell) -> Vec<SummaryLine> {
    vec![cell_line(cell), SummaryLine::new("Info", "No entity at this location.")]
}

/// Rows for a selected entity, keyed by its type.
#[must_use]
pub fn describe(entity: &Entity, cell: Cell) -> Vec<SummaryLine> {
    let props = entity.props();
    let mut lines = vec![cell_line(cell), SummaryLine::new("Entity Type", entity.type_tag.as_str())];
    match entity.kind() {
        EntityKind::IsolaniPiece => {
            if entity.properties.is_object() {
                lines.push(SummaryLine::new("Collected Fragments", props.collected_fragments().join(", ")));
                lines.push(SummaryLine::new("Equipped Fragments", props.equipped_fragments().join(", ")));
            }
        }
        EntityKind::EnemyPiece => {
            lines.push(SummaryLine::new("Faction", props.faction_raw().unwrap_or_default()));
            lines.push(SummaryLine::new("Piece Type", props.piece_type_raw().unwrap_or_default()));
            lines.push(SummaryLine::new("Movement Fragments", props.movement_fragments().join(", ")));
        }
        EntityKind::Structure => {
            lines.push(SummaryLine::new("Structure Type", props.structure_type_raw().unwrap_or_default()));
            if props.structure_type() == Some(StructureType::Checkpoint) {
                if let Some(id) = props.checkpoint_id().filter(|id| !id.is_empty()) {
                    lines.push(SummaryLine::new("Checkpoint ID", id));
                }
            }
        }
        EntityKind::NeutralPiece | EntityKind::Decoration | EntityKind::Other => {}
    }
    lines
}
