//! Entity templates for the add-entity panel.
//!
//! The panel remembers the last empty cell the user clicked as a
//! [`CellTarget`], lets them pick an [`EntityTemplate`], and shows the JSON
//! produced by [`build_template`] for editing before it is appended. Zone
//! targets get zone-local coordinates; board targets get global ones.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use serde::Serialize;
use serde::ser::Error as _;
use serde_json::{Value, json};

use crate::camera::{Cell, global_to_zone_local};
use crate::model::{Board, EntityKind, Faction, PieceType, StructureType};

/// Where a new entity will go.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellTarget {
    /// Clicked global cell.
    pub cell: Cell,
    /// Zone whose footprint contains the cell, if any.
    pub zone_id: Option<String>,
    /// Cell relative to the zone's placement; equals `cell` without a zone.
    pub local: Cell,
}

impl CellTarget {
    /// Build a target for a clicked cell, converting to zone-local coordinates
    /// through the zone's first placement on `board`.
    #[must_use]
    pub fn new(cell: Cell, zone_id: Option<&str>, board: Option<&Board>) -> Self {
        let local = zone_id
            .and_then(|id| board.and_then(|b| b.placement(id)))
            .map_or(cell, |p| global_to_zone_local(cell, p.world_position));
        Self { cell, zone_id: zone_id.map(str::to_owned), local }
    }

    /// Position to write into the template.
    #[must_use]
    pub fn position(&self) -> Cell {
        if self.zone_id.is_some() { self.local } else { self.cell }
    }
}

/// Entity type and subtype chosen in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityTemplate {
    EnemyPiece { piece_type: PieceType, faction: Faction },
    Structure { structure_type: StructureType },
    #[default]
    NeutralPiece,
    Decoration,
}

impl EntityTemplate {
    /// Template for the panel's dropdown values. `subtype` is the piece type
    /// for enemy pieces and the structure type for structures; `faction` only
    /// applies to enemy pieces. Unknown values yield `None`.
    #[must_use]
    pub fn from_choice(entity_type: &str, subtype: &str, faction: &str) -> Option<Self> {
        match EntityKind::parse(entity_type) {
            EntityKind::EnemyPiece => Some(Self::EnemyPiece {
                piece_type: PieceType::parse(subtype)?,
                faction: Faction::parse(faction)?,
            }),
            EntityKind::Structure => Some(Self::Structure { structure_type: StructureType::parse(subtype)? }),
            EntityKind::NeutralPiece => Some(Self::NeutralPiece),
            EntityKind::Decoration => Some(Self::Decoration),
            EntityKind::IsolaniPiece | EntityKind::Other => None,
        }
    }

    /// Whether this template may be added at `target`.
    ///
    /// Enemy pieces, safezones and checkpoints belong to zones. Walls and the
    /// remaining types can go anywhere.
    #[must_use]
    pub fn can_add(self, target: &CellTarget) -> bool {
        let in_zone = target.zone_id.is_some();
        match self {
            Self::EnemyPiece { .. } => in_zone,
            Self::Structure { structure_type: StructureType::Safezone | StructureType::Checkpoint } => in_zone,
            Self::Structure { structure_type: StructureType::Wall } | Self::NeutralPiece | Self::Decoration => true,
        }
    }

    /// Template as a JSON value. Types without a template yield `{}`.
    #[must_use]
    pub fn to_value(self, position: Cell) -> Value {
        match self {
            Self::EnemyPiece { piece_type, faction } => json!({
                "type": "EnemyPiece",
                "position": position,
                "rotation": 0,
                "properties": {
                    "faction": faction.as_str(),
                    "pieceType": piece_type.as_str(),
                    "movementFragments": []
                }
            }),
            Self::Structure { structure_type } => {
                let mut properties = json!({ "structureType": structure_type.as_str() });
                if structure_type == StructureType::Checkpoint {
                    properties["checkpointId"] = json!("");
                }
                json!({
                    "type": "Structure",
                    "position": position,
                    "rotation": 0,
                    "properties": properties
                })
            }
            Self::NeutralPiece | Self::Decoration => json!({}),
        }
    }
}

/// Pretty-print the template for `target` with `indent` spaces per level.
///
/// # Errors
///
/// Returns the serializer's error if the template cannot be written.
pub fn build_template(template: EntityTemplate, target: &CellTarget, indent: usize) -> Result<String, serde_json::Error> {
    let value = template.to_value(target.position());
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(out).map_err(serde_json::Error::custom)
}
