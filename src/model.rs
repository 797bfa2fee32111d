//! Level format: board, zones, and the entities placed on them.
//!
//! These are read-only typed views over the raw JSON held by
//! [`crate::doc::DocStore`]. They are rebuilt from text on every render or
//! query and never written back; edits go through the untyped
//! `serde_json::Value` path so unknown keys survive. Fields decode through
//! `crate::lenient`, so a mistyped field falls back to its default instead
//! of rejecting the document.
//!
//! Entity properties stay an open-ended JSON bag (`properties`) with typed
//! accessors in [`Props`], because the bag's shape depends on the entity type
//! and the editor must tolerate partially filled entities.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};

use crate::camera::Cell;
use crate::consts::{UNKNOWN_FACTION_FILL, UNKNOWN_FACTION_STROKE};
use crate::lenient;

/// Width and height in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i64,
    pub height: i64,
}

/// Top-level level document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Extent of the drawn grid.
    #[serde(default, deserialize_with = "lenient::size")]
    pub global_size: Size,
    /// Zone placements in draw and lookup order.
    #[serde(default, deserialize_with = "lenient::list")]
    pub placed_zones: Vec<PlacedZone>,
    /// Entities positioned in global board cells.
    #[serde(default, deserialize_with = "lenient::list")]
    pub global_entities: Vec<Entity>,
}

impl Board {
    /// Zone ids in placement order. Duplicates are kept.
    #[must_use]
    pub fn placed_zone_ids(&self) -> Vec<&str> {
        self.placed_zones.iter().map(|z| z.zone_id.as_str()).collect()
    }

    /// First placement of `zone_id`, if any.
    #[must_use]
    pub fn placement(&self, zone_id: &str) -> Option<&PlacedZone> {
        self.placed_zones.iter().find(|z| z.zone_id == zone_id)
    }
}

/// A zone placed onto the board at an offset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedZone {
    #[serde(default, deserialize_with = "lenient::string")]
    pub zone_id: String,
    /// Missing or unusable positions place the zone at the origin.
    #[serde(default, deserialize_with = "lenient::cell")]
    pub world_position: Cell,
    /// Placement rotation in degrees. Carried, not applied.
    #[serde(default, deserialize_with = "lenient::float")]
    pub rotation: f64,
}

/// A zone document: a rectangular region with zone-local entities.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(default, deserialize_with = "lenient::string")]
    pub zone_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Footprint size. A zone without a size has an empty footprint.
    #[serde(default, deserialize_with = "lenient::opt_size")]
    pub size: Option<Size>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// The closed set of entity types the editor knows how to draw or describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Structure,
    EnemyPiece,
    IsolaniPiece,
    NeutralPiece,
    Decoration,
    /// A type tag the editor does not recognize.
    Other,
}

impl EntityKind {
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "Structure" => Self::Structure,
            "EnemyPiece" => Self::EnemyPiece,
            "IsolaniPiece" => Self::IsolaniPiece,
            "NeutralPiece" => Self::NeutralPiece,
            "Decoration" => Self::Decoration,
            _ => Self::Other,
        }
    }
}

/// A game object on a board or in a zone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    /// Raw type tag, e.g. `"Structure"`.
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub type_tag: String,
    /// Cell position; zone-local or global depending on the owner. Entities
    /// without a usable position are kept but not drawn.
    #[serde(default, deserialize_with = "lenient::opt_cell")]
    pub position: Option<Cell>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub rotation: f64,
    /// Type-specific property bag.
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl Entity {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        EntityKind::parse(&self.type_tag)
    }

    #[must_use]
    pub fn props(&self) -> Props<'_> {
        Props::new(&self.properties)
    }
}

/// Structure subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureType {
    Wall,
    Checkpoint,
    Safezone,
}

impl StructureType {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Wall" => Some(Self::Wall),
            "Checkpoint" => Some(Self::Checkpoint),
            "Safezone" => Some(Self::Safezone),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wall => "Wall",
            Self::Checkpoint => "Checkpoint",
            Self::Safezone => "Safezone",
        }
    }

    /// Single-letter glyph label.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Wall => 'W',
            Self::Checkpoint => 'C',
            Self::Safezone => 'S',
        }
    }
}

/// Enemy factions, one per board edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Faction {
    North,
    East,
    #[default]
    South,
    West,
}

impl Faction {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "North" => Some(Self::North),
            "East" => Some(Self::East),
            "South" => Some(Self::South),
            "West" => Some(Self::West),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::East => "East",
            Self::South => "South",
            Self::West => "West",
        }
    }

    /// `(fill, stroke)` CSS colors for this faction's pieces.
    #[must_use]
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            Self::North => ("rgba(0,120,255,0.5)", "#0050b0"),
            Self::East => ("rgba(255,220,0,0.5)", "#b0a000"),
            Self::South => ("rgba(255,60,60,0.5)", "#b00000"),
            Self::West => ("rgba(60,200,60,0.5)", "#008000"),
        }
    }
}

/// Colors for an optional faction, falling back to grey.
#[must_use]
pub fn faction_colors(faction: Option<Faction>) -> (&'static str, &'static str) {
    faction.map_or((UNKNOWN_FACTION_FILL, UNKNOWN_FACTION_STROKE), Faction::colors)
}

/// Chess-like piece types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceType {
    Knight,
    King,
    Queen,
    Rook,
    Bishop,
    Pawn,
}

impl PieceType {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Knight" => Some(Self::Knight),
            "King" => Some(Self::King),
            "Queen" => Some(Self::Queen),
            "Rook" => Some(Self::Rook),
            "Bishop" => Some(Self::Bishop),
            "Pawn" => Some(Self::Pawn),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Knight => "Knight",
            Self::King => "King",
            Self::Queen => "Queen",
            Self::Rook => "Rook",
            Self::Bishop => "Bishop",
            Self::Pawn => "Pawn",
        }
    }

    /// Glyph letter. King is `A` so it does not collide with Knight.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Knight => 'K',
            Self::King => 'A',
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Pawn => 'P',
        }
    }
}

/// Typed access to an entity's `properties` bag.
pub struct Props<'a> {
    value: &'a serde_json::Value,
}

impl<'a> Props<'a> {
    #[must_use]
    pub fn new(value: &'a serde_json::Value) -> Self {
        Self { value }
    }

    fn str_field(&self, key: &str) -> Option<&'a str> {
        self.value.get(key).and_then(serde_json::Value::as_str)
    }

    fn str_list(&self, key: &str) -> Vec<&'a str> {
        self.value
            .get(key)
            .and_then(serde_json::Value::as_array)
            .map(|items| items.iter().filter_map(serde_json::Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Raw `structureType` string.
    #[must_use]
    pub fn structure_type_raw(&self) -> Option<&'a str> {
        self.str_field("structureType")
    }

    #[must_use]
    pub fn structure_type(&self) -> Option<StructureType> {
        self.structure_type_raw().and_then(StructureType::parse)
    }

    #[must_use]
    pub fn checkpoint_id(&self) -> Option<&'a str> {
        self.str_field("checkpointId")
    }

    /// Raw `faction` string.
    #[must_use]
    pub fn faction_raw(&self) -> Option<&'a str> {
        self.str_field("faction")
    }

    #[must_use]
    pub fn faction(&self) -> Option<Faction> {
        self.faction_raw().and_then(Faction::parse)
    }

    /// Raw `pieceType` string.
    #[must_use]
    pub fn piece_type_raw(&self) -> Option<&'a str> {
        self.str_field("pieceType")
    }

    #[must_use]
    pub fn piece_type(&self) -> Option<PieceType> {
        self.piece_type_raw().and_then(PieceType::parse)
    }

    #[must_use]
    pub fn movement_fragments(&self) -> Vec<&'a str> {
        self.str_list("movementFragments")
    }

    #[must_use]
    pub fn collected_fragments(&self) -> Vec<&'a str> {
        self.str_list("CollectedFragments")
    }

    #[must_use]
    pub fn equipped_fragments(&self) -> Vec<&'a str> {
        self.str_list("EquippedFragments")
    }
}
