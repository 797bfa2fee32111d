//! Scene building: one full draw pass over the current documents.
//!
//! [`build`] reads the board and every placed zone from the [`DocStore`] and
//! produces a [`Scene`]: zone footprints, entity glyphs, the grid extent, and
//! the ordered list of clickable [`HitBox`]es. Everything is in cell
//! coordinates; [`crate::render`] turns a scene into pixels and
//! [`crate::hit`] resolves clicks against it.
//!
//! Draw order, which is also hit-test order:
//! 1. for each placed zone: its structures, then its enemy pieces
//! 2. global isolani pieces
//! 3. global wall structures
//!
//! A placement whose zone tab is missing or does not parse is skipped.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::camera::{Cell, zone_local_to_global};
use crate::consts::{ISOLANI_FILL, ISOLANI_STROKE, STRUCTURE_FILL, STRUCTURE_STROKE};
use crate::doc::DocStore;
use crate::error::DocError;
use crate::model::{Board, Entity, EntityKind, PlacedZone, Size, StructureType, Zone, faction_colors};

/// Glyph outline shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphShape {
    /// Filled cell-sized square.
    Square,
    /// Circle inscribed in the cell.
    Circle,
}

/// Visual for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub cell: Cell,
    pub shape: GlyphShape,
    pub fill: &'static str,
    pub stroke: &'static str,
    /// Fill opacity.
    pub alpha: f64,
    pub label: char,
    pub label_color: &'static str,
}

/// Axis-aligned zone footprint in global cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub zone_id: String,
    pub origin: Cell,
    pub size: Size,
}

impl Footprint {
    /// Whether a global cell lies inside the footprint.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        // Offsets are taken in i128 so cells near the i64 bounds compare exactly.
        let within = |at: i64, origin: i64, extent: i64| {
            (0..i128::from(extent)).contains(&(i128::from(at) - i128::from(origin)))
        };
        within(cell.x, self.origin.x, self.size.width) && within(cell.y, self.origin.y, self.size.height)
    }

    /// Every covered cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size.height.max(0))
            .flat_map(move |y| {
                (0..self.size.width.max(0))
                    .map(move |x| Cell::new(self.origin.x.saturating_add(x), self.origin.y.saturating_add(y)))
            })
    }
}

/// A clickable entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitBox {
    /// Owning zone, or `None` for a global entity.
    pub zone_id: Option<String>,
    /// Index into the owner's entity array.
    pub entity_index: usize,
    /// Global cell the entity occupies.
    pub cell: Cell,
    pub entity: Entity,
}

/// Result of one draw pass.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Grid extent in cells.
    pub grid: Size,
    pub footprints: Vec<Footprint>,
    pub glyphs: Vec<Glyph>,
    /// In draw order; the first box containing a point wins.
    pub hit_boxes: Vec<HitBox>,
}

impl Scene {
    /// First footprint containing `cell`, in placement order.
    #[must_use]
    pub fn zone_at(&self, cell: Cell) -> Option<&Footprint> {
        self.footprints.iter().find(|f| f.contains(cell))
    }
}

/// Parse the documents and build the scene.
///
/// # Errors
///
/// Returns [`DocError::Parse`] when the board itself does not parse. Zone
/// failures never propagate.
pub fn build(doc: &DocStore) -> Result<Scene, DocError> {
    let board = doc.parse_board()?;
    Ok(build_from_board(doc, &board))
}

/// Build the scene for an already parsed board, reading zones from `doc`.
#[must_use]
pub fn build_from_board(doc: &DocStore, board: &Board) -> Scene {
    let mut scene = Scene { grid: board.global_size, ..Scene::default() };

    // Each zone document is parsed once, however often it is placed.
    let mut documents: HashMap<&str, Option<Zone>> = HashMap::new();
    for zone_id in board.placed_zone_ids() {
        documents.entry(zone_id).or_insert_with(|| resolve_zone(doc, zone_id));
    }
    let zones: Vec<(&PlacedZone, &Zone)> = board
        .placed_zones
        .iter()
        .filter_map(|placement| {
            let zone = documents.get(placement.zone_id.as_str())?.as_ref()?;
            Some((placement, zone))
        })
        .collect();

    for (placement, zone) in &zones {
        if let Some(size) = zone.size {
            scene.footprints.push(Footprint {
                zone_id: placement.zone_id.clone(),
                origin: placement.world_position,
                size,
            });
        }
    }

    for (placement, zone) in &zones {
        push_zone_entities(&mut scene, placement, zone, EntityKind::Structure, structure_glyph);
        push_zone_entities(&mut scene, placement, zone, EntityKind::EnemyPiece, enemy_glyph);
    }

    for (index, entity) in board.global_entities.iter().enumerate() {
        if entity.kind() != EntityKind::IsolaniPiece {
            continue;
        }
        if let Some(cell) = entity.position {
            push(&mut scene, None, index, cell, entity, isolani_glyph(cell));
        }
    }

    for (index, entity) in board.global_entities.iter().enumerate() {
        if entity.kind() != EntityKind::Structure || entity.props().structure_type() != Some(StructureType::Wall) {
            continue;
        }
        if let Some(cell) = entity.position {
            push(&mut scene, None, index, cell, entity, structure_glyph(cell, entity));
        }
    }

    scene
}

fn resolve_zone(doc: &DocStore, zone_id: &str) -> Option<Zone> {
    match doc.parse_zone(zone_id) {
        Ok(zone) => Some(zone),
        Err(e) => {
            debug!(zone_id = %zone_id, error = %e, "skipping placed zone");
            None
        }
    }
}

fn push_zone_entities(
    scene: &mut Scene,
    placement: &PlacedZone,
    zone: &Zone,
    kind: EntityKind,
    glyph: fn(Cell, &Entity) -> Glyph,
) {
    for (index, entity) in zone.entities.iter().enumerate() {
        if entity.kind() != kind {
            continue;
        }
        let Some(local) = entity.position else {
            continue;
        };
        let cell = zone_local_to_global(local, placement.world_position, placement.rotation);
        push(scene, Some(&placement.zone_id), index, cell, entity, glyph(cell, entity));
    }
}

fn push(scene: &mut Scene, zone_id: Option<&str>, index: usize, cell: Cell, entity: &Entity, glyph: Glyph) {
    scene.glyphs.push(glyph);
    scene.hit_boxes.push(HitBox {
        zone_id: zone_id.map(str::to_owned),
        entity_index: index,
        cell,
        entity: entity.clone(),
    });
}

fn structure_glyph(cell: Cell, entity: &Entity) -> Glyph {
    Glyph {
        cell,
        shape: GlyphShape::Square,
        fill: STRUCTURE_FILL,
        stroke: STRUCTURE_STROKE,
        alpha: 1.0,
        label: entity.props().structure_type().map_or('?', StructureType::letter),
        label_color: "#000",
    }
}

fn enemy_glyph(cell: Cell, entity: &Entity) -> Glyph {
    let props = entity.props();
    let (fill, stroke) = faction_colors(props.faction());
    Glyph {
        cell,
        shape: GlyphShape::Circle,
        fill,
        stroke,
        alpha: 0.8,
        label: props.piece_type().map_or('?', |p| p.letter()),
        label_color: "#000",
    }
}

fn isolani_glyph(cell: Cell) -> Glyph {
    Glyph {
        cell,
        shape: GlyphShape::Circle,
        fill: ISOLANI_FILL,
        stroke: ISOLANI_STROKE,
        alpha: 0.7,
        label: 'I',
        label_color: "#fff",
    }
}
