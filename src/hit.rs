#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Cell, Point};
use crate::scene::{HitBox, Scene};

/// What a click landed on.
#[derive(Debug, Clone, PartialEq)]
pub enum Hit<'a> {
    /// The first hit-box covering the clicked cell.
    Entity(&'a HitBox),
    /// No entity; `zone_id` is the first placed zone whose footprint covers the cell.
    Empty { zone_id: Option<&'a str> },
}

/// First hit-box in `boxes` on `cell`.
#[must_use]
pub fn entity_at(cell: Cell, boxes: &[HitBox]) -> Option<&HitBox> {
    boxes.iter().find(|b| b.cell == cell)
}

/// Resolve a screen-space click against a scene.
///
/// Returns the clicked cell together with the hit.
#[must_use]
pub fn hit_test<'a>(screen_pt: Point, scene: &'a Scene, camera: &Camera, cell_size: f64) -> (Cell, Hit<'a>) {
    let cell = camera.screen_to_cell(screen_pt, cell_size);
    let hit = match entity_at(cell, &scene.hit_boxes) {
        Some(b) => Hit::Entity(b),
        None => Hit::Empty { zone_id: scene.zone_at(cell).map(|f| f.zone_id.as_str()) },
    };
    (cell, hit)
}
