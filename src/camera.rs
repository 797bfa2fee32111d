//! Pan/zoom camera and the mappings between screen, world and cell space.
//!
//! Screen space is CSS pixels relative to the canvas' top-left corner. World
//! space is board pixels at zoom 1: cell `(cx, cy)` covers
//! `[cx * cell, (cx + 1) * cell)` on each axis. There is no vertical flip;
//! the board origin is the top-left corner, like the screen.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Integer board cell coordinates. Also the wire shape of `position` and
/// `worldPosition` in the level JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i64,
    pub y: i64,
}

impl Cell {
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// World-space top-left corner of this cell.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn origin(self, cell_size: f64) -> Point {
        Point::new(self.x as f64 * cell_size, self.y as f64 * cell_size)
    }

    /// World-space center of this cell.
    #[must_use]
    pub fn center(self, cell_size: f64) -> Point {
        let o = self.origin(cell_size);
        Point::new(o.x + cell_size * 0.5, o.y + cell_size * 0.5)
    }

    /// Cell containing the world-space point.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn containing(world: Point, cell_size: f64) -> Self {
        Self::new((world.x / cell_size).floor() as i64, (world.y / cell_size).floor() as i64)
    }
}

/// Map a zone-local cell to a global board cell.
///
/// `rotation` is carried in the level data but is not applied: a zone placed
/// at 90 degrees maps exactly like one placed at 0. Coordinates saturate at
/// the `i64` range.
#[must_use]
pub fn zone_local_to_global(local: Cell, world_position: Cell, _rotation: f64) -> Cell {
    Cell::new(world_position.x.saturating_add(local.x), world_position.y.saturating_add(local.y))
}

/// Inverse of [`zone_local_to_global`].
#[must_use]
pub fn global_to_zone_local(global: Cell, world_position: Cell) -> Cell {
    Cell::new(global.x.saturating_sub(world_position.x), global.y.saturating_sub(world_position.y))
}

/// Camera state for pan/zoom over the board.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Cell under a screen-space point.
    #[must_use]
    pub fn screen_to_cell(&self, screen: Point, cell_size: f64) -> Cell {
        Cell::containing(self.screen_to_world(screen), cell_size)
    }

    /// Multiply zoom by `factor`, clamped to `[min_zoom, max_zoom]`, keeping
    /// the world point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64, min_zoom: f64, max_zoom: f64) {
        let world = self.screen_to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(min_zoom, max_zoom);
        self.pan_x = anchor.x - world.x * self.zoom;
        self.pan_y = anchor.y - world.y * self.zoom;
    }

    /// Pan so that the offset equals `origin` plus the pointer travel since the
    /// gesture started.
    pub fn pan_from(&mut self, origin: Point, start_screen: Point, current_screen: Point) {
        self.pan_x = origin.x + (current_screen.x - start_screen.x);
        self.pan_y = origin.y + (current_screen.y - start_screen.y);
    }

    /// Current pan offset as a point.
    #[must_use]
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }
}
