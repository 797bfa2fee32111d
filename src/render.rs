//! Rendering: paints a [`Scene`] onto a 2D canvas context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads the scene and camera and produces pixels. It does not mutate any
//! editor state and never parses documents; [`crate::scene::build`] has done
//! that already.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Camera, Cell};
use crate::config::EditorConfig;
use crate::consts::{GLYPH_FONT_PX, GLYPH_STROKE_PX, GRID_STROKE, ZONE_FILL};
use crate::model::Size;
use crate::scene::{Footprint, Glyph, GlyphShape, Scene};

/// Draw one frame.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel
/// ratio. With no scene the canvas is only cleared.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    scene: Option<&Scene>,
    camera: &Camera,
    config: &EditorConfig,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    // Layer 1: clear and set up transforms.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);

    let Some(scene) = scene else {
        return Ok(());
    };

    ctx.save();
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    let cell = config.cell_size_px;

    // Layer 2: zone footprints.
    for footprint in &scene.footprints {
        draw_footprint(ctx, footprint, cell);
    }

    // Layer 3: entities in draw order.
    for glyph in &scene.glyphs {
        draw_glyph(ctx, glyph, cell, camera.zoom)?;
    }

    // Layer 4: grid on top.
    draw_grid(ctx, scene.grid, cell, camera.zoom);

    ctx.restore();
    Ok(())
}

// =============================================================
// Layers
// =============================================================

fn draw_footprint(ctx: &CanvasRenderingContext2d, footprint: &Footprint, cell: f64) {
    ctx.set_fill_style_str(ZONE_FILL);
    for c in footprint.cells() {
        let o = c.origin(cell);
        ctx.fill_rect(o.x, o.y, cell, cell);
    }
}

fn draw_glyph(ctx: &CanvasRenderingContext2d, glyph: &Glyph, cell: f64, zoom: f64) -> Result<(), JsValue> {
    let o = glyph.cell.origin(cell);
    let c = glyph.cell.center(cell);

    ctx.save();
    ctx.set_global_alpha(glyph.alpha);
    ctx.set_fill_style_str(glyph.fill);
    ctx.set_stroke_style_str(glyph.stroke);
    ctx.set_line_width(GLYPH_STROKE_PX / zoom);

    match glyph.shape {
        GlyphShape::Square => {
            ctx.fill_rect(o.x, o.y, cell, cell);
            ctx.stroke_rect(o.x, o.y, cell, cell);
        }
        GlyphShape::Circle => {
            ctx.begin_path();
            ctx.arc(c.x, c.y, cell * 0.5, 0.0, 2.0 * PI)?;
            ctx.fill();
            ctx.stroke();
        }
    }

    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str(glyph.label_color);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("{}px monospace", GLYPH_FONT_PX / zoom));
    ctx.fill_text(&glyph.label.to_string(), c.x, c.y)?;

    ctx.restore();
    Ok(())
}

/// Cell boundaries over the whole board, one world pixel wide on screen.
fn draw_grid(ctx: &CanvasRenderingContext2d, grid: Size, cell: f64, zoom: f64) {
    if grid.width <= 0 || grid.height <= 0 {
        return;
    }
    let far = Cell::new(grid.width, grid.height).origin(cell);

    ctx.save();
    ctx.set_stroke_style_str(GRID_STROKE);
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();
    for x in 0..=grid.width {
        let px = Cell::new(x, 0).origin(cell).x;
        ctx.move_to(px, 0.0);
        ctx.line_to(px, far.y);
    }
    for y in 0..=grid.height {
        let py = Cell::new(0, y).origin(cell).y;
        ctx.move_to(0.0, py);
        ctx.line_to(far.x, py);
    }
    ctx.stroke();
    ctx.restore();
}
