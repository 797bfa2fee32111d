//! Shared constants for the level editor crate.

// ── Grid ────────────────────────────────────────────────────────

/// Edge length of one board cell in world pixels at zoom 1.
pub const CELL_SIZE_PX: f64 = 20.0;

// ── Camera ──────────────────────────────────────────────────────

/// Smallest zoom factor the camera accepts.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor the camera accepts.
pub const MAX_ZOOM: f64 = 10.0;

/// Multiplicative zoom step for one wheel notch towards the user.
pub const ZOOM_IN_STEP: f64 = 1.1;

/// Multiplicative zoom step for one wheel notch away from the user.
pub const ZOOM_OUT_STEP: f64 = 0.9;

// ── Text editor collaborator ────────────────────────────────────

/// Approximate line height of the source editor, used for scroll-to-selection.
pub const LINE_HEIGHT_PX: f64 = 20.0;

/// Indent width used when pretty-printing entity templates.
pub const TEMPLATE_INDENT: usize = 4;

/// Tab id of the board document. Always present.
pub const BOARD_TAB: &str = "board";

// ── Colors ──────────────────────────────────────────────────────

/// Fill for cells covered by a placed zone's footprint.
pub const ZONE_FILL: &str = "rgba(100,180,255,0.35)";

/// Grid line color.
pub const GRID_STROKE: &str = "#b0aea7";

/// Structure cell fill and outline.
pub const STRUCTURE_FILL: &str = "rgba(0,255,255,0.5)";
pub const STRUCTURE_STROKE: &str = "#00bfcf";

/// Isolani piece fill and outline.
pub const ISOLANI_FILL: &str = "magenta";
pub const ISOLANI_STROKE: &str = "#a000a0";

/// Fallback colors for an enemy piece with an unknown faction.
pub const UNKNOWN_FACTION_FILL: &str = "rgba(180,180,180,0.5)";
pub const UNKNOWN_FACTION_STROKE: &str = "#888";

/// Glyph outline width in screen pixels.
pub const GLYPH_STROKE_PX: f64 = 2.0;

/// Glyph label font size in screen pixels.
pub const GLYPH_FONT_PX: f64 = 14.0;
