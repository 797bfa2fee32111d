use serde::Serialize;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Cell, Point};
use crate::config::EditorConfig;
use crate::consts::BOARD_TAB;
use crate::doc::DocStore;
use crate::hit::{self, Hit};
use crate::input::{Button, InputState, WheelDelta};
use crate::locate::{self, Selector, Span};
use crate::model::Entity;
use crate::render;
use crate::scene::{self, HitBox, Scene};
use crate::summary::{self, SummaryLine};
use crate::template::{self, CellTarget, EntityTemplate};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    /// The canvas must be redrawn.
    RenderNeeded,
    SetCursor { cursor: String },
    /// Make `tab` the visible editor tab.
    SwitchTab { tab: String },
    TabOpened { tab: String },
    TabClosed { tab: String },
    /// The engine rewrote a tab's text; the editor widget must show `text`.
    TabTextChanged { tab: String, text: String },
    /// Blocking, user-visible message.
    Notice { message: String },
    /// A click hit no entity.
    EmptyCellClicked { cell: Cell, zone_id: Option<String> },
    /// A click hit an entity.
    EntitySelected { zone_id: Option<String>, entity_index: usize, entity: Entity, cell: Cell },
    /// Select `span` in `tab`'s editor and scroll to `scroll_top`.
    Highlight { tab: String, span: Span, scroll_top: f64 },
    /// Replace the info panel contents.
    ShowInfo { lines: Vec<SummaryLine> },
    /// New add-panel template text and add-button state.
    TemplateChanged { text: String, can_add: bool },
}

/// Editor UI state visible to the host.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Tab shown in the source editor.
    pub active_tab: String,
    /// Last empty cell clicked; `None` disables adding.
    pub target: Option<CellTarget>,
    /// Entity type chosen in the add panel.
    pub template: EntityTemplate,
}

impl Default for UiState {
    fn default() -> Self {
        Self { active_tab: BOARD_TAB.to_owned(), target: None, template: EntityTemplate::default() }
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: DocStore,
    pub camera: Camera,
    pub config: EditorConfig,
    pub ui: UiState,
    pub input: InputState,
    /// Result of the last draw pass; `None` while the board is unavailable.
    pub scene: Option<Scene>,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            doc: DocStore::new(),
            camera: Camera::default(),
            config,
            ui: UiState::default(),
            input: InputState::default(),
            scene: None,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    // --- Documents and tabs ---

    /// Replace a tab's text. Takes effect on the next render.
    pub fn set_document(&mut self, tab: &str, text: String) {
        self.doc.set(tab, text);
    }

    #[must_use]
    pub fn document(&self, tab: &str) -> Option<&str> {
        self.doc.get(tab)
    }

    /// Open a zone tab (or switch to it if already open).
    pub fn add_zone_tab(&mut self, zone_id: &str, initial_text: Option<String>) -> Vec<Action> {
        let zone_id = zone_id.trim();
        if zone_id.is_empty() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.doc.add_zone_tab(zone_id, initial_text) {
            actions.push(Action::TabOpened { tab: zone_id.to_owned() });
        }
        actions.extend(self.switch_tab(zone_id));
        actions
    }

    /// Close a zone tab. The board tab stays open.
    pub fn remove_zone_tab(&mut self, zone_id: &str) -> Vec<Action> {
        if let Err(e) = self.doc.remove_zone_tab(zone_id) {
            debug!(tab = %zone_id, error = %e, "tab not closed");
            return Vec::new();
        }
        let mut actions = vec![Action::TabClosed { tab: zone_id.to_owned() }];
        if self.ui.active_tab == zone_id {
            actions.extend(self.switch_tab(BOARD_TAB));
        }
        actions
    }

    /// Make `tab` active. Unknown tabs are ignored.
    pub fn switch_tab(&mut self, tab: &str) -> Vec<Action> {
        if !self.doc.contains(tab) {
            return Vec::new();
        }
        tab.clone_into(&mut self.ui.active_tab);
        vec![Action::SwitchTab { tab: tab.to_owned() }]
    }

    // --- Rendering ---

    /// Explicit render request: reset the view and rebuild the scene.
    ///
    /// A malformed board raises a [`Action::Notice`] and leaves the current
    /// view untouched.
    pub fn request_render(&mut self) -> Vec<Action> {
        match scene::build(&self.doc) {
            Ok(scene) => {
                self.camera = Camera::default();
                self.input = InputState::Idle;
                debug!(hit_boxes = scene.hit_boxes.len(), "view reset");
                self.scene = Some(scene);
                vec![Action::RenderNeeded]
            }
            Err(e) => {
                warn!(error = %e, "board not rendered");
                vec![Action::Notice { message: format!("Invalid board JSON: {e}") }]
            }
        }
    }

    /// Rebuild the scene after a view change. Failures clear the scene
    /// without notifying the user.
    fn refresh(&mut self) -> Vec<Action> {
        self.scene = match scene::build(&self.doc) {
            Ok(scene) => Some(scene),
            Err(e) => {
                debug!(error = %e, "board unavailable");
                None
            }
        };
        vec![Action::RenderNeeded]
    }

    // --- Input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.input = InputState::Panning { start_screen: screen_pt, origin_pan: self.camera.pan() };
        vec![Action::SetCursor { cursor: "grabbing".to_owned() }]
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let InputState::Panning { start_screen, origin_pan } = self.input else {
            return Vec::new();
        };
        self.camera.pan_from(origin_pan, start_screen, screen_pt);
        self.refresh()
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button) -> Vec<Action> {
        if self.input == InputState::Idle {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::SetCursor { cursor: "default".to_owned() }]
    }

    /// Zoom one step around the pointer.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        let step = if delta.zooms_in() { self.config.zoom_in_step } else { self.config.zoom_out_step };
        self.camera.zoom_at(screen_pt, step, self.config.min_zoom, self.config.max_zoom);
        self.refresh()
    }

    /// Resolve a click: select the first entity under the pointer, or report
    /// an empty cell.
    pub fn on_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let Some(scene) = self.scene.as_ref() else {
            return Vec::new();
        };
        let (cell, hit) = hit::hit_test(screen_pt, scene, &self.camera, self.config.cell_size_px);
        match hit {
            Hit::Entity(hit_box) => {
                let hit_box = hit_box.clone();
                self.select_entity(&hit_box, cell)
            }
            Hit::Empty { zone_id } => {
                let zone_id = zone_id.map(str::to_owned);
                self.click_empty_cell(cell, zone_id)
            }
        }
    }

    fn select_entity(&mut self, hit_box: &HitBox, cell: Cell) -> Vec<Action> {
        let tab = hit_box.zone_id.as_deref().unwrap_or(BOARD_TAB);
        let mut actions = vec![Action::EntitySelected {
            zone_id: hit_box.zone_id.clone(),
            entity_index: hit_box.entity_index,
            entity: hit_box.entity.clone(),
            cell,
        }];
        actions.extend(self.switch_tab(tab));
        actions.extend(self.highlight(tab, hit_box));
        actions.push(Action::ShowInfo { lines: summary::describe(&hit_box.entity, cell) });
        actions
    }

    fn highlight(&self, tab: &str, hit_box: &HitBox) -> Option<Action> {
        let text = self.doc.get(tab)?;
        let selector = match hit_box.zone_id {
            Some(_) => Selector::ZoneEntity { index: hit_box.entity_index },
            None => Selector::GlobalEntity { index: hit_box.entity_index },
        };
        let Some(span) = locate::locate(text, &selector) else {
            debug!(tab = %tab, index = hit_box.entity_index, "entity text not found");
            return None;
        };
        Some(Action::Highlight {
            tab: tab.to_owned(),
            span,
            scroll_top: span.scroll_top(text, self.config.line_height_px),
        })
    }

    fn click_empty_cell(&mut self, cell: Cell, zone_id: Option<String>) -> Vec<Action> {
        let board = match self.doc.parse_board() {
            Ok(board) => Some(board),
            Err(e) => {
                debug!(error = %e, "empty-cell target without zone offset");
                None
            }
        };
        self.ui.target = Some(CellTarget::new(cell, zone_id.as_deref(), board.as_ref()));

        let mut actions = vec![Action::ShowInfo { lines: summary::empty_cell(cell) }];
        actions.extend(self.switch_tab(zone_id.as_deref().unwrap_or(BOARD_TAB)));
        actions.push(Action::EmptyCellClicked { cell, zone_id });
        actions.push(self.template_changed());
        actions
    }

    // --- Add-entity panel ---

    /// Choose the entity type for the add panel.
    pub fn set_template(&mut self, template: EntityTemplate) -> Vec<Action> {
        self.ui.template = template;
        vec![self.template_changed()]
    }

    /// Template text for the current selection and target; empty if the
    /// template cannot be written.
    #[must_use]
    pub fn template_text(&self) -> String {
        let target = self.ui.target.clone().unwrap_or_default();
        match template::build_template(self.ui.template, &target, self.config.template_indent) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "template not built");
                String::new()
            }
        }
    }

    /// Whether the add button is enabled.
    #[must_use]
    pub fn can_add(&self) -> bool {
        self.ui.target.as_ref().is_some_and(|t| self.ui.template.can_add(t))
    }

    fn template_changed(&self) -> Action {
        Action::TemplateChanged { text: self.template_text(), can_add: self.can_add() }
    }

    /// Append `entity_json` to `tab` (the active tab when `None`), then
    /// disable adding until the next empty-cell click and re-render.
    pub fn append_entity(&mut self, entity_json: &str, tab: Option<&str>) -> Vec<Action> {
        let tab = tab.map_or_else(|| self.ui.active_tab.clone(), str::to_owned);
        let text = match self.doc.append_entity(&tab, entity_json) {
            Ok(text) => text,
            Err(e) => {
                warn!(tab = %tab, error = %e, "entity not appended");
                return vec![Action::Notice { message: e.to_string() }];
            }
        };
        self.ui.target = None;
        let mut actions = vec![Action::TabTextChanged { tab, text }, self.template_changed()];
        actions.extend(self.request_render());
        actions
    }

    // --- Viewport ---

    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
    }

    // --- Queries ---

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Open tabs in display order, board first.
    #[must_use]
    pub fn tab_ids(&self) -> &[String] {
        self.doc.tab_ids()
    }

    #[must_use]
    pub fn active_tab(&self) -> &str {
        &self.ui.active_tab
    }

    /// Hit-boxes of the last draw pass, in lookup order.
    #[must_use]
    pub fn hit_boxes(&self) -> &[HitBox] {
        self.scene.as_ref().map(|s| s.hit_boxes.as_slice()).unwrap_or_default()
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Fails when the canvas cannot provide a 2D context.
    pub fn new(canvas: HtmlCanvasElement, config: EditorConfig) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        Ok(Self { canvas, ctx, core: EngineCore::with_config(config) })
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio, resizing the backing store.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    pub fn render(&self) {
        let core = &self.core;
        if let Err(e) = render::draw(
            &self.ctx,
            core.scene.as_ref(),
            &core.camera,
            &core.config,
            core.viewport_width,
            core.viewport_height,
            core.dpr,
        ) {
            warn!(error = ?e, "frame not drawn");
        }
    }
}
