//! `wasm-bindgen` surface for the host page.
//!
//! [`EditorHandle`] wraps an [`Engine`] and forwards DOM events to it. Every
//! [`Action`] the engine returns is serialized to JSON and passed to the
//! callback registered with [`EditorHandle::set_on_action`]; the handle itself
//! redraws the canvas when an action asks for it.

use js_sys::Function;
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::camera::Point;
use crate::config::EditorConfig;
use crate::engine::{Action, Engine};
use crate::input::{Button, WheelDelta};
use crate::template::EntityTemplate;

/// Editor instance bound to one canvas element.
#[wasm_bindgen]
pub struct EditorHandle {
    engine: Engine,
    on_action: Option<Function>,
}

#[wasm_bindgen]
impl EditorHandle {
    /// Bind to `canvas`. `config_json` may be empty for the defaults.
    ///
    /// # Errors
    ///
    /// Fails on an invalid config or a canvas without a 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: &str) -> Result<EditorHandle, JsValue> {
        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Ok(Self { engine: Engine::new(canvas, config)?, on_action: None })
    }

    /// Register the callback receiving each action as a JSON string.
    #[wasm_bindgen(js_name = setOnAction)]
    pub fn set_on_action(&mut self, callback: Function) {
        self.on_action = Some(callback);
    }

    // --- Tabs ---

    /// Store the editor widget's current text for `tab`.
    #[wasm_bindgen(js_name = setTabText)]
    pub fn set_tab_text(&mut self, tab: &str, text: String) {
        self.engine.core.set_document(tab, text);
    }

    #[must_use]
    #[wasm_bindgen(js_name = tabText)]
    pub fn tab_text(&self, tab: &str) -> Option<String> {
        self.engine.core.document(tab).map(str::to_owned)
    }

    /// Open tab ids, board first, in creation order.
    #[must_use]
    #[wasm_bindgen(js_name = tabIds)]
    pub fn tab_ids(&self) -> Vec<String> {
        self.engine.core.tab_ids().to_vec()
    }

    #[wasm_bindgen(js_name = addZoneTab)]
    pub fn add_zone_tab(&mut self, zone_id: &str, initial_text: Option<String>) {
        let actions = self.engine.core.add_zone_tab(zone_id, initial_text);
        self.dispatch(actions);
    }

    #[wasm_bindgen(js_name = removeZoneTab)]
    pub fn remove_zone_tab(&mut self, zone_id: &str) {
        let actions = self.engine.core.remove_zone_tab(zone_id);
        self.dispatch(actions);
    }

    #[wasm_bindgen(js_name = switchTab)]
    pub fn switch_tab(&mut self, tab: &str) {
        let actions = self.engine.core.switch_tab(tab);
        self.dispatch(actions);
    }

    // --- Rendering ---

    /// The "Render" button: reset the view and redraw from the current text.
    #[wasm_bindgen(js_name = requestRender)]
    pub fn request_render(&mut self) {
        let actions = self.engine.core.request_render();
        self.dispatch(actions);
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.engine.set_viewport(width_css, height_css, dpr);
        self.engine.render();
    }

    // --- Input ---

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16) {
        let Some(button) = Button::from_dom(button) else {
            return;
        };
        let actions = self.engine.core.on_pointer_down(Point::new(x, y), button);
        self.dispatch(actions);
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let actions = self.engine.core.on_pointer_move(Point::new(x, y));
        self.dispatch(actions);
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64, button: i16) {
        let Some(button) = Button::from_dom(button) else {
            return;
        };
        let actions = self.engine.core.on_pointer_up(Point::new(x, y), button);
        self.dispatch(actions);
    }

    pub fn wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64) {
        let actions = self.engine.core.on_wheel(Point::new(x, y), WheelDelta { dx, dy });
        self.dispatch(actions);
    }

    pub fn click(&mut self, x: f64, y: f64) {
        let actions = self.engine.core.on_click(Point::new(x, y));
        self.dispatch(actions);
    }

    // --- Add-entity panel ---

    /// Select the panel's entity type. Unknown combinations are ignored.
    #[wasm_bindgen(js_name = setTemplate)]
    pub fn set_template(&mut self, entity_type: &str, subtype: &str, faction: &str) {
        let Some(template) = EntityTemplate::from_choice(entity_type, subtype, faction) else {
            warn!(%entity_type, %subtype, %faction, "unknown template choice");
            return;
        };
        let actions = self.engine.core.set_template(template);
        self.dispatch(actions);
    }

    /// Append the (possibly hand-edited) template text to `tab`, or to the
    /// active tab when `tab` is omitted.
    #[wasm_bindgen(js_name = appendEntity)]
    pub fn append_entity(&mut self, entity_json: &str, tab: Option<String>) {
        let actions = self.engine.core.append_entity(entity_json, tab.as_deref());
        self.dispatch(actions);
    }

    #[must_use]
    #[wasm_bindgen(js_name = activeTab)]
    pub fn active_tab(&self) -> String {
        self.engine.core.active_tab().to_owned()
    }
}

impl EditorHandle {
    /// Redraw when asked and forward every action to the host.
    fn dispatch(&self, actions: Vec<Action>) {
        if actions.iter().any(|a| matches!(a, Action::RenderNeeded)) {
            self.engine.render();
        }
        let Some(callback) = &self.on_action else {
            return;
        };
        for action in actions {
            let json = match serde_json::to_string(&action) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "action not serialized");
                    continue;
                }
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                warn!(error = ?e, "action callback failed");
            }
        }
    }
}
