// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for the sketch session
//!
//! Pointer positions are passed in canvas pixels and converted to grid
//! cells here. Edits answer with `{ success, reason?, ... }` objects so the
//! page can show a message without try/catch.

use floorsketch_core::{
    Frame, OpeningKind, OpeningRequest, PlanConfig, Point, Renderer, Segment, Session,
};
use floorsketch_export::ExportPayload;
use wasm_bindgen::prelude::*;

use crate::utils::{reply, to_js};

/// Hands each frame to a JS callback
struct CallbackRenderer<'a> {
    callback: &'a js_sys::Function,
    error: Option<JsValue>,
}

impl Renderer for CallbackRenderer<'_> {
    fn render(&mut self, frame: &Frame<'_>) {
        let result = to_js(frame)
            .map_err(JsValue::from)
            .and_then(|value| self.callback.call1(&JsValue::NULL, &value));
        if let Err(err) = result {
            self.error = Some(err);
        }
    }
}

/// Floor-plan sketching session
#[wasm_bindgen]
pub struct SketchAPI {
    session: Session,
}

impl Default for SketchAPI {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SketchAPI {
    /// Create a new session with default configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: Session::new(),
        }
    }

    /// Set configuration from JSON; missing keys take defaults
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config_json: &str) -> Result<(), JsError> {
        let config = PlanConfig::from_json(config_json)
            .map_err(|e| JsError::new(&format!("Invalid config JSON: {}", e)))?;
        self.session
            .set_config(config)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Get current configuration as JSON
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> String {
        serde_json::to_string(self.session.config()).unwrap_or_else(|_| "{}".to_string())
    }

    fn cell(&self, px: f64, py: f64) -> Point {
        self.session.config().cell_from_pixels(px, py)
    }

    // Drawing

    #[wasm_bindgen(js_name = beginDraw)]
    pub fn begin_draw(&mut self, px: f64, py: f64) {
        let cell = self.cell(px, py);
        self.session.begin_draw(cell);
    }

    /// Update the preview; returns the previewed wall or `null`
    #[wasm_bindgen(js_name = updateDraw)]
    pub fn update_draw(&mut self, px: f64, py: f64) -> Result<JsValue, JsError> {
        let cell = self.cell(px, py);
        to_js(&self.session.update_draw(cell))
    }

    #[wasm_bindgen(js_name = finishDraw)]
    pub fn finish_draw(&mut self) -> Result<JsValue, JsError> {
        reply(self.session.finish_draw())
    }

    #[wasm_bindgen(js_name = cancelDraw)]
    pub fn cancel_draw(&mut self) -> bool {
        self.session.cancel_draw()
    }

    /// Add a wall given in grid cells
    #[wasm_bindgen(js_name = addWall)]
    pub fn add_wall(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<JsValue, JsError> {
        reply(self.session.draw_wall(Segment::new(x1, y1, x2, y2)))
    }

    // Selection

    /// Select the topmost wall near a pixel position; returns its index
    #[wasm_bindgen(js_name = selectAt)]
    pub fn select_at(&mut self, px: f64, py: f64) -> Option<u32> {
        self.session.select_at(px, py).map(|i| i as u32)
    }

    #[wasm_bindgen(js_name = selectWall)]
    pub fn select_wall(&mut self, index: usize) -> Result<JsValue, JsError> {
        reply(self.session.select_wall(index))
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    #[wasm_bindgen(getter, js_name = selectedIndex)]
    pub fn selected_index(&self) -> Option<u32> {
        self.session.selected().map(|i| i as u32)
    }

    // Edits

    #[wasm_bindgen(js_name = eraseSelected)]
    pub fn erase_selected(&mut self) -> Result<JsValue, JsError> {
        reply(self.session.erase_selected())
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) -> bool {
        self.session.clear_all()
    }

    #[wasm_bindgen(js_name = offsetSelected)]
    pub fn offset_selected(&mut self, distance: f64) -> Result<JsValue, JsError> {
        reply(self.session.offset_selected(distance))
    }

    /// Add a door or window. Width and height fall back to the presets.
    #[wasm_bindgen(js_name = addOpening)]
    pub fn add_opening(
        &mut self,
        index: usize,
        kind: &str,
        position: f64,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Result<JsValue, JsError> {
        let result = kind.parse::<OpeningKind>().and_then(|kind| {
            let request = OpeningRequest {
                kind,
                position,
                width,
                height,
            };
            self.session.add_opening(index, &request)
        });
        reply(result)
    }

    #[wasm_bindgen(js_name = placeOpeningAt)]
    pub fn place_opening_at(&mut self, kind: &str, px: f64, py: f64) -> Result<JsValue, JsError> {
        let result = kind
            .parse::<OpeningKind>()
            .and_then(|kind| self.session.place_opening_at(kind, px, py));
        reply(result)
    }

    #[wasm_bindgen(js_name = clearOpenings)]
    pub fn clear_openings(&mut self, index: usize) -> Result<JsValue, JsError> {
        reply(self.session.clear_openings(index))
    }

    /// Trim around an axis coordinate given in cells
    #[wasm_bindgen(js_name = trimWall)]
    pub fn trim_wall(&mut self, index: usize, target: f64) -> Result<JsValue, JsError> {
        reply(self.session.trim_wall(index, target))
    }

    #[wasm_bindgen(js_name = trimAt)]
    pub fn trim_at(&mut self, px: f64, py: f64) -> Result<JsValue, JsError> {
        reply(self.session.trim_at(px, py))
    }

    #[wasm_bindgen(js_name = trimExtensions)]
    pub fn trim_extensions(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.session.trim_extensions())
    }

    // Dragging

    #[wasm_bindgen(js_name = beginMove)]
    pub fn begin_move(&mut self, index: usize) -> Result<JsValue, JsError> {
        reply(self.session.begin_move(index))
    }

    /// Drag by a pixel offset from where the drag started; the applied
    /// `[dx, dy]` in cells lands under `value`
    #[wasm_bindgen(js_name = updateMove)]
    pub fn update_move(&mut self, dx_px: f64, dy_px: f64) -> Result<JsValue, JsError> {
        let grid = self.session.config().grid_size;
        reply(self.session.update_move(dx_px / grid, dy_px / grid))
    }

    #[wasm_bindgen(js_name = commitMove)]
    pub fn commit_move(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.session.commit_move())
    }

    #[wasm_bindgen(js_name = cancelMove)]
    pub fn cancel_move(&mut self) -> bool {
        self.session.cancel_move()
    }

    // History

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    #[wasm_bindgen(getter, js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    // Suggestions

    #[wasm_bindgen(js_name = getSuggestions)]
    pub fn get_suggestions(&mut self) -> Result<JsValue, JsError> {
        to_js(self.session.suggestions())
    }

    #[wasm_bindgen(js_name = applyAllSuggestions)]
    pub fn apply_all_suggestions(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.session.apply_all_suggestions())
    }

    #[wasm_bindgen(js_name = applySuggestion)]
    pub fn apply_suggestion(&mut self, index: usize) -> Result<JsValue, JsError> {
        reply(self.session.apply_suggestion(index))
    }

    #[wasm_bindgen(js_name = applySuggestionWall)]
    pub fn apply_suggestion_wall(&mut self, index: usize, wall: usize) -> Result<JsValue, JsError> {
        reply(self.session.apply_suggestion_wall(index, wall))
    }

    // Derived state

    #[wasm_bindgen(js_name = getWalls)]
    pub fn get_walls(&self) -> Result<String, JsError> {
        serde_json::to_string(self.session.walls())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(js_name = getMetrics)]
    pub fn get_metrics(&mut self) -> Result<JsValue, JsError> {
        to_js(self.session.metrics())
    }

    #[wasm_bindgen(js_name = getConnectivity)]
    pub fn get_connectivity(&mut self) -> Result<JsValue, JsError> {
        to_js(self.session.connectivity())
    }

    /// Everything needed to redraw the canvas
    #[wasm_bindgen(js_name = getFrame)]
    pub fn get_frame(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.session.frame())
    }

    /// Call `callback(frame)` with the current frame
    pub fn render(&mut self, callback: &js_sys::Function) -> Result<(), JsValue> {
        let mut renderer = CallbackRenderer {
            callback,
            error: None,
        };
        self.session.render(&mut renderer);
        renderer.error.map_or(Ok(()), Err)
    }

    /// Export body for `sendMetrics`, stamped with the current time
    #[wasm_bindgen(js_name = exportPayload)]
    pub fn export_payload(&mut self) -> Result<String, JsError> {
        let timestamp: String = js_sys::Date::new_0().to_iso_string().into();
        let payload = ExportPayload::from_metrics(self.session.metrics(), timestamp);
        serde_json::to_string(&payload)
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }
}
