//! WASM bindings for the dashgrid-core library.
//!
//! Everything exposed to JavaScript via wasm-bindgen is defined here. The
//! surface is JSON strings in and out; malformed input is logged to the
//! console and answered with an error payload, never a panic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::engine::GridEngine;
use crate::grid::{GridConfig, ItemSpec, geometry};
use crate::output::{CommitOutput, ErrorInfo, ItemOutput, LayoutOutput, PreviewOutput};
use crate::session::LayoutPatch;
use crate::store::{self, LayoutRecord};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

/// One entry of a batch commit (the library-backed grid's drag-stop
/// payload): a card id plus whichever geometry fields changed.
#[derive(Debug, Deserialize)]
struct BatchPatch {
    id: String,
    #[serde(flatten)]
    patch: LayoutPatch,
}

/// The dashboard grid engine exposed to the React host.
#[wasm_bindgen]
pub struct DashboardGrid {
    engine: GridEngine,
}

impl Default for DashboardGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl DashboardGrid {
    #[wasm_bindgen(constructor)]
    pub fn new() -> DashboardGrid {
        DashboardGrid {
            engine: GridEngine::new(GridConfig::default()),
        }
    }

    /// Record the measured container width in pixels. Pass 0 while the
    /// container has not been measured yet; layout stays deferred.
    pub fn set_container_width(&mut self, width: f64) {
        self.engine.set_container_width(width);
    }

    /// Load the widget list and persisted layout records, pack, and return
    /// the full layout as JSON. `records_json` may be empty for a board
    /// with nothing persisted yet.
    pub fn load_layout(&mut self, specs_json: &str, records_json: &str) -> String {
        let specs: Vec<ItemSpec> = match serde_json::from_str(specs_json) {
            Ok(specs) => specs,
            Err(e) => {
                console_error(&format!("Error parsing widget list: {}", e));
                return error_output(&format!("invalid widget list: {}", e));
            }
        };
        let records: HashMap<String, LayoutRecord> = if records_json.trim().is_empty() {
            HashMap::new()
        } else {
            match serde_json::from_str(records_json) {
                Ok(records) => records,
                Err(e) => {
                    console_error(&format!("Error parsing layout records: {}", e));
                    return error_output(&format!("invalid layout records: {}", e));
                }
            }
        };

        self.engine.load(specs, &records);
        for id in self.engine.fallback_ids() {
            console_error(&format!(
                "Card '{}' could not be auto-placed and was parked at (1, 1)",
                id
            ));
        }
        self.layout()
    }

    /// Current layout as JSON.
    pub fn layout(&self) -> String {
        to_json(&layout_output(&self.engine))
    }

    /// Pixel height of the grid for container sizing.
    pub fn grid_height(&self) -> f64 {
        self.engine.grid_height_px()
    }

    /// Start dragging a card from its drag affordance. Returns false while
    /// another session is active, for an unknown id, or before the
    /// container is measured.
    pub fn begin_drag(&mut self, item_id: &str, x: f64, y: f64) -> bool {
        self.engine.begin_drag(item_id, x, y)
    }

    /// Start resizing a card from its resize affordance. Same refusal
    /// rules as begin_drag.
    pub fn begin_resize(&mut self, item_id: &str, x: f64, y: f64) -> bool {
        self.engine.begin_resize(item_id, x, y)
    }

    /// Feed a pointer move into the active session. Returns the proposed
    /// geometry as JSON for the live preview, or "null" when no session is
    /// in progress (stray moves are no-ops).
    pub fn pointer_move(&mut self, x: f64, y: f64) -> String {
        match self.engine.pointer_move(x, y) {
            Some(proposed) => {
                let bounds =
                    geometry::item_rect(&proposed, self.engine.cell_size(), self.engine.config());
                to_json(&PreviewOutput {
                    id: proposed.id,
                    column: proposed.column,
                    row: proposed.row,
                    width: proposed.width,
                    height: proposed.height,
                    bounds,
                })
            }
            None => "null".to_string(),
        }
    }

    /// End the active session. Returns the commit to persist as JSON, or
    /// "null" for a no-op gesture (the host must not write anything then).
    pub fn end_session(&mut self) -> String {
        match self.engine.end_session() {
            Some(commit) => to_json(&CommitOutput {
                id: commit.item_id,
                patch: commit.patch,
            }),
            None => "null".to_string(),
        }
    }

    /// Tear down the active session without a commit (navigation away
    /// mid-gesture). Safe to call with no session in progress.
    pub fn abort_session(&mut self) {
        self.engine.abort_session();
    }

    /// Remove a card and return the new layout. The host must also delete
    /// the card's persisted record so a stale position cannot come back.
    pub fn remove_item(&mut self, item_id: &str) -> String {
        if !self.engine.remove_item(item_id) {
            console_error(&format!("Card '{}' not found", item_id));
        }
        self.layout()
    }

    /// Apply a batch of already-decided patches without re-packing and
    /// return the new layout. Input: `[{"id": "...", "column": 2, ...}]`.
    pub fn apply_batch(&mut self, patches_json: &str) -> String {
        let patches: Vec<BatchPatch> = match serde_json::from_str(patches_json) {
            Ok(patches) => patches,
            Err(e) => {
                console_error(&format!("Error parsing batch patches: {}", e));
                return error_output(&format!("invalid batch patches: {}", e));
            }
        };
        let patches: Vec<(String, LayoutPatch)> =
            patches.into_iter().map(|p| (p.id, p.patch)).collect();
        self.engine.apply_batch(&patches);
        self.layout()
    }

    /// Forget one card's position (unlock it for auto-placement) and
    /// return the re-packed layout.
    pub fn reset_item(&mut self, item_id: &str) -> String {
        if !self.engine.reset_item(item_id) {
            console_error(&format!("Card '{}' not found", item_id));
        }
        self.layout()
    }

    /// Forget every position and re-pack the whole board first-fit.
    pub fn reset_all(&mut self) -> String {
        self.engine.reset_all();
        self.layout()
    }
}

/// Fold a commit's patch into a card's persisted record and return the
/// merged record, ready to write back to the store. Only the fields the
/// patch carries change; pass an empty string for a card with no record
/// yet. The host calls this before each key-value write so unrelated
/// persisted fields survive.
#[wasm_bindgen]
pub fn merge_record(record_json: &str, patch_json: &str) -> String {
    let mut record: LayoutRecord = if record_json.trim().is_empty() {
        LayoutRecord::default()
    } else {
        match serde_json::from_str(record_json) {
            Ok(record) => record,
            Err(e) => {
                console_error(&format!("Error parsing layout record: {}", e));
                LayoutRecord::default()
            }
        }
    };
    let patch: LayoutPatch = match serde_json::from_str(patch_json) {
        Ok(patch) => patch,
        Err(e) => {
            console_error(&format!("Error parsing layout patch: {}", e));
            LayoutPatch::default()
        }
    };
    store::merge_patch(&mut record, &patch);
    to_json(&record)
}

fn layout_output(engine: &GridEngine) -> LayoutOutput {
    let cell = engine.cell_size();
    let cfg = engine.config();
    let items = engine
        .items()
        .iter()
        .map(|item| ItemOutput {
            id: item.id.clone(),
            column: item.column,
            row: item.row,
            width: item.width,
            height: item.height,
            bounds: geometry::item_rect(item, cell, cfg),
        })
        .collect();
    LayoutOutput {
        items,
        height: engine.grid_height_px(),
        fallback_ids: engine.fallback_ids().to_vec(),
        error: None,
    }
}

fn error_output(message: &str) -> String {
    to_json(&LayoutOutput {
        items: Vec::new(),
        height: 0.0,
        fallback_ids: Vec::new(),
        error: Some(ErrorInfo {
            message: message.to_string(),
        }),
    })
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| r#"{"error":{"message":"serialization failure"}}"#.to_string())
}
