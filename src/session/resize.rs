//! Resize session: grows or shrinks a card from its fixed top-left corner.

use super::{Commit, LayoutPatch};
use crate::grid::{GridConfig, GridItem, geometry};

#[derive(Debug)]
pub struct ResizeSession {
    item_id: String,
    /// Fixed anchor: the card's top-left never moves during a resize.
    column: u32,
    row: u32,
    /// Span at pointer-down; the commit baseline.
    origin_width: u32,
    origin_height: u32,
    pointer_origin: (f64, f64),
    proposed_width: u32,
    proposed_height: u32,
}

impl ResizeSession {
    pub fn begin(item: &GridItem, pointer_x: f64, pointer_y: f64) -> Self {
        Self {
            item_id: item.id.clone(),
            column: item.column,
            row: item.row,
            origin_width: item.width,
            origin_height: item.height,
            pointer_origin: (pointer_x, pointer_y),
            proposed_width: item.width,
            proposed_height: item.height,
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Current proposed span, as a full item for preview rendering.
    pub fn proposed(&self) -> GridItem {
        GridItem {
            id: self.item_id.clone(),
            column: self.column,
            row: self.row,
            width: self.proposed_width,
            height: self.proposed_height,
        }
    }

    /// Recompute the proposed span for the current pointer position.
    ///
    /// Width is clamped so the right edge cannot cross the grid boundary
    /// given the fixed column; height only floors at one cell. Unlike drag,
    /// the live preview is not collision-checked against siblings, so a
    /// growing card may overlap neighbors until release.
    pub fn pointer_move(&mut self, x: f64, y: f64, cell: f64, cfg: &GridConfig) {
        let dx = geometry::cell_delta(x - self.pointer_origin.0, cell, cfg);
        let dy = geometry::cell_delta(y - self.pointer_origin.1, cell, cfg);

        let max_width = (cfg.columns - self.column + 1) as i64;
        self.proposed_width = (self.origin_width as i64 + dx).clamp(1, max_width) as u32;
        self.proposed_height = (self.origin_height as i64 + dy).max(1) as u32;
    }

    /// One commit on release, or nothing if the span never changed.
    pub fn finish(self) -> Option<Commit> {
        if self.proposed_width == self.origin_width && self.proposed_height == self.origin_height {
            return None;
        }
        Some(Commit {
            item_id: self.item_id,
            patch: LayoutPatch::size(self.proposed_width, self.proposed_height),
        })
    }
}
