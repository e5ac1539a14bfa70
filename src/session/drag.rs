//! Drag session: moves a card by whole cells with live collision checks.

use super::{Commit, LayoutPatch};
use crate::grid::{GridConfig, GridItem, collision, geometry};

#[derive(Debug)]
pub struct DragSession {
    item_id: String,
    /// Placement at pointer-down; the commit baseline.
    origin_column: u32,
    origin_row: u32,
    /// The card's span, fixed for the whole gesture.
    width: u32,
    height: u32,
    pointer_origin: (f64, f64),
    /// Last accepted placement. Always in bounds and collision-free
    /// against the other cards at their committed positions.
    proposed_column: u32,
    proposed_row: u32,
}

impl DragSession {
    pub fn begin(item: &GridItem, pointer_x: f64, pointer_y: f64) -> Self {
        Self {
            item_id: item.id.clone(),
            origin_column: item.column,
            origin_row: item.row,
            width: item.width,
            height: item.height,
            pointer_origin: (pointer_x, pointer_y),
            proposed_column: item.column,
            proposed_row: item.row,
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Current accepted placement, as a full item for preview rendering.
    pub fn proposed(&self) -> GridItem {
        GridItem {
            id: self.item_id.clone(),
            column: self.proposed_column,
            row: self.proposed_row,
            width: self.width,
            height: self.height,
        }
    }

    /// Recompute the proposal for the current pointer position.
    ///
    /// The candidate cell is the origin shifted by the rounded pixel delta,
    /// clamped to the grid. A candidate that would overlap another card is
    /// discarded and the previous proposal stands, so the card sticks in
    /// place instead of jumping to an invalid cell.
    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        cell: f64,
        cfg: &GridConfig,
        items: &[GridItem],
    ) {
        let dx = geometry::cell_delta(x - self.pointer_origin.0, cell, cfg);
        let dy = geometry::cell_delta(y - self.pointer_origin.1, cell, cfg);

        let max_column = (cfg.columns - self.width + 1) as i64;
        let column = (self.origin_column as i64 + dx).clamp(1, max_column) as u32;
        let row = (self.origin_row as i64 + dy).max(1) as u32;

        let candidate = GridItem {
            id: self.item_id.clone(),
            column,
            row,
            width: self.width,
            height: self.height,
        };
        if collision::accept(&candidate, &self.item_id, items, cfg) {
            self.proposed_column = column;
            self.proposed_row = row;
        }
    }

    /// One commit on release, or nothing if the card never left its origin.
    pub fn finish(self) -> Option<Commit> {
        if self.proposed_column == self.origin_column && self.proposed_row == self.origin_row {
            return None;
        }
        Some(Commit {
            item_id: self.item_id,
            patch: LayoutPatch::position(self.proposed_column, self.proposed_row),
        })
    }
}
