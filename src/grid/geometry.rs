//! Pixel-space conversions for the fixed-column grid.
//!
//! The interaction sessions invert these mappings (pixel delta -> cell
//! delta), so every piece of pixel math in the crate goes through this
//! module and shares the same constants.

use serde::Serialize;

use super::{GridConfig, GridItem};

/// A pixel-space rectangle ready for the host to render.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Pixels per cell for a measured container width.
///
/// Returns `0.0` while the container is too narrow to even hold the gaps,
/// which callers treat as "not yet measurable" and defer layout.
pub fn cell_size(container_width: f64, cfg: &GridConfig) -> f64 {
    if cfg.columns == 0 {
        return 0.0;
    }
    let gaps = cfg.gap * (cfg.columns - 1) as f64;
    if container_width < gaps {
        return 0.0;
    }
    (container_width - gaps) / cfg.columns as f64
}

/// Top-left pixel offset of a cell coordinate.
pub fn cell_origin(column: u32, row: u32, cell: f64, cfg: &GridConfig) -> (f64, f64) {
    let step = cell + cfg.gap;
    (
        column.saturating_sub(1) as f64 * step,
        row.saturating_sub(1) as f64 * step,
    )
}

/// Pixel extent of a span: the spanned cells plus the gaps between them,
/// but no outer gap.
pub fn span_extent(width: u32, height: u32, cell: f64, cfg: &GridConfig) -> (f64, f64) {
    (
        width as f64 * cell + width.saturating_sub(1) as f64 * cfg.gap,
        height as f64 * cell + height.saturating_sub(1) as f64 * cfg.gap,
    )
}

/// Full pixel rectangle of a placed card.
pub fn item_rect(item: &GridItem, cell: f64, cfg: &GridConfig) -> PixelRect {
    let (x, y) = cell_origin(item.column, item.row, cell, cfg);
    let (w, h) = span_extent(item.width, item.height, cell, cfg);
    PixelRect { x, y, w, h }
}

/// Pixel height of the whole grid: the bottom edge of the lowest card.
/// `0.0` for an empty board or an unmeasured container.
pub fn grid_height(items: &[GridItem], cell: f64, cfg: &GridConfig) -> f64 {
    if cell <= 0.0 {
        return 0.0;
    }
    match items.iter().map(|i| i.row + i.height - 1).max() {
        Some(max_row) => max_row as f64 * cell + (max_row - 1) as f64 * cfg.gap,
        None => 0.0,
    }
}

/// Snap a pixel delta to whole cells, rounding to the nearest cell step.
pub fn cell_delta(pixel_delta: f64, cell: f64, cfg: &GridConfig) -> i64 {
    let step = cell + cfg.gap;
    if step <= 0.0 {
        return 0;
    }
    (pixel_delta / step).round() as i64
}
