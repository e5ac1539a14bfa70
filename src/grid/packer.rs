//! First-fit auto-placement.
//!
//! Turns the host's widget list (some cards with persisted positions, some
//! new) into a fully placed arrangement. Input order is placement priority
//! and the scan order is top-to-bottom, left-to-right, so packing the same
//! input twice yields identical output.

use super::collision::{self, Occupancy};
use super::{DEFAULT_SPAN, GridConfig, GridItem, ItemSpec};

/// Rows to scan before giving up. Boards hold low tens of cards, so
/// exhausting this bound means a defective record, not a full grid.
const MAX_SCAN_ROWS: u32 = 1000;

/// Result of one packing pass.
#[derive(Debug, Clone)]
pub struct PackOutcome {
    pub items: Vec<GridItem>,
    /// Ids that exhausted the scan and were parked at (1, 1).
    pub fallback_ids: Vec<String>,
}

/// Place every spec, preserving input order.
///
/// An explicit in-bounds position is trusted verbatim, without checking it
/// against cards placed earlier in the pass: two stale records that overlap
/// each other are a pre-existing data problem, not the packer's to resolve.
/// An out-of-bounds position is treated as absent and the card is scanned
/// into the first free slot instead.
pub fn pack(specs: &[ItemSpec], cfg: &GridConfig) -> PackOutcome {
    let mut occupied = Occupancy::new();
    let mut items = Vec::with_capacity(specs.len());
    let mut fallback_ids = Vec::new();

    for spec in specs {
        let width = spec.width.unwrap_or(DEFAULT_SPAN).clamp(1, cfg.columns);
        let height = spec.height.unwrap_or(DEFAULT_SPAN).max(1);

        let explicit = match (spec.column, spec.row) {
            (Some(column), Some(row)) => {
                let probe = GridItem {
                    id: spec.id.clone(),
                    column,
                    row,
                    width,
                    height,
                };
                collision::in_bounds(&probe, cfg).then_some((column, row))
            }
            _ => None,
        };

        let (column, row) = match explicit {
            Some(cell) => cell,
            None => match first_fit(&occupied, width, height, cfg) {
                Some(cell) => cell,
                None => {
                    fallback_ids.push(spec.id.clone());
                    (1, 1)
                }
            },
        };

        // Occupancy gates only the scan path, but both paths seed it so
        // later auto-placed cards avoid everything resolved so far.
        occupied.mark(column, row, width, height);
        items.push(GridItem {
            id: spec.id.clone(),
            column,
            row,
            width,
            height,
        });
    }

    PackOutcome { items, fallback_ids }
}

/// First free footprint in row-major scan order.
///
/// The last starting column is `columns - width`: auto-placement leaves the
/// final slot of a row free and wraps instead, except for full-width cards
/// which have nowhere else to go. Dragging can still reach that slot.
fn first_fit(occupied: &Occupancy, width: u32, height: u32, cfg: &GridConfig) -> Option<(u32, u32)> {
    let last_column = (cfg.columns - width).max(1);
    for row in 1..=MAX_SCAN_ROWS {
        for column in 1..=last_column {
            if occupied.is_free(column, row, width, height) {
                return Some((column, row));
            }
        }
    }
    None
}
