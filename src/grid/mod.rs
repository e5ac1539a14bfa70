// Grid model and auto-layout entry point.
//
// The dashboard is a fixed-width grid: six columns, unbounded rows, a
// constant pixel gap between cells. Widgets ("cards") occupy rectangular
// footprints of whole cells. Coordinates are 1-based.
//
// Submodules:
// - geometry: pixel <-> cell conversions
// - collision: bounds and overlap predicates, occupancy set
// - packer: first-fit placement for cards without a position

use serde::{Deserialize, Serialize};

pub mod collision;
pub mod geometry;
pub mod packer;

/// Column count of the dashboard grid. The grid never grows horizontally.
pub const GRID_COLUMNS: u32 = 6;

/// Pixel gap between adjacent cells, both axes.
pub const GRID_GAP: f64 = 16.0;

/// Span (in cells) given to cards that arrive without a width or height.
pub const DEFAULT_SPAN: u32 = 2;

/// Grid-wide constants. Built once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub columns: u32,
    pub gap: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            gap: GRID_GAP,
        }
    }
}

/// A card with a fully resolved placement.
///
/// `column`/`row` are 1-based; `column + width - 1 <= columns` always holds
/// for items produced by the packer, and the placed set is pairwise
/// non-overlapping unless two persisted records already disagreed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridItem {
    pub id: String,
    pub column: u32,
    pub row: u32,
    pub width: u32,
    pub height: u32,
}

/// A card as delivered by the host: any geometry field may be missing
/// (freshly added widgets) or stale (old persisted records).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemSpec {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ItemSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Spec carrying a placed item's full geometry as explicit fields.
    pub fn from_item(item: &GridItem) -> Self {
        Self {
            id: item.id.clone(),
            column: Some(item.column),
            row: Some(item.row),
            width: Some(item.width),
            height: Some(item.height),
        }
    }
}

/// Resolve the whole widget list into a placed, collision-free arrangement.
/// Called whenever the widget set changes.
pub fn layout(specs: &[ItemSpec], cfg: &GridConfig) -> packer::PackOutcome {
    packer::pack(specs, cfg)
}
