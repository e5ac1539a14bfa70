//! Output types for React frontend consumption.
//!
//! These structs are serialized to JSON at the wasm boundary and handed to
//! the host for rendering and persistence.

use serde::Serialize;

use crate::grid::geometry::PixelRect;
use crate::session::LayoutPatch;

/// A placed card ready for the host to render.
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutput {
    pub id: String,
    pub column: u32,
    pub row: u32,
    pub width: u32,
    pub height: u32,
    /// Pixel rectangle for the measured container width.
    pub bounds: PixelRect,
}

/// The combined layout sent to the host after packing.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemOutput>,
    /// Pixel height of the whole grid (bottom edge of the lowest card).
    pub height: f64,
    /// Ids the packer parked at (1, 1) after exhausting its scan; a
    /// non-empty list means a defective layout record.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallback_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Live geometry of the card under manipulation, one per pointer move.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewOutput {
    pub id: String,
    pub column: u32,
    pub row: u32,
    pub width: u32,
    pub height: u32,
    pub bounds: PixelRect,
}

/// The single mutation persisted at the end of a session.
#[derive(Debug, Clone, Serialize)]
pub struct CommitOutput {
    pub id: String,
    /// Only the fields the session changed; the host merges these into the
    /// card's record without touching the rest.
    pub patch: LayoutPatch,
}

/// Error information surfaced to the host alongside a safe empty layout.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}
