// Interaction sessions: one drag or one resize at a time.
//
// A session lives from pointer-down to pointer-up. Every pointer move
// recomputes the proposal from the session origin and the current pointer
// position, never by accumulating deltas, so repeated or coalesced events
// cannot drift. The only durable output of a session is the single commit
// emitted on release; aborting (teardown mid-gesture) emits nothing.

pub mod drag;
pub mod resize;

pub use drag::DragSession;
pub use resize::ResizeSession;

use serde::{Deserialize, Serialize};

use crate::grid::{GridConfig, GridItem};

/// Partial geometry update. Only the fields a session changed are present,
/// so the persisted record merges without clobbering unrelated fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl LayoutPatch {
    pub fn position(column: u32, row: u32) -> Self {
        Self {
            column: Some(column),
            row: Some(row),
            ..Self::default()
        }
    }

    pub fn size(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }
}

/// The durable outcome of one completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub item_id: String,
    pub patch: LayoutPatch,
}

/// The at-most-one active interaction on the board.
#[derive(Debug)]
pub enum Session {
    Drag(DragSession),
    Resize(ResizeSession),
}

impl Session {
    pub fn item_id(&self) -> &str {
        match self {
            Session::Drag(s) => s.item_id(),
            Session::Resize(s) => s.item_id(),
        }
    }

    /// Re-derive the proposal from the current pointer position. Drag
    /// validates against the other cards; resize only clamps bounds.
    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        cell: f64,
        cfg: &GridConfig,
        items: &[GridItem],
    ) {
        match self {
            Session::Drag(s) => s.pointer_move(x, y, cell, cfg, items),
            Session::Resize(s) => s.pointer_move(x, y, cell, cfg),
        }
    }

    /// Current proposed geometry of the card under manipulation.
    pub fn proposed(&self) -> GridItem {
        match self {
            Session::Drag(s) => s.proposed(),
            Session::Resize(s) => s.proposed(),
        }
    }

    /// One commit on release, or nothing for a no-op gesture.
    pub fn finish(self) -> Option<Commit> {
        match self {
            Session::Drag(s) => s.finish(),
            Session::Resize(s) => s.finish(),
        }
    }
}
