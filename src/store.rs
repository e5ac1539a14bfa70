//! Bridge between committed layout mutations and the host's per-widget
//! key-value store.
//!
//! The engine applies commits to its in-memory items immediately; the
//! host's durable write is fire-and-forget and never rolled back here, so
//! a failed write leaves the board visually correct but unsaved. Records
//! are flat per-id objects with every field optional; a patch touches only
//! the fields its session changed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::{GridItem, ItemSpec};
use crate::session::LayoutPatch;

/// Persisted layout for one widget id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Merge persisted records into the incoming widget list. Runs once at
/// dashboard load, before packing; record fields win over whatever the
/// widget list carries, missing fields fall through.
pub fn hydrate(mut specs: Vec<ItemSpec>, records: &HashMap<String, LayoutRecord>) -> Vec<ItemSpec> {
    for spec in &mut specs {
        if let Some(record) = records.get(&spec.id) {
            spec.column = record.column.or(spec.column);
            spec.row = record.row.or(spec.row);
            spec.width = record.width.or(spec.width);
            spec.height = record.height.or(spec.height);
        }
    }
    specs
}

/// Apply one committed patch to the in-memory item set.
/// Returns false if the id is unknown (the stale commit is dropped).
pub fn apply_patch(items: &mut [GridItem], item_id: &str, patch: &LayoutPatch) -> bool {
    for item in items {
        if item.id == item_id {
            if let Some(column) = patch.column {
                item.column = column;
            }
            if let Some(row) = patch.row {
                item.row = row;
            }
            if let Some(width) = patch.width {
                item.width = width;
            }
            if let Some(height) = patch.height {
                item.height = height;
            }
            return true;
        }
    }
    false
}

/// Fold a committed patch into its persisted record, touching only the
/// fields the commit carries.
pub fn merge_patch(record: &mut LayoutRecord, patch: &LayoutPatch) {
    record.column = patch.column.or(record.column);
    record.row = patch.row.or(record.row);
    record.width = patch.width.or(record.width);
    record.height = patch.height.or(record.height);
}

/// Apply a batch of already-decided patches (an external compaction pass)
/// one item at a time. No re-layout runs between writes; the caller
/// renders once afterwards. Returns the number of items actually updated.
pub fn apply_batch(items: &mut [GridItem], patches: &[(String, LayoutPatch)]) -> usize {
    patches
        .iter()
        .filter(|(id, patch)| apply_patch(items, id, patch))
        .count()
}
