//! Stateful façade over packing, geometry and sessions.
//!
//! `GridEngine` owns the placed items, the measured container width and the
//! at-most-one active interaction session. The host drives it from its
//! pointer and resize callbacks; everything here is single-threaded and
//! event-ordered.

use std::collections::HashMap;

use crate::grid::geometry::{self, PixelRect};
use crate::grid::{self, GridConfig, GridItem, ItemSpec};
use crate::session::{Commit, DragSession, LayoutPatch, ResizeSession, Session};
use crate::store::{self, LayoutRecord};

#[derive(Debug, Default)]
pub struct GridEngine {
    cfg: GridConfig,
    container_width: f64,
    items: Vec<GridItem>,
    /// Holding the session here is what makes "one interaction at a time"
    /// structural: begin_* refuses while this is occupied.
    session: Option<Session>,
    /// Ids the last pack parked at (1, 1) after exhausting its scan.
    fallback_ids: Vec<String>,
}

impl GridEngine {
    pub fn new(cfg: GridConfig) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.cfg
    }

    /// Record the measured container width. Zero (or anything narrower
    /// than the gaps) means "not yet measurable" and defers interaction.
    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    pub fn cell_size(&self) -> f64 {
        geometry::cell_size(self.container_width, &self.cfg)
    }

    /// Replace the widget set: merge persisted records into the incoming
    /// list and pack. Any in-flight session is torn down without a commit.
    pub fn load(&mut self, specs: Vec<ItemSpec>, records: &HashMap<String, LayoutRecord>) {
        let specs = store::hydrate(specs, records);
        self.repack(&specs);
    }

    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    pub fn fallback_ids(&self) -> &[String] {
        &self.fallback_ids
    }

    pub fn item_rect(&self, item_id: &str) -> Option<PixelRect> {
        let item = self.items.iter().find(|i| i.id == item_id)?;
        Some(geometry::item_rect(item, self.cell_size(), &self.cfg))
    }

    pub fn grid_height_px(&self) -> f64 {
        geometry::grid_height(&self.items, self.cell_size(), &self.cfg)
    }

    pub fn session_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start dragging a card. Refused while another session is active, for
    /// an unknown id, or while the container is unmeasured (pixel deltas
    /// cannot be converted without a cell size).
    pub fn begin_drag(&mut self, item_id: &str, pointer_x: f64, pointer_y: f64) -> bool {
        if self.session.is_some() || self.cell_size() <= 0.0 {
            return false;
        }
        let Some(item) = self.items.iter().find(|i| i.id == item_id) else {
            return false;
        };
        self.session = Some(Session::Drag(DragSession::begin(item, pointer_x, pointer_y)));
        true
    }

    /// Start resizing a card. Same refusal rules as begin_drag.
    pub fn begin_resize(&mut self, item_id: &str, pointer_x: f64, pointer_y: f64) -> bool {
        if self.session.is_some() || self.cell_size() <= 0.0 {
            return false;
        }
        let Some(item) = self.items.iter().find(|i| i.id == item_id) else {
            return false;
        };
        self.session = Some(Session::Resize(ResizeSession::begin(
            item, pointer_x, pointer_y,
        )));
        true
    }

    /// Feed a pointer move into the active session and return the current
    /// proposed geometry. A move with no session in progress is a no-op.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<GridItem> {
        let cell = self.cell_size();
        let session = self.session.as_mut()?;
        session.pointer_move(x, y, cell, &self.cfg, &self.items);
        Some(session.proposed())
    }

    /// End the active session: apply the commit to the in-memory items and
    /// hand it back for the host to persist. `None` for a no-op gesture or
    /// when no session was in progress.
    pub fn end_session(&mut self) -> Option<Commit> {
        let session = self.session.take()?;
        let commit = session.finish()?;
        store::apply_patch(&mut self.items, &commit.item_id, &commit.patch);
        Some(commit)
    }

    /// Tear down the active session without a commit. The items were never
    /// mutated mid-gesture, so there is nothing to revert.
    pub fn abort_session(&mut self) {
        self.session = None;
    }

    /// Remove a card. The caller must also discard the persisted record
    /// for this id, otherwise a stale position can resurrect a conflict.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.item_id() == item_id)
        {
            self.session = None;
        }
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        self.fallback_ids.retain(|id| id != item_id);
        self.items.len() != before
    }

    /// Forget one card's position and re-pack it into the first free slot;
    /// every other card keeps its placement.
    pub fn reset_item(&mut self, item_id: &str) -> bool {
        let Some(index) = self.items.iter().position(|i| i.id == item_id) else {
            return false;
        };
        // Kept placements go first so the freed card scans around all of
        // them; the pack order the host sees is restored afterwards.
        let mut specs: Vec<ItemSpec> = self
            .items
            .iter()
            .filter(|item| item.id != item_id)
            .map(ItemSpec::from_item)
            .collect();
        let mut freed = ItemSpec::from_item(&self.items[index]);
        freed.column = None;
        freed.row = None;
        specs.push(freed);
        self.repack(&specs);
        if let Some(placed) = self.items.pop() {
            self.items.insert(index, placed);
        }
        true
    }

    /// Forget every position and re-pack the whole board first-fit.
    /// Spans are kept; only placements are recomputed.
    pub fn reset_all(&mut self) {
        let specs: Vec<ItemSpec> = self
            .items
            .iter()
            .map(|item| {
                let mut spec = ItemSpec::from_item(item);
                spec.column = None;
                spec.row = None;
                spec
            })
            .collect();
        self.repack(&specs);
    }

    /// Apply a batch of external patches without re-packing.
    pub fn apply_batch(&mut self, patches: &[(String, LayoutPatch)]) -> usize {
        store::apply_batch(&mut self.items, patches)
    }

    fn repack(&mut self, specs: &[ItemSpec]) {
        let outcome = grid::layout(specs, &self.cfg);
        self.items = outcome.items;
        self.fallback_ids = outcome.fallback_ids;
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::collision;

    const STEP: f64 = 166.0; // cell 150 + gap 16 at a 980px container

    fn engine_with(specs: Vec<ItemSpec>) -> GridEngine {
        let mut engine = GridEngine::new(GridConfig::default());
        engine.set_container_width(980.0);
        engine.load(specs, &HashMap::new());
        engine
    }

    fn three_cards() -> Vec<ItemSpec> {
        vec![ItemSpec::new("a"), ItemSpec::new("b"), ItemSpec::new("c")]
    }

    #[test]
    fn test_load_packs_and_measures() {
        let engine = engine_with(three_cards());
        assert_eq!(engine.items().len(), 3);
        assert_eq!(engine.cell_size(), 150.0);
        // a (1,1) and b (3,1) 2x2, c wraps to (1,3): four rows tall.
        assert_eq!(engine.grid_height_px(), 4.0 * 150.0 + 3.0 * 16.0);
    }

    #[test]
    fn test_load_hydrates_records() {
        let mut records = HashMap::new();
        records.insert(
            "b".to_string(),
            LayoutRecord {
                column: Some(5),
                row: Some(1),
                width: None,
                height: None,
            },
        );
        let mut engine = GridEngine::new(GridConfig::default());
        engine.set_container_width(980.0);
        engine.load(three_cards(), &records);
        let b = engine.items().iter().find(|i| i.id == "b").unwrap();
        assert_eq!((b.column, b.row), (5, 1));
    }

    #[test]
    fn test_stale_record_is_repacked() {
        let mut records = HashMap::new();
        records.insert(
            "a".to_string(),
            LayoutRecord {
                column: Some(9),
                row: Some(1),
                width: None,
                height: None,
            },
        );
        let mut engine = GridEngine::new(GridConfig::default());
        engine.set_container_width(980.0);
        engine.load(vec![ItemSpec::new("a")], &records);
        let a = &engine.items()[0];
        assert_eq!((a.column, a.row), (1, 1));
    }

    #[test]
    fn test_single_session_at_a_time() {
        let mut engine = engine_with(three_cards());
        assert!(engine.begin_drag("a", 0.0, 0.0));
        assert!(!engine.begin_drag("b", 0.0, 0.0));
        assert!(!engine.begin_resize("b", 0.0, 0.0));
        engine.abort_session();
        assert!(engine.begin_resize("b", 0.0, 0.0));
    }

    #[test]
    fn test_begin_refused_for_unknown_id_or_unmeasured_container() {
        let mut engine = engine_with(three_cards());
        assert!(!engine.begin_drag("ghost", 0.0, 0.0));

        let mut unmeasured = GridEngine::new(GridConfig::default());
        unmeasured.load(three_cards(), &HashMap::new());
        assert!(!unmeasured.begin_drag("a", 0.0, 0.0));
    }

    #[test]
    fn test_stray_events_are_noops() {
        let mut engine = engine_with(three_cards());
        assert!(engine.pointer_move(100.0, 100.0).is_none());
        assert!(engine.end_session().is_none());
        engine.abort_session();
    }

    #[test]
    fn test_drag_commit_updates_items() {
        let mut engine = engine_with(three_cards());
        assert!(engine.begin_drag("a", 0.0, 0.0));
        // Four cells right: (5, 1) is free.
        let proposed = engine.pointer_move(4.0 * STEP, 0.0).unwrap();
        assert_eq!((proposed.column, proposed.row), (5, 1));
        let commit = engine.end_session().unwrap();
        assert_eq!(commit.item_id, "a");
        let a = engine.items().iter().find(|i| i.id == "a").unwrap();
        assert_eq!((a.column, a.row), (5, 1));
        assert!(!engine.session_active());
    }

    #[test]
    fn test_noop_drag_emits_no_commit() {
        let mut engine = engine_with(three_cards());
        assert!(engine.begin_drag("a", 0.0, 0.0));
        // Two cells right lands on "b" and is rejected; release at the
        // origin must not produce a persistence write.
        engine.pointer_move(2.0 * STEP, 0.0);
        assert!(engine.end_session().is_none());
    }

    #[test]
    fn test_abort_reverts_nothing_and_keeps_items() {
        let mut engine = engine_with(three_cards());
        let before = engine.items().to_vec();
        assert!(engine.begin_drag("a", 0.0, 0.0));
        engine.pointer_move(4.0 * STEP, 0.0);
        engine.abort_session();
        assert_eq!(engine.items(), &before[..]);
        assert!(engine.end_session().is_none());
    }

    #[test]
    fn test_resize_commit_updates_items() {
        let mut engine = engine_with(three_cards());
        assert!(engine.begin_resize("c", 0.0, 0.0));
        engine.pointer_move(2.0 * STEP, STEP);
        let commit = engine.end_session().unwrap();
        assert_eq!(commit.patch.width, Some(4));
        assert_eq!(commit.patch.height, Some(3));
        let c = engine.items().iter().find(|i| i.id == "c").unwrap();
        assert_eq!((c.width, c.height), (4, 3));
    }

    #[test]
    fn test_remove_item_tears_down_its_session() {
        let mut engine = engine_with(three_cards());
        assert!(engine.begin_drag("a", 0.0, 0.0));
        assert!(engine.remove_item("a"));
        assert!(!engine.session_active());
        assert_eq!(engine.items().len(), 2);
        assert!(!engine.remove_item("a"));
    }

    #[test]
    fn test_load_tears_down_session() {
        let mut engine = engine_with(three_cards());
        assert!(engine.begin_drag("a", 0.0, 0.0));
        engine.load(three_cards(), &HashMap::new());
        assert!(!engine.session_active());
    }

    #[test]
    fn test_apply_batch_without_repack() {
        let mut engine = engine_with(three_cards());
        let patches = vec![
            ("a".to_string(), LayoutPatch::position(5, 1)),
            ("c".to_string(), LayoutPatch::position(3, 3)),
        ];
        assert_eq!(engine.apply_batch(&patches), 2);
        let a = engine.items().iter().find(|i| i.id == "a").unwrap();
        assert_eq!((a.column, a.row), (5, 1));
    }

    #[test]
    fn test_reset_item_repacks_one_card() {
        let mut engine = engine_with(three_cards());
        // Move "a" out of the way, then reset it: it returns to the first
        // free slot while the others stay put.
        engine.apply_batch(&[("a".to_string(), LayoutPatch::position(5, 5))]);
        assert!(engine.reset_item("a"));
        let a = engine.items().iter().find(|i| i.id == "a").unwrap();
        assert_eq!((a.column, a.row), (1, 1));
        let b = engine.items().iter().find(|i| i.id == "b").unwrap();
        assert_eq!((b.column, b.row), (3, 1));
        assert!(!engine.reset_item("ghost"));
    }

    #[test]
    fn test_reset_all_repacks_first_fit() {
        let mut engine = engine_with(vec![ItemSpec::new("a"), ItemSpec::new("b")]);
        engine.apply_batch(&[
            ("a".to_string(), LayoutPatch::position(3, 7)),
            ("b".to_string(), LayoutPatch::position(1, 4)),
        ]);
        engine.reset_all();
        let a = engine.items().iter().find(|i| i.id == "a").unwrap();
        let b = engine.items().iter().find(|i| i.id == "b").unwrap();
        assert_eq!((a.column, a.row), (1, 1));
        assert_eq!((b.column, b.row), (3, 1));
    }

    #[test]
    fn test_item_rect() {
        let engine = engine_with(three_cards());
        let rect = engine.item_rect("b").unwrap();
        assert_eq!(rect.x, 2.0 * STEP);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.w, 316.0);
        assert!(engine.item_rect("ghost").is_none());
    }

    #[test]
    fn test_drag_proposals_stay_collision_free() {
        let mut engine = engine_with(three_cards());
        assert!(engine.begin_drag("a", 0.0, 0.0));
        let items = engine.items().to_vec();
        for (mx, my) in [(1.0, 0.0), (2.0, 0.0), (3.0, 1.0), (0.0, 4.0), (5.0, 5.0)] {
            let proposed = engine.pointer_move(mx * STEP, my * STEP).unwrap();
            assert!(collision::accept(&proposed, "a", &items, engine.config()));
        }
    }
}
