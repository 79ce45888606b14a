//! Whole-panel watcher
//!
//! The game panel produces bursts of notifications for a single user action,
//! and some derived work (finding a freshly inserted overlay) needs the
//! subtree to finish settling first. Batches are therefore processed after a
//! short delay. The continuation re-reads live tree state; only the
//! previous/current attribute values needed for the actionability check are
//! carried across the suspension.

use tracing::{debug, warn};

use super::{is_actionable, tile};
use crate::annotate::{Annotation, annotate};
use crate::core::attrs::{self, class};
use crate::runtime::{Scheduler, Watcher};
use crate::tree::{ChangeKind, ChangeNotification, ObservableTree};

/// Debounced watcher over the whole game panel subtree.
///
/// Overlapping scheduled batches all run to completion; the equality guards
/// in the reconciliation paths make the overlap harmless.
#[derive(Debug)]
pub struct GamePageWatcher {
    settle_ms: u64,
}

impl GamePageWatcher {
    /// Delay before a delivered batch is processed.
    pub const DEFAULT_SETTLE_MS: u64 = 500;

    #[must_use]
    pub fn new(settle_ms: u64) -> Self {
        Self { settle_ms }
    }
}

impl Default for GamePageWatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SETTLE_MS)
    }
}

impl<T: ObservableTree + 'static> Watcher<T> for GamePageWatcher {
    fn on_batch(
        &mut self,
        _tree: &mut T,
        scheduler: &mut Scheduler<T>,
        batch: &[ChangeNotification],
    ) {
        let batch = batch.to_vec();
        debug!(count = batch.len(), "game panel changed; scheduling settle pass");
        scheduler.schedule(self.settle_ms, move |tree: &mut T| {
            process_batch(tree, &batch);
        });
    }
}

/// Process one settled batch against current tree state.
fn process_batch<T: ObservableTree>(tree: &mut T, batch: &[ChangeNotification]) {
    let mut fix_close_control = false;

    for notification in batch {
        match notification.kind {
            ChangeKind::ChildrenChanged => {
                // Newly inserted transient messages become polite live
                // regions so they are announced without stealing focus.
                for toast in tree.query_all_class_prefix(Some(notification.target), class::TOAST) {
                    tree.set_attribute_if_changed(toast, attrs::ARIA_LIVE, "polite");
                }
                if tree
                    .query_class_prefix(Some(notification.target), class::PAGE_OVERLAY)
                    .is_some()
                {
                    fix_close_control = true;
                }
            }
            ChangeKind::AttributeChanged => {
                let Some(tile) = tree.closest_class_prefix(notification.target, class::TILE)
                else {
                    continue;
                };
                if notification.attribute.as_deref() == Some(attrs::DATA_STATE)
                    && is_actionable(tree, notification)
                {
                    tile::reconcile(tree, tile);
                } else {
                    debug!(
                        node = notification.target.index(),
                        attribute = notification.attribute.as_deref().unwrap_or(""),
                        "tile churn skipped"
                    );
                }
            }
        }
    }

    // Once per batch: refocusing per notification would bounce the cursor.
    if fix_close_control {
        fix_overlay_close(tree);
    }
}

/// Give the overlay's close control a usable name and move focus to it.
fn fix_overlay_close<T: ObservableTree>(tree: &mut T) {
    let close = tree
        .query_class_prefix(None, class::PAGE_CLOSE)
        .or_else(|| tree.query_class_prefix(None, class::MODAL_CLOSE));
    let Some(close) = close else {
        warn!("overlay appeared but no close control was found");
        return;
    };
    annotate(tree, close, &Annotation::new().label("Close"));
    if let Some(icon) = tree.query_class_prefix(Some(close), class::GAME_ICON) {
        tree.set_attribute_if_changed(icon, attrs::ARIA_HIDDEN, "true");
    }
    tree.focus(close);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{Runtime, WatcherKind};
    use crate::tree::{MemoryTree, NodeId};

    fn panel() -> (Runtime<MemoryTree>, NodeId, NodeId) {
        let mut tree = MemoryTree::new();
        let panel = tree.create_element("div", "App-module_game_x");
        let slot = tree.create_element("div", "");
        let tile = tree.create_element("div", "Tile-module_tile_x");
        let root = tree.root();
        tree.append_child(root, panel);
        tree.append_child(panel, slot);
        tree.append_child(slot, tile);
        tree.take_records();

        let mut rt = Runtime::new(tree);
        rt.begin_watching(Some(panel), WatcherKind::GamePage);
        (rt, panel, tile)
    }

    fn insert_overlay(rt: &mut Runtime<MemoryTree>, panel: NodeId) -> (NodeId, NodeId) {
        let tree = rt.tree_mut();
        let overlay = tree.create_element("div", "Page-module_page_x");
        let close = tree.create_element("button", "Page-module_close_x");
        let icon = tree.create_element("svg", "game-icon");
        tree.append_child(close, icon);
        tree.append_child(overlay, close);
        tree.append_child(panel, overlay);
        (close, icon)
    }

    #[test]
    fn overlay_and_toast_in_one_batch_are_both_handled() {
        let (mut rt, panel, _) = panel();

        let toast = rt.tree_mut().create_element("div", "Toaster-module_x");
        rt.tree_mut().append_child(panel, toast);
        let (close, icon) = insert_overlay(&mut rt, panel);

        rt.run_until_idle();

        assert_eq!(
            rt.tree().attribute(toast, "aria-live").as_deref(),
            Some("polite")
        );
        assert_eq!(rt.tree().attribute(close, "aria-label").as_deref(), Some("Close"));
        assert_eq!(rt.tree().attribute(icon, "aria-hidden").as_deref(), Some("true"));
        assert_eq!(rt.tree().focused(), Some(close));
    }

    #[test]
    fn tile_status_change_is_relabeled_after_settle() {
        let (mut rt, _, tile) = panel();
        rt.tree_mut().set_attribute(tile, "letter", "S");
        rt.tree_mut().set_attribute(tile, "data-state", "absent");

        rt.advance(GamePageWatcher::DEFAULT_SETTLE_MS - 1);
        assert_eq!(rt.tree().attribute(tile, "aria-label"), None);

        rt.advance(1);
        assert_eq!(
            rt.tree().attribute(tile, "aria-label").as_deref(),
            Some("S absent")
        );
    }

    #[test]
    fn batches_inside_the_settle_window_are_all_processed() {
        let (mut rt, panel, tile) = panel();

        rt.tree_mut().set_attribute(tile, "letter", "S");
        rt.tree_mut().set_attribute(tile, "data-state", "absent");
        rt.deliver();
        rt.advance(100);

        let toast = rt.tree_mut().create_element("div", "Toaster-module_x");
        rt.tree_mut().append_child(panel, toast);
        rt.deliver();

        // Neither batch has settled yet
        assert_eq!(rt.tree().attribute(tile, "aria-label"), None);

        rt.run_until_idle();
        assert_eq!(
            rt.tree().attribute(tile, "aria-label").as_deref(),
            Some("S absent")
        );
        assert_eq!(
            rt.tree().attribute(toast, "aria-live").as_deref(),
            Some("polite")
        );
    }

    #[test]
    fn non_status_tile_churn_is_not_relabeled() {
        let (mut rt, _, tile) = panel();
        rt.tree_mut().set_attribute(tile, "style", "animation: flip");
        rt.run_until_idle();
        assert_eq!(rt.tree().attribute(tile, "aria-label"), None);
    }

    #[test]
    fn rewriting_an_identical_status_does_nothing() {
        let (mut rt, _, tile) = panel();
        rt.tree_mut().set_attribute(tile, "letter", "S");
        rt.tree_mut().set_attribute(tile, "data-state", "absent");
        rt.run_until_idle();

        let writes = rt.tree().attribute_writes();
        rt.tree_mut().set_attribute(tile, "data-state", "absent");
        rt.run_until_idle();

        // Only the environment's redundant write itself
        assert_eq!(rt.tree().attribute_writes(), writes + 1);
    }

    #[test]
    fn overlay_without_close_control_degrades_quietly() {
        let (mut rt, panel, _) = panel();
        let overlay = rt.tree_mut().create_element("div", "Page-module_page_x");
        rt.tree_mut().append_child(panel, overlay);
        rt.run_until_idle();
        assert_eq!(rt.tree().focused(), None);
    }

    #[test]
    fn modal_close_is_the_fallback_signature() {
        let (mut rt, panel, _) = panel();
        let overlay = rt.tree_mut().create_element("div", "Page-module_page_x");
        let close = rt.tree_mut().create_element("button", "Modal-module_close_x");
        rt.tree_mut().append_child(overlay, close);
        rt.tree_mut().append_child(panel, overlay);
        rt.run_until_idle();

        assert_eq!(rt.tree().attribute(close, "aria-label").as_deref(), Some("Close"));
        assert_eq!(rt.tree().focused(), Some(close));
    }
}
