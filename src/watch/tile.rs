//! Tile reconciliation
//!
//! A tile's announced name is re-derived from its own `letter` and
//! `data-state` attributes whenever its evaluation changes. The same name is
//! propagated to the tile's parent slot (the otherwise-empty cell wrapper),
//! and the tile is kept a polite live region so updates are announced
//! without interrupting.

use tracing::debug;

use super::is_actionable;
use crate::annotate::{Annotation, annotate};
use crate::core::attrs::{self, class};
use crate::core::derive_tile_label;
use crate::runtime::{Scheduler, Watcher};
use crate::tree::{ChangeKind, ChangeNotification, NodeId, ObservableTree};

/// Re-derive and re-apply one tile's accessible name from current state.
///
/// The derivation reads nothing but the tile's own attributes. Writes are
/// equality-guarded, so reconciling an unchanged tile does nothing.
pub fn reconcile<T: ObservableTree>(tree: &mut T, tile: NodeId) {
    let letter = tree.attribute(tile, attrs::LETTER);
    let status = tree.attribute(tile, attrs::DATA_STATE).unwrap_or_default();
    let label = derive_tile_label(letter.as_deref(), &status);
    debug!(tile = tile.index(), %label, "reconciling tile");

    annotate(tree, tile, &Annotation::new().label(&label));
    if let Some(slot) = tree.parent(tile) {
        tree.set_attribute_if_changed(slot, attrs::ARIA_LABEL, &label);
    }
    tree.set_attribute_if_changed(tile, attrs::ARIA_LIVE, "polite");
}

/// Relabels tiles on actionable evaluation changes across a board subtree.
#[derive(Debug, Default)]
pub struct TileWatcher;

impl<T: ObservableTree> Watcher<T> for TileWatcher {
    fn on_batch(
        &mut self,
        tree: &mut T,
        _scheduler: &mut Scheduler<T>,
        batch: &[ChangeNotification],
    ) {
        for notification in batch {
            if notification.kind != ChangeKind::AttributeChanged {
                continue;
            }
            if notification.attribute.as_deref() != Some(attrs::DATA_STATE) {
                continue;
            }
            if !is_actionable(tree, notification) {
                continue;
            }
            if let Some(tile) = tree.closest_class_prefix(notification.target, class::TILE) {
                reconcile(tree, tile);
            }
        }
    }
}
