//! Screen-reader announcer
//!
//! Voices what a polite screen reader would say: whenever the content of a
//! live region changes between settles, its current text is queued as an
//! utterance. Purely a consumer of the annotated tree; nothing here writes.

use rustc_hash::FxHashMap;

use crate::core::attrs;
use crate::tree::{MemoryTree, NodeId, ObservableTree};

/// Message attribute carried by transient toast regions.
const MESSAGE: &str = "message";

/// Tracks live-region content between polls and yields new utterances.
#[derive(Debug, Default)]
pub struct Announcer {
    last: FxHashMap<NodeId, String>,
}

impl Announcer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current live-region content without announcing it. Call
    /// once after initial setup so the baseline labels stay silent.
    pub fn prime(&mut self, tree: &MemoryTree) {
        self.last = Self::live_content(tree).into_iter().collect();
    }

    /// Collect utterances, in document order, for every live region whose
    /// content changed since the previous poll.
    pub fn poll(&mut self, tree: &MemoryTree) -> Vec<String> {
        let current = Self::live_content(tree);
        let mut utterances = Vec::new();
        for (node, text) in &current {
            if !text.is_empty() && self.last.get(node) != Some(text) {
                utterances.push(text.clone());
            }
        }
        self.last = current.into_iter().collect();
        utterances
    }

    /// Current text of every polite live region, in document order.
    fn live_content(tree: &MemoryTree) -> Vec<(NodeId, String)> {
        let mut content = Vec::new();
        let mut stack = vec![tree.root()];
        while let Some(node) = stack.pop() {
            stack.extend(tree.children(node).iter().rev().copied());
            if tree.attribute(node, attrs::ARIA_LIVE).as_deref() != Some("polite") {
                continue;
            }
            let text = tree
                .attribute(node, MESSAGE)
                .or_else(|| tree.attribute(node, attrs::ARIA_LABEL))
                .unwrap_or_default();
            content.push((node, text));
        }
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_tile() -> (MemoryTree, NodeId) {
        let mut tree = MemoryTree::new();
        let tile = tree.create_element("div", "Tile-module_tile_a");
        let root = tree.root();
        tree.append_child(root, tile);
        tree.set_attribute(tile, "aria-live", "polite");
        tree.set_attribute(tile, "aria-label", "Blank");
        (tree, tile)
    }

    #[test]
    fn changed_label_is_announced_once() {
        let (mut tree, tile) = live_tile();
        let mut announcer = Announcer::new();
        announcer.prime(&tree);

        tree.set_attribute(tile, "aria-label", "S absent");
        assert_eq!(announcer.poll(&tree), vec!["S absent".to_string()]);
        assert!(announcer.poll(&tree).is_empty());
    }

    #[test]
    fn primed_baseline_stays_silent() {
        let (tree, _) = live_tile();
        let mut announcer = Announcer::new();
        announcer.prime(&tree);
        assert!(announcer.poll(&tree).is_empty());
    }

    #[test]
    fn toast_messages_are_voiced() {
        let (mut tree, _) = live_tile();
        let mut announcer = Announcer::new();
        announcer.prime(&tree);

        let root = tree.root();
        let toast = tree.create_element("div", "Toaster-module_toaster_a");
        tree.set_attribute(toast, "message", "Not enough letters");
        tree.set_attribute(toast, "aria-live", "polite");
        tree.append_child(root, toast);

        assert_eq!(
            announcer.poll(&tree),
            vec!["Not enough letters".to_string()]
        );
    }

    #[test]
    fn regions_without_live_marker_stay_silent() {
        let (mut tree, _) = live_tile();
        let mut announcer = Announcer::new();
        announcer.prime(&tree);

        let root = tree.root();
        let quiet = tree.create_element("div", "");
        tree.set_attribute(quiet, "aria-label", "decoration");
        tree.append_child(root, quiet);

        assert!(announcer.poll(&tree).is_empty());
    }
}
