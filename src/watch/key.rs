//! Keyboard-key relabeling
//!
//! Keys expose whatever state the game stamps on them: the printed letter,
//! the evaluation it picked up after a guess, and the raw key identifier.
//! The accessible name is assembled from those sources in a fixed order.

use super::is_actionable;
use crate::core::attrs;
use crate::core::derive_composite_label;
use crate::runtime::{Scheduler, Watcher};
use crate::tree::{ChangeKind, ChangeNotification, NodeId, ObservableTree};

/// Source attributes feeding a key's composite label, in announcement order.
pub const LABEL_SOURCES: [&str; 3] = [attrs::LETTER, attrs::EVALUATION, attrs::DATA_KEY];

/// Re-derive a key's accessible name from its current source attributes.
pub fn relabel<T: ObservableTree>(tree: &mut T, key: NodeId) {
    let parts: Vec<(&str, Option<String>)> = LABEL_SOURCES
        .iter()
        .map(|&name| (name, tree.attribute(key, name)))
        .collect();
    let label = derive_composite_label(&parts);
    tree.set_attribute_if_changed(key, attrs::ARIA_LABEL, &label);
}

/// Relabels a single keyboard key on actionable attribute changes.
#[derive(Debug, Default)]
pub struct KeyWatcher;

impl<T: ObservableTree> Watcher<T> for KeyWatcher {
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
            // Only the label sources matter; reacting to other attributes
            // would let the watcher clobber names set during bootstrap.
            let source = notification
                .attribute
                .as_deref()
                .is_some_and(|name| LABEL_SOURCES.contains(&name));
            if !source {
                continue;
            }
            if !is_actionable(tree, notification) {
                continue;
            }
            relabel(tree, notification.target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use crate::tree::{MemoryTree, ObserveScope};

    fn key() -> (MemoryTree, NodeId) {
        let mut tree = MemoryTree::new();
        let key = tree.create_element("button", "Key-module_key_x");
        let root = tree.root();
        tree.append_child(root, key);
        tree.take_records();
        (tree, key)
    }

    #[test]
    fn label_assembles_present_sources_in_order() {
        let (mut tree, key) = key();
        tree.set_attribute(key, "letter", "q");
        tree.set_attribute(key, "evaluation", "absent");
        tree.set_attribute(key, "data-key", "q");

        relabel(&mut tree, key);

        assert_eq!(
            tree.attribute(key, "aria-label").as_deref(),
            Some("q absent q")
        );
    }

    #[test]
    fn evaluation_change_updates_the_label_without_cascading() {
        let (tree, key) = key();
        let mut rt = Runtime::new(tree);
        rt.subscribe(key, ObserveScope::control(), KeyWatcher);
        rt.tree_mut().set_attribute(key, "letter", "q");
        rt.tree_mut().set_attribute(key, "data-key", "q");
        rt.run_until_idle();
        assert_eq!(rt.tree().attribute(key, "aria-label").as_deref(), Some("q q"));

        let writes = rt.tree().attribute_writes();
        rt.tree_mut().set_attribute(key, "evaluation", "present");
        rt.run_until_idle();

        // One environment write, one relabel, then the echo is filtered out
        assert_eq!(rt.tree().attribute_writes(), writes + 2);
        assert_eq!(
            rt.tree().attribute(key, "aria-label").as_deref(),
            Some("q present q")
        );
    }

    #[test]
    fn explicit_name_survives_non_source_churn() {
        let (tree, key) = key();
        let mut rt = Runtime::new(tree);
        rt.tree_mut().set_attribute(key, "data-key", "←");
        rt.tree_mut().set_attribute(key, "aria-label", "backspace");
        rt.subscribe(key, ObserveScope::control(), KeyWatcher);

        rt.tree_mut().set_attribute(key, "style", "pressed");
        rt.run_until_idle();

        assert_eq!(
            rt.tree().attribute(key, "aria-label").as_deref(),
            Some("backspace")
        );
    }

    #[test]
    fn key_without_sources_gets_an_empty_name() {
        let (mut tree, key) = key();
        relabel(&mut tree, key);
        assert_eq!(tree.attribute(key, "aria-label").as_deref(), Some(""));
    }
}
