//! Toggle-control checkbox semantics
//!
//! The game's settings switches track their on/off state as a bare
//! `checked` presence attribute, which announces as nothing. Registration
//! stamps checkbox semantics on first sight; afterwards the announced state
//! is re-derived from the presence flag on every actionable change.

use super::is_actionable;
use crate::annotate::{Annotation, Role, annotate};
use crate::core::attrs;
use crate::runtime::{Scheduler, Watcher};
use crate::tree::{ChangeNotification, NodeId, ObservableTree};

/// First-sight registration of a toggle control.
///
/// A control that already announces a checked state is left alone, so
/// registration is idempotent and never fights the host page.
pub fn register<T: ObservableTree>(tree: &mut T, toggle: NodeId) {
    if tree.has_attribute(toggle, attrs::ARIA_CHECKED) {
        return;
    }
    let mut annotation = Annotation::new().role(Role::Checkbox).activatable();
    if let Some(name) = tree.attribute(toggle, attrs::NAME) {
        annotation = annotation.label(name);
    }
    annotate(tree, toggle, &annotation);
    let checked = tree.has_attribute(toggle, attrs::CHECKED);
    tree.set_attribute(toggle, attrs::ARIA_CHECKED, bool_str(checked));
}

/// Re-derive the announced checked state from the presence flag.
pub fn reconcile<T: ObservableTree>(tree: &mut T, toggle: NodeId) {
    let checked = tree.has_attribute(toggle, attrs::CHECKED);
    tree.set_attribute_if_changed(toggle, attrs::ARIA_CHECKED, bool_str(checked));
}

const fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Keeps one toggle's announced state consistent with its presence flag.
#[derive(Debug, Default)]
pub struct ToggleWatcher;

impl<T: ObservableTree> Watcher<T> for ToggleWatcher {
    fn on_batch(
        &mut self,
        tree: &mut T,
        _scheduler: &mut Scheduler<T>,
        batch: &[ChangeNotification],
    ) {
        for notification in batch {
            if !is_actionable(tree, notification) {
                continue;
            }
            reconcile(tree, notification.target);
        }
    }
}
