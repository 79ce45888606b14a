//! Actionability filter
//!
//! Every watcher consults this before doing derivation work. An attribute
//! notification is actionable only when the value actually changed: the
//! comparison reads the *live* value at processing time, because batches may
//! be processed long after delivery and the environment may have moved on.

use crate::tree::{ChangeKind, ChangeNotification, ObservableTree};

/// Decide whether a notification warrants derivation work.
///
/// Structural changes are always actionable (there is no meaningful previous
/// value to compare). Attribute changes are actionable only when the current
/// value differs from the recorded previous one; this is the guard that
/// keeps the engine's own writes from cascading.
#[must_use]
pub fn is_actionable<T: ObservableTree>(tree: &T, notification: &ChangeNotification) -> bool {
    match notification.kind {
        ChangeKind::ChildrenChanged => true,
        ChangeKind::AttributeChanged => {
            let Some(name) = notification.attribute.as_deref() else {
                return false;
            };
            tree.attribute(notification.target, name) != notification.old_value
        }
    }
}
