//! Element annotator
//!
//! Applies role, accessible-name, and keyboard-activation semantics to a
//! single element from a declarative [`Annotation`]. All writes are
//! equality-guarded: re-applying an annotation that already holds is a
//! no-op, which is what lets watchers re-derive labels freely without
//! re-triggering themselves.

use tracing::debug;

use crate::core::attrs::{self, class};
use crate::tree::{NodeId, ObservableTree};

/// Semantic category assigned to an element for assistive technology.
///
/// `Tile` and `Dialog` expand to composite attribute sets; the rest map to
/// their plain role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Table,
    Row,
    Cell,
    Group,
    Checkbox,
    /// Image-like role refined with a "tile" role description.
    Tile,
    /// Non-modal dialog.
    Dialog,
}

impl Role {
    fn apply<T: ObservableTree>(self, tree: &mut T, node: NodeId) {
        match self {
            Self::Tile => {
                tree.set_attribute_if_changed(node, attrs::ROLE, "img");
                tree.set_attribute_if_changed(node, attrs::ARIA_ROLEDESCRIPTION, "tile");
            }
            Self::Dialog => {
                tree.set_attribute_if_changed(node, attrs::ROLE, "dialog");
                tree.set_attribute_if_changed(node, attrs::ARIA_MODAL, "false");
            }
            Self::Table => {
                tree.set_attribute_if_changed(node, attrs::ROLE, "table");
            }
            Self::Row => {
                tree.set_attribute_if_changed(node, attrs::ROLE, "row");
            }
            Self::Cell => {
                tree.set_attribute_if_changed(node, attrs::ROLE, "cell");
            }
            Self::Group => {
                tree.set_attribute_if_changed(node, attrs::ROLE, "group");
            }
            Self::Checkbox => {
                tree.set_attribute_if_changed(node, attrs::ROLE, "checkbox");
            }
        }
    }
}

/// Declarative description of the semantics to stamp onto one element.
#[derive(Debug, Default, Clone)]
pub struct Annotation {
    role: Option<Role>,
    label: Option<String>,
    activatable: bool,
}

impl Annotation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn activatable(mut self) -> Self {
        self.activatable = true;
        self
    }
}

/// Apply an annotation to one element.
///
/// Role and label writes happen only when the value differs from what the
/// element already carries. The activation aspect installs the element's
/// single key-activation binding and marks it focusable; re-invoking on an
/// already-bound element changes nothing.
pub fn annotate<T: ObservableTree>(tree: &mut T, node: NodeId, annotation: &Annotation) {
    if let Some(role) = annotation.role {
        role.apply(tree, node);
    }

    if let Some(label) = annotation.label.as_deref()
        && tree.set_attribute_if_changed(node, attrs::ARIA_LABEL, label)
    {
        debug!(node = node.index(), label, "accessible name updated");
    }

    if annotation.activatable && !tree.has_key_activation(node) {
        tree.set_attribute_if_changed(node, attrs::TABINDEX, "0");
        tree.set_key_activation(node);
    }
}

/// Key presses relevant to synthesized activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationKey {
    Enter,
    Space,
    Other,
}

/// Whether a dispatched key press was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The press was consumed (propagation stopped, default prevented) and a
    /// click was synthesized.
    Activated,
    /// Not an activation key, or the node carries no binding; the press
    /// keeps propagating.
    Ignored,
}

/// Route a key press through a node's activation binding.
///
/// Enter and Space on a bound node click a `switch`-classed child inside the
/// node's encapsulated content when one exists, otherwise the node itself.
/// The click target is resolved at press time, not at binding time.
pub fn dispatch_key<T: ObservableTree>(
    tree: &mut T,
    node: NodeId,
    key: ActivationKey,
) -> KeyOutcome {
    if !matches!(key, ActivationKey::Enter | ActivationKey::Space) {
        return KeyOutcome::Ignored;
    }
    if !tree.has_key_activation(node) {
        return KeyOutcome::Ignored;
    }
    let target = tree
        .shadow_root(node)
        .and_then(|shadow| tree.query_class_prefix(Some(shadow), class::SWITCH))
        .unwrap_or(node);
    tree.click(target);
    KeyOutcome::Activated
}
