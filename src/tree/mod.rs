//! Observable tree capability
//!
//! The engine never owns the document it annotates. It sees the page through
//! the [`ObservableTree`] capability: attribute reads and writes, structural
//! queries by class signature, encapsulated (shadow) content, focus, and a
//! journal of every mutation — including the engine's own writes, which is
//! exactly why every write path is equality-guarded.
//!
//! [`MemoryTree`] is the in-memory implementation used by the simulator and
//! the tests.

mod memory;

pub use memory::MemoryTree;

/// Non-owning handle to a node in an externally-controlled tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw index value, for display purposes only.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// What kind of mutation a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// An attribute on the target changed (set, overwritten, or removed).
    AttributeChanged,
    /// The target's child list changed (nodes added or removed).
    ChildrenChanged,
}

/// One observed mutation. Transient: consumed on delivery, never stored.
#[derive(Debug, Clone)]
pub struct ChangeNotification {
    /// Node the mutation happened on. For child-list changes this is the
    /// parent whose children changed.
    pub target: NodeId,
    pub kind: ChangeKind,
    /// Attribute name, for [`ChangeKind::AttributeChanged`].
    pub attribute: Option<String>,
    /// Value before the mutation. Delivered only to subscriptions that opted
    /// into previous-value tracking; stripped otherwise.
    pub old_value: Option<String>,
    /// Value recorded at mutation time. Watchers re-read the live value at
    /// processing time; this field exists for delivery-order bookkeeping.
    pub new_value: Option<String>,
}

/// What a subscription wants delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserveScope {
    /// Deliver attribute changes.
    pub attributes: bool,
    /// Include previous attribute values in delivered notifications.
    pub attribute_old_value: bool,
    /// Deliver child-list changes.
    pub children: bool,
    /// Cover the whole subtree under the root, not just the root itself.
    pub subtree: bool,
}

impl ObserveScope {
    /// Attribute changes on a single element, no previous values.
    #[must_use]
    pub const fn attributes() -> Self {
        Self {
            attributes: true,
            attribute_old_value: false,
            children: false,
            subtree: false,
        }
    }

    /// Attribute changes with previous values on a single control.
    #[must_use]
    pub const fn control() -> Self {
        Self {
            attributes: true,
            attribute_old_value: true,
            children: false,
            subtree: false,
        }
    }

    /// Attribute changes with previous values, across a subtree.
    #[must_use]
    pub const fn subtree_attributes() -> Self {
        Self {
            attributes: true,
            attribute_old_value: true,
            children: false,
            subtree: true,
        }
    }

    /// Attribute and structural changes, with previous values, across a
    /// subtree. The shape the game-panel watcher uses.
    #[must_use]
    pub const fn panel() -> Self {
        Self {
            attributes: true,
            attribute_old_value: true,
            children: true,
            subtree: true,
        }
    }

    /// Whether a notification of the given kind falls inside this scope.
    #[must_use]
    pub const fn covers(&self, kind: ChangeKind) -> bool {
        match kind {
            ChangeKind::AttributeChanged => self.attributes,
            ChangeKind::ChildrenChanged => self.children,
        }
    }
}

/// Read/write access to an externally-owned document tree.
///
/// Mutating methods journal every change; [`take_records`](Self::take_records)
/// drains the journal. The engine's own writes are journaled like everyone
/// else's, so reconciliation must be idempotent.
pub trait ObservableTree {
    /// Current value of an attribute, or `None` when absent.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Whether the attribute is present at all (presence-based flags like
    /// `checked` carry meaning without a value).
    fn has_attribute(&self, node: NodeId, name: &str) -> bool;

    /// Set an attribute unconditionally. Journals a change even when the new
    /// value equals the old one, matching host mutation-observer behavior.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Parent node, or `None` for the document root and detached shadow
    /// roots.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Whether any class on the node starts with the given prefix.
    fn class_starts_with(&self, node: NodeId, prefix: &str) -> bool;

    /// First descendant (document order) of `root` whose class starts with
    /// the prefix. `None` as root searches the whole document. The root
    /// itself is not a match candidate.
    fn query_class_prefix(&self, root: Option<NodeId>, prefix: &str) -> Option<NodeId>;

    /// All descendants of `root` whose class starts with the prefix, in
    /// document order.
    fn query_all_class_prefix(&self, root: Option<NodeId>, prefix: &str) -> Vec<NodeId>;

    /// First descendant carrying an attribute with the exact given value.
    fn query_by_attribute(&self, root: Option<NodeId>, name: &str, value: &str) -> Option<NodeId>;

    /// Root of the node's encapsulated content, if it has any.
    fn shadow_root(&self, node: NodeId) -> Option<NodeId>;

    /// Install the node's single key-activation binding.
    fn set_key_activation(&mut self, node: NodeId);

    /// Whether a key-activation binding is already installed.
    fn has_key_activation(&self, node: NodeId) -> bool;

    /// Move keyboard focus to the node.
    fn focus(&mut self, node: NodeId);

    /// Synthesize a click on the node. The environment decides what the
    /// click does; the tree only records it.
    fn click(&mut self, node: NodeId);

    /// Drain all mutation records accumulated since the last drain, in
    /// occurrence order.
    fn take_records(&mut self) -> Vec<ChangeNotification>;

    /// Total number of mutations ever journaled. Subscriptions use this to
    /// ignore mutations that happened before they were registered.
    fn journal_seq(&self) -> u64;

    /// Write an attribute only when the value actually differs from the
    /// current one. Returns whether a write happened. Every reconciliation
    /// path goes through this guard; it is what keeps the engine from
    /// re-triggering itself.
    fn set_attribute_if_changed(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        if self.attribute(node, name).as_deref() == Some(value) {
            return false;
        }
        self.set_attribute(node, name, value);
        true
    }

    /// Whether `node` is `root` or one of its descendants.
    fn contains(&self, root: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == root {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Nearest ancestor-or-self whose class starts with the prefix.
    fn closest_class_prefix(&self, node: NodeId, prefix: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.class_starts_with(n, prefix) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }
}
