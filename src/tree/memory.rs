//! In-memory observable tree
//!
//! Arena-backed document tree used by the simulator and the tests. Every
//! mutation is journaled in occurrence order; the runtime drains the journal
//! and routes it to watcher subscriptions. Clicks and focus moves are
//! recorded rather than interpreted — the environment that owns the page
//! decides what they mean.

use rustc_hash::FxHashMap;

use super::{ChangeKind, ChangeNotification, NodeId, ObservableTree};

#[derive(Debug, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: FxHashMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    shadow: Option<NodeId>,
    key_activation: bool,
}

/// Arena-backed tree with a mutation journal.
///
/// Node 0 is the document root and always exists. Shadow roots are parented
/// to nothing: structural queries and containment walks stop at the
/// encapsulation boundary, matching how host observers behave.
#[derive(Debug, Default)]
pub struct MemoryTree {
    nodes: Vec<Node>,
    records: Vec<ChangeNotification>,
    journal_seq: u64,
    clicks: Vec<NodeId>,
    focused: Option<NodeId>,
    attribute_writes: u64,
}

impl MemoryTree {
    /// Create a tree containing only the document root.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Self::default();
        tree.alloc("body", "");
        tree
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn alloc(&mut self, tag: &str, class: &str) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        let classes = if class.is_empty() {
            Vec::new()
        } else {
            vec![class.to_string()]
        };
        self.nodes.push(Node {
            tag: tag.to_string(),
            classes,
            ..Node::default()
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    fn record(&mut self, notification: ChangeNotification) {
        self.journal_seq += 1;
        self.records.push(notification);
    }

    /// Create a detached element with an optional (single) class.
    pub fn create_element(&mut self, tag: &str, class: &str) -> NodeId {
        self.alloc(tag, class)
    }

    /// Element tag, as given at creation.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.node(node).tag
    }

    /// Append `child` under `parent`. Journals a child-list change on the
    /// parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
        self.record(ChangeNotification {
            target: parent,
            kind: ChangeKind::ChildrenChanged,
            attribute: None,
            old_value: None,
            new_value: None,
        });
    }

    /// Detach `child` from `parent`. Journals a child-list change. Focus is
    /// dropped when the focused node leaves the tree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(focused) = self.focused
            && self.contains(child, focused)
        {
            self.focused = None;
        }
        self.node_mut(parent).children.retain(|&c| c != child);
        self.node_mut(child).parent = None;
        self.record(ChangeNotification {
            target: parent,
            kind: ChangeKind::ChildrenChanged,
            attribute: None,
            old_value: None,
            new_value: None,
        });
    }

    /// Give `host` an encapsulated content root and return it. Content under
    /// the shadow root is invisible to document-order queries and to
    /// subscriptions rooted outside it.
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        let shadow = self.alloc("shadow-root", "");
        self.node_mut(host).shadow = Some(shadow);
        shadow
    }

    /// Remove an attribute entirely (presence flags like `checked` toggle
    /// off this way). Journals the change with the previous value.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let old = self.node_mut(node).attributes.remove(name);
        if old.is_some() {
            self.record(ChangeNotification {
                target: node,
                kind: ChangeKind::AttributeChanged,
                attribute: Some(name.to_string()),
                old_value: old,
                new_value: None,
            });
        }
    }

    /// Children of a node, in insertion order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Currently focused node, if any.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Drain the synthesized clicks recorded since the last drain.
    pub fn take_clicks(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.clicks)
    }

    /// Number of attribute writes performed so far (journal-visible writes
    /// only; equality-suppressed writes never reach the tree).
    #[must_use]
    pub fn attribute_writes(&self) -> u64 {
        self.attribute_writes
    }

    /// Descendants of `root` in document order, not crossing shadow
    /// boundaries. The root itself is excluded.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(root).children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.node(n).children.iter().rev());
        }
        out
    }
}

impl ObservableTree for MemoryTree {
    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node).attributes.get(name).cloned()
    }

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.node(node).attributes.contains_key(name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let old = self
            .node_mut(node)
            .attributes
            .insert(name.to_string(), value.to_string());
        self.attribute_writes += 1;
        self.record(ChangeNotification {
            target: node,
            kind: ChangeKind::AttributeChanged,
            attribute: Some(name.to_string()),
            old_value: old,
            new_value: Some(value.to_string()),
        });
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn class_starts_with(&self, node: NodeId, prefix: &str) -> bool {
        self.node(node).classes.iter().any(|c| c.starts_with(prefix))
    }

    fn query_class_prefix(&self, root: Option<NodeId>, prefix: &str) -> Option<NodeId> {
        let root = root.unwrap_or_else(|| self.root());
        self.descendants(root)
            .into_iter()
            .find(|&n| self.class_starts_with(n, prefix))
    }

    fn query_all_class_prefix(&self, root: Option<NodeId>, prefix: &str) -> Vec<NodeId> {
        let root = root.unwrap_or_else(|| self.root());
        self.descendants(root)
            .into_iter()
            .filter(|&n| self.class_starts_with(n, prefix))
            .collect()
    }

    fn query_by_attribute(&self, root: Option<NodeId>, name: &str, value: &str) -> Option<NodeId> {
        let root = root.unwrap_or_else(|| self.root());
        self.descendants(root)
            .into_iter()
            .find(|&n| self.node(n).attributes.get(name).map(String::as_str) == Some(value))
    }

    fn shadow_root(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).shadow
    }

    fn set_key_activation(&mut self, node: NodeId) {
        self.node_mut(node).key_activation = true;
    }

    fn has_key_activation(&self, node: NodeId) -> bool {
        self.node(node).key_activation
    }

    fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
    }

    fn click(&mut self, node: NodeId) {
        self.clicks.push(node);
    }

    fn take_records(&mut self) -> Vec<ChangeNotification> {
        std::mem::take(&mut self.records)
    }

    fn journal_seq(&self) -> u64 {
        self.journal_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> (MemoryTree, NodeId, NodeId) {
        let mut tree = MemoryTree::new();
        let parent = tree.create_element("div", "Row-module_row_abc");
        let child = tree.create_element("div", "Tile-module_tile_xyz");
        let root = tree.root();
        tree.append_child(root, parent);
        tree.append_child(parent, child);
        (tree, parent, child)
    }

    #[test]
    fn append_journals_children_changed() {
        let (mut tree, parent, _) = small_tree();
        let records = tree.take_records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.kind == ChangeKind::ChildrenChanged));
        assert_eq!(records[1].target, parent);
    }

    #[test]
    fn set_attribute_journals_old_and_new() {
        let (mut tree, _, child) = small_tree();
        tree.take_records();

        tree.set_attribute(child, "data-state", "absent");
        tree.set_attribute(child, "data-state", "correct");
        let records = tree.take_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].old_value, None);
        assert_eq!(records[0].new_value.as_deref(), Some("absent"));
        assert_eq!(records[1].old_value.as_deref(), Some("absent"));
        assert_eq!(records[1].new_value.as_deref(), Some("correct"));
    }

    #[test]
    fn set_attribute_if_changed_suppresses_equal_writes() {
        let (mut tree, _, child) = small_tree();
        tree.take_records();

        assert!(tree.set_attribute_if_changed(child, "aria-label", "S absent"));
        assert!(!tree.set_attribute_if_changed(child, "aria-label", "S absent"));
        assert_eq!(tree.take_records().len(), 1);
        assert_eq!(tree.attribute_writes(), 1);
    }

    #[test]
    fn remove_attribute_journals_only_when_present() {
        let (mut tree, _, child) = small_tree();
        tree.set_attribute(child, "checked", "");
        tree.take_records();

        tree.remove_attribute(child, "checked");
        tree.remove_attribute(child, "checked");
        let records = tree.take_records();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].old_value.as_deref(), Some(""));
        assert_eq!(records[0].new_value, None);
    }

    #[test]
    fn query_matches_by_prefix_in_document_order() {
        let (tree, parent, child) = small_tree();
        assert_eq!(tree.query_class_prefix(None, "Tile-module_tile_"), Some(child));
        assert_eq!(tree.query_class_prefix(None, "Row-module_row_"), Some(parent));
        assert_eq!(tree.query_class_prefix(None, "Board-module_board_"), None);
        // Root is not its own descendant
        assert_eq!(tree.query_class_prefix(Some(child), "Tile-module_tile_"), None);
    }

    #[test]
    fn query_by_attribute_finds_exact_value() {
        let (mut tree, parent, _) = small_tree();
        let key = tree.create_element("button", "Key-module_key_abc");
        tree.set_attribute(key, "data-key", "←");
        tree.append_child(parent, key);

        assert_eq!(tree.query_by_attribute(None, "data-key", "←"), Some(key));
        assert_eq!(tree.query_by_attribute(None, "data-key", "↵"), None);
    }

    #[test]
    fn contains_and_closest_walk_ancestors() {
        let (tree, parent, child) = small_tree();
        assert!(tree.contains(tree.root(), child));
        assert!(tree.contains(parent, child));
        assert!(!tree.contains(child, parent));
        assert_eq!(
            tree.closest_class_prefix(child, "Row-module_row_"),
            Some(parent)
        );
        assert_eq!(
            tree.closest_class_prefix(child, "Tile-module_tile_"),
            Some(child)
        );
    }

    #[test]
    fn shadow_content_is_hidden_from_document_queries() {
        let (mut tree, parent, _) = small_tree();
        let shadow = tree.attach_shadow(parent);
        let switch = tree.create_element("div", "switch");
        tree.append_child(shadow, switch);

        // Document-order query never pierces the boundary...
        assert_eq!(tree.query_class_prefix(None, "switch"), None);
        // ...but querying from the shadow root itself does.
        assert_eq!(tree.query_class_prefix(Some(shadow), "switch"), Some(switch));
        // Containment stops at the boundary too.
        assert!(!tree.contains(tree.root(), switch));
    }

    #[test]
    fn clicks_and_focus_are_recorded() {
        let (mut tree, _, child) = small_tree();
        tree.click(child);
        tree.focus(child);
        assert_eq!(tree.take_clicks(), vec![child]);
        assert!(tree.take_clicks().is_empty());
        assert_eq!(tree.focused(), Some(child));
    }
}
