//! One-shot bootstrap
//!
//! Locates the page's structural anchors by class signature, stamps initial
//! semantics, and registers the ongoing watchers. A missing board is fatal
//! for the whole retrofit (the caller surfaces it to the user); a missing
//! panel or keyboard only disables that feature and the rest keeps working.

use std::fmt;

use tracing::{info, warn};

use crate::annotate::{Annotation, Role, annotate};
use crate::core::attrs::{self, class};
use crate::runtime::{Runtime, WatcherKind};
use crate::tree::{NodeId, ObservableTree};
use crate::watch::tile;

/// Faults that abort the initial setup sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The game board could not be located; the page structure must have
    /// changed and nothing useful can be retrofitted.
    BoardMissing,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoardMissing => {
                write!(f, "could not find the game board element; the page structure has changed")
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Run the full one-shot setup: board, game-panel watcher, keyboard.
///
/// Nothing is registered before the board succeeds, so a failure never
/// leaves watchers dangling over a half-annotated page.
///
/// # Errors
///
/// Returns [`SetupError::BoardMissing`] when the board anchor is absent.
pub fn apply_fixes<T: ObservableTree + 'static>(rt: &mut Runtime<T>) -> Result<(), SetupError> {
    let board = create_game_board(rt.tree_mut())?;
    rt.begin_watching(Some(board), WatcherKind::Board);

    let panel = rt.tree().query_class_prefix(None, class::GAME);
    if panel.is_none() {
        warn!("game panel not found; overlay and toast handling disabled");
    }
    rt.begin_watching(panel, WatcherKind::GamePage);

    setup_keyboard(rt);
    Ok(())
}

/// Turn the board into an announced table and give every tile its initial
/// label, cell wrapper, and live-region marker.
///
/// # Errors
///
/// Returns [`SetupError::BoardMissing`] when no board anchor exists.
pub fn create_game_board<T: ObservableTree>(tree: &mut T) -> Result<NodeId, SetupError> {
    let board = tree
        .query_class_prefix(None, class::BOARD)
        .ok_or(SetupError::BoardMissing)?;
    annotate(tree, board, &Annotation::new().role(Role::Table));

    let rows = tree.query_all_class_prefix(Some(board), class::ROW);
    if rows.is_empty() {
        warn!("board has no rows yet");
    }
    for row in rows {
        annotate(tree, row, &Annotation::new().role(Role::Row));
    }

    for tile_node in tree.query_all_class_prefix(Some(board), class::TILE) {
        annotate(tree, tile_node, &Annotation::new().role(Role::Tile));
        // The wrapper div around each tile is otherwise empty; it carries
        // the cell role and mirrors the tile's name.
        if let Some(slot) = tree.parent(tile_node) {
            annotate(tree, slot, &Annotation::new().role(Role::Cell));
        }
        tile::reconcile(tree, tile_node);
    }

    info!("game board annotated");
    Ok(board)
}

/// Announce the keyboard as a group and register every key for composite
/// relabeling. Absent keyboard skips the feature.
fn setup_keyboard<T: ObservableTree + 'static>(rt: &mut Runtime<T>) {
    let Some(keyboard) = rt.tree().query_class_prefix(None, class::KEYBOARD) else {
        warn!("keyboard not found; key labeling disabled");
        return;
    };
    annotate(
        rt.tree_mut(),
        keyboard,
        &Annotation::new().role(Role::Group).label("Keyboard"),
    );

    let keys = rt.tree().query_all_class_prefix(Some(keyboard), class::KEY);
    info!(count = keys.len(), "watching keyboard keys");
    for key in keys {
        rt.begin_watching(Some(key), WatcherKind::Key);
    }

    // The backspace key renders only an icon; give it a spoken name.
    match rt.tree().query_by_attribute(Some(keyboard), attrs::DATA_KEY, "←") {
        Some(backspace) => {
            annotate(rt.tree_mut(), backspace, &Annotation::new().label("backspace"));
        }
        None => warn!("backspace key not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    fn minimal_page(with_panel: bool, with_keyboard: bool) -> MemoryTree {
        let mut tree = MemoryTree::new();
        let root = tree.root();
        let parent = if with_panel {
            let panel = tree.create_element("div", "App-module_game_t");
            tree.append_child(root, panel);
            panel
        } else {
            root
        };

        let board = tree.create_element("div", "Board-module_board_t");
        tree.append_child(parent, board);
        let row = tree.create_element("div", "Row-module_row_t");
        tree.append_child(board, row);
        for _ in 0..5 {
            let slot = tree.create_element("div", "");
            let tile = tree.create_element("div", "Tile-module_tile_t");
            tree.append_child(row, slot);
            tree.append_child(slot, tile);
        }

        if with_keyboard {
            let keyboard = tree.create_element("div", "Keyboard-module_keyboard_t");
            tree.append_child(parent, keyboard);
            for letter in ["q", "w"] {
                let key = tree.create_element("button", "Key-module_key_t");
                tree.set_attribute(key, "data-key", letter);
                tree.append_child(keyboard, key);
            }
            let backspace = tree.create_element("button", "Key-module_key_t");
            tree.set_attribute(backspace, "data-key", "←");
            tree.append_child(keyboard, backspace);
        }

        tree.take_records();
        tree
    }

    #[test]
    fn missing_board_is_fatal_and_registers_nothing() {
        let tree = MemoryTree::new();
        let mut rt = Runtime::new(tree);
        assert_eq!(apply_fixes(&mut rt), Err(SetupError::BoardMissing));
        assert_eq!(rt.subscription_count(), 0);
    }

    #[test]
    fn board_becomes_a_table_of_labeled_cells() {
        let mut tree = minimal_page(true, false);
        create_game_board(&mut tree).unwrap();

        let board = tree.query_class_prefix(None, "Board-module_board_").unwrap();
        assert_eq!(tree.attribute(board, "role").as_deref(), Some("table"));

        let row = tree.query_class_prefix(None, "Row-module_row_").unwrap();
        assert_eq!(tree.attribute(row, "role").as_deref(), Some("row"));

        for tile in tree.query_all_class_prefix(None, "Tile-module_tile_") {
            assert_eq!(tree.attribute(tile, "role").as_deref(), Some("img"));
            assert_eq!(tree.attribute(tile, "aria-label").as_deref(), Some("Blank"));
            assert_eq!(tree.attribute(tile, "aria-live").as_deref(), Some("polite"));
            let slot = tree.parent(tile).unwrap();
            assert_eq!(tree.attribute(slot, "role").as_deref(), Some("cell"));
            assert_eq!(tree.attribute(slot, "aria-label").as_deref(), Some("Blank"));
        }
    }

    #[test]
    fn missing_panel_and_keyboard_degrade_to_board_only() {
        let tree = minimal_page(false, false);
        let mut rt = Runtime::new(tree);
        apply_fixes(&mut rt).unwrap();
        // Board watcher only: panel and keyboard features were skipped
        assert_eq!(rt.subscription_count(), 1);
    }

    #[test]
    fn full_page_registers_board_panel_and_keys() {
        let tree = minimal_page(true, true);
        let mut rt = Runtime::new(tree);
        apply_fixes(&mut rt).unwrap();
        // Board + panel + three keys
        assert_eq!(rt.subscription_count(), 5);

        let keyboard = rt
            .tree()
            .query_class_prefix(None, "Keyboard-module_keyboard_")
            .unwrap();
        assert_eq!(rt.tree().attribute(keyboard, "role").as_deref(), Some("group"));
        assert_eq!(
            rt.tree().attribute(keyboard, "aria-label").as_deref(),
            Some("Keyboard")
        );

        let backspace = rt.tree().query_by_attribute(None, "data-key", "←").unwrap();
        assert_eq!(
            rt.tree().attribute(backspace, "aria-label").as_deref(),
            Some("backspace")
        );
    }
}
