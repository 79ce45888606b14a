//! Fake page construction
//!
//! Builds the same structure the retrofit discovers on the real page:
//! a game panel holding a 6×5 board of cell-wrapped tiles, an on-screen
//! keyboard, and a settings area with shadow-encapsulated toggle switches.

use crate::core::attrs;
use crate::tree::{MemoryTree, NodeId, ObservableTree};

/// Guess rows on the board.
pub const BOARD_ROWS: usize = 6;
/// Letters per guess.
pub const BOARD_COLS: usize = 5;

const KEY_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Handles to the structural anchors of a freshly built page.
#[derive(Debug)]
pub struct PageHandles {
    pub game: NodeId,
    pub board: NodeId,
    /// Tiles by row, then column.
    pub tiles: Vec<Vec<NodeId>>,
    pub keyboard: NodeId,
    /// Letter keys plus Enter and backspace.
    pub keys: Vec<NodeId>,
    /// Settings toggles, each with an encapsulated switch child.
    pub toggles: Vec<NodeId>,
}

/// Build the simulated page under the tree's document root.
pub fn build_page(tree: &mut MemoryTree) -> PageHandles {
    let root = tree.root();
    let game = tree.create_element("div", "App-module_game_f81ca");
    tree.append_child(root, game);

    let board = tree.create_element("div", "Board-module_board_e5a61");
    tree.append_child(game, board);
    let mut tiles = Vec::with_capacity(BOARD_ROWS);
    for _ in 0..BOARD_ROWS {
        let row = tree.create_element("div", "Row-module_row_20a3b");
        tree.append_child(board, row);
        let mut row_tiles = Vec::with_capacity(BOARD_COLS);
        for _ in 0..BOARD_COLS {
            let slot = tree.create_element("div", "");
            let tile = tree.create_element("div", "Tile-module_tile_71ba9");
            tree.append_child(row, slot);
            tree.append_child(slot, tile);
            row_tiles.push(tile);
        }
        tiles.push(row_tiles);
    }

    let keyboard = tree.create_element("div", "Keyboard-module_keyboard_c4b52");
    tree.append_child(game, keyboard);
    let mut keys = Vec::new();
    for key_row in KEY_ROWS {
        for letter in key_row.chars() {
            keys.push(make_key(tree, keyboard, &letter.to_string()));
        }
    }
    keys.push(make_key(tree, keyboard, "↵"));
    keys.push(make_key(tree, keyboard, "←"));

    let settings = tree.create_element("div", "Settings-module_settings_90df1");
    tree.append_child(root, settings);
    let toggles = vec![
        make_toggle(tree, settings, "Hard Mode", false),
        make_toggle(tree, settings, "Dark Theme", true),
    ];

    PageHandles {
        game,
        board,
        tiles,
        keyboard,
        keys,
        toggles,
    }
}

fn make_key(tree: &mut MemoryTree, keyboard: NodeId, data_key: &str) -> NodeId {
    let key = tree.create_element("button", "Key-module_key_49cbf");
    tree.set_attribute(key, attrs::DATA_KEY, data_key);
    tree.append_child(keyboard, key);
    key
}

fn make_toggle(tree: &mut MemoryTree, settings: NodeId, name: &str, checked: bool) -> NodeId {
    let toggle = tree.create_element("game-switch", "");
    tree.set_attribute(toggle, attrs::NAME, name);
    if checked {
        tree.set_attribute(toggle, attrs::CHECKED, "");
    }
    let shadow = tree.attach_shadow(toggle);
    let switch = tree.create_element("div", "switch");
    let knob = tree.create_element("span", "knob");
    tree.append_child(switch, knob);
    tree.append_child(shadow, switch);
    tree.append_child(settings, toggle);
    toggle
}
