//! Wordle Accessibility Retrofit
//!
//! Observes structural and attribute mutations on a Wordle-style game page
//! and keeps a parallel set of accessibility annotations (roles, accessible
//! names, live-region markers) consistent with the visible game state, so
//! screen readers can follow along. The page is seen through an abstract
//! observable-tree capability; an in-memory tree backs the simulator and the
//! tests.
//!
//! # Quick Start
//!
//! ```rust
//! use wordle_a11y::runtime::{Runtime, WatcherKind};
//! use wordle_a11y::tree::{MemoryTree, ObservableTree};
//!
//! // A minimal board: one tile inside its cell wrapper
//! let mut tree = MemoryTree::new();
//! let board = tree.create_element("div", "Board-module_board_1");
//! let slot = tree.create_element("div", "");
//! let tile = tree.create_element("div", "Tile-module_tile_1");
//! let root = tree.root();
//! tree.append_child(root, board);
//! tree.append_child(board, slot);
//! tree.append_child(slot, tile);
//!
//! let mut rt = Runtime::new(tree);
//! rt.begin_watching(Some(board), WatcherKind::Board);
//!
//! // The game reveals a guess; the watcher re-derives the spoken name
//! rt.tree_mut().set_attribute(tile, "letter", "S");
//! rt.tree_mut().set_attribute(tile, "data-state", "absent");
//! rt.run_until_idle();
//!
//! assert_eq!(
//!     rt.tree().attribute(tile, "aria-label").as_deref(),
//!     Some("S absent")
//! );
//! ```

// Element annotator
pub mod annotate;

// Pure label derivations and attribute vocabulary
pub mod core;

// Observable tree capability and in-memory implementation
pub mod tree;

// Event loop: scheduler, subscriptions, batch delivery
pub mod runtime;

// Change watchers
pub mod watch;

// One-shot bootstrap and discovery
pub mod setup;

// Simulated game page (environment side)
pub mod sim;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;
