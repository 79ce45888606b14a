//! Game driver
//!
//! Plays the game by mutating the fake page exactly the way the real one
//! does: typing stamps `letter` attributes, submitting a guess evaluates it
//! against the target and stamps `data-state` on tiles and `evaluation` on
//! keys, rejected guesses raise a toast, and the help overlay comes and goes
//! as a subtree. Clicks recorded by the tree are interpreted here.

use rand::Rng;
use rand::prelude::IndexedRandom;
use rustc_hash::FxHashMap;

use super::page::{BOARD_COLS, BOARD_ROWS, PageHandles};
use crate::core::attrs::{self, class};
use crate::tree::{MemoryTree, NodeId, ObservableTree};

/// Evaluation of one guessed letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileStatus {
    Correct,
    Present,
    Absent,
}

impl TileStatus {
    /// The value the page writes into `data-state`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }

    /// Precedence when merging onto a key: a key that was ever correct
    /// stays correct.
    const fn rank(self) -> u8 {
        match self {
            Self::Correct => 2,
            Self::Present => 1,
            Self::Absent => 0,
        }
    }
}

/// Evaluate a guess against the target with Wordle's duplicate-letter rules.
///
/// First pass marks exact matches and removes them from the available pool;
/// second pass marks present-but-misplaced letters from what remains.
///
/// # Panics
/// Debug-asserts that both words are exactly [`BOARD_COLS`] letters.
#[must_use]
pub fn evaluate(guess: &str, target: &str) -> [TileStatus; BOARD_COLS] {
    let guess: Vec<char> = guess.chars().collect();
    let target: Vec<char> = target.chars().collect();
    debug_assert_eq!(guess.len(), BOARD_COLS);
    debug_assert_eq!(target.len(), BOARD_COLS);

    let mut result = [TileStatus::Absent; BOARD_COLS];
    let mut available: FxHashMap<char, usize> = FxHashMap::default();
    for &ch in &target {
        *available.entry(ch).or_insert(0) += 1;
    }

    for i in 0..BOARD_COLS {
        if guess[i] == target[i] {
            result[i] = TileStatus::Correct;
            if let Some(count) = available.get_mut(&guess[i]) {
                *count = count.saturating_sub(1);
            }
        }
    }

    for i in 0..BOARD_COLS {
        if result[i] == TileStatus::Correct {
            continue;
        }
        if let Some(count) = available.get_mut(&guess[i])
            && *count > 0
        {
            result[i] = TileStatus::Present;
            *count -= 1;
        }
    }

    result
}

/// Answer words the simulator draws from.
pub const TARGETS: [&str; 16] = [
    "slate", "crane", "audio", "pride", "shine", "gloat", "mercy", "vivid", "knoll", "frame",
    "quart", "bliss", "elder", "teach", "surge", "pivot",
];

/// Pick a random target word.
pub fn random_target<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TARGETS.choose(rng).copied().unwrap_or(TARGETS[0])
}

/// Result of submitting the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Fewer than five letters typed; a toast was raised instead.
    NotEnoughLetters,
    /// Row evaluated, game continues.
    Accepted,
    /// Row evaluated and matched the target.
    Won,
    /// Row evaluated, no rows remain.
    Lost,
    /// The game already ended; nothing happened.
    Finished,
}

/// Drives one game session against the fake page.
pub struct GameSim {
    handles: PageHandles,
    target: String,
    row: usize,
    col: usize,
    finished: bool,
    overlay: Option<NodeId>,
    overlay_close: Option<NodeId>,
    /// Encapsulated switch → its toggle host.
    switch_hosts: FxHashMap<NodeId, NodeId>,
    /// Letter → keyboard key node.
    key_by_letter: FxHashMap<char, NodeId>,
}

impl GameSim {
    /// Bind a driver to a built page.
    #[must_use]
    pub fn new(tree: &MemoryTree, handles: PageHandles, target: &str) -> Self {
        let mut switch_hosts = FxHashMap::default();
        for &toggle in &handles.toggles {
            if let Some(shadow) = tree.shadow_root(toggle)
                && let Some(switch) = tree.query_class_prefix(Some(shadow), class::SWITCH)
            {
                switch_hosts.insert(switch, toggle);
            }
        }

        let mut key_by_letter = FxHashMap::default();
        for &key in &handles.keys {
            if let Some(data_key) = tree.attribute(key, attrs::DATA_KEY) {
                let mut chars = data_key.chars();
                if let (Some(ch), None) = (chars.next(), chars.next())
                    && ch.is_ascii_alphabetic()
                {
                    key_by_letter.insert(ch.to_ascii_lowercase(), key);
                }
            }
        }

        Self {
            handles,
            target: target.to_lowercase(),
            row: 0,
            col: 0,
            finished: false,
            overlay: None,
            overlay_close: None,
            switch_hosts,
            key_by_letter,
        }
    }

    #[must_use]
    pub fn handles(&self) -> &PageHandles {
        &self.handles
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn help_open(&self) -> bool {
        self.overlay.is_some()
    }

    /// Type one letter into the current row.
    pub fn type_letter(&mut self, tree: &mut MemoryTree, ch: char) -> bool {
        if self.finished || self.col == BOARD_COLS || !ch.is_ascii_alphabetic() {
            return false;
        }
        let tile = self.handles.tiles[self.row][self.col];
        tree.set_attribute(tile, attrs::LETTER, &ch.to_ascii_uppercase().to_string());
        self.col += 1;
        true
    }

    /// Delete the last typed letter.
    pub fn backspace(&mut self, tree: &mut MemoryTree) -> bool {
        if self.finished || self.col == 0 {
            return false;
        }
        self.col -= 1;
        let tile = self.handles.tiles[self.row][self.col];
        tree.remove_attribute(tile, attrs::LETTER);
        true
    }

    /// Submit the current row for evaluation.
    pub fn submit(&mut self, tree: &mut MemoryTree) -> SubmitOutcome {
        if self.finished {
            return SubmitOutcome::Finished;
        }
        if self.col < BOARD_COLS {
            self.show_toast(tree, "Not enough letters");
            return SubmitOutcome::NotEnoughLetters;
        }

        let tiles = self.handles.tiles[self.row].clone();
        let guess: String = tiles
            .iter()
            .filter_map(|&tile| tree.attribute(tile, attrs::LETTER))
            .collect::<String>()
            .to_lowercase();
        let statuses = evaluate(&guess, &self.target);

        for (&tile, status) in tiles.iter().zip(statuses) {
            tree.set_attribute(tile, attrs::DATA_STATE, status.as_str());
        }
        for (ch, status) in guess.chars().zip(statuses) {
            self.stamp_key(tree, ch, status);
        }

        self.row += 1;
        self.col = 0;

        if guess == self.target {
            self.finished = true;
            self.show_toast(tree, "Splendid!");
            SubmitOutcome::Won
        } else if self.row == BOARD_ROWS {
            self.finished = true;
            let reveal = self.target.to_uppercase();
            self.show_toast(tree, &reveal);
            SubmitOutcome::Lost
        } else {
            SubmitOutcome::Accepted
        }
    }

    /// Mirror a tile evaluation onto its keyboard key, never downgrading.
    fn stamp_key(&self, tree: &mut MemoryTree, ch: char, status: TileStatus) {
        let Some(&key) = self.key_by_letter.get(&ch) else {
            return;
        };
        let current = tree.attribute(key, attrs::EVALUATION);
        let keep = current
            .as_deref()
            .and_then(status_from_str)
            .is_some_and(|existing| existing.rank() >= status.rank());
        if !keep {
            tree.set_attribute(key, attrs::EVALUATION, status.as_str());
        }
    }

    /// Raise a transient message region under the game panel.
    pub fn show_toast(&mut self, tree: &mut MemoryTree, message: &str) -> NodeId {
        let toast = tree.create_element("div", "Toaster-module_toaster_e9o0c");
        tree.set_attribute(toast, "message", message);
        tree.append_child(self.handles.game, toast);
        toast
    }

    /// Open the help overlay (close control with an icon-only face).
    pub fn open_help(&mut self, tree: &mut MemoryTree) -> NodeId {
        if let Some(overlay) = self.overlay {
            return overlay;
        }
        let overlay = tree.create_element("div", "Page-module_page_abf2e");
        let close = tree.create_element("button", "Page-module_close_17vty");
        let icon = tree.create_element("svg", class::GAME_ICON);
        tree.append_child(close, icon);
        tree.append_child(overlay, close);
        tree.append_child(self.handles.game, overlay);
        self.overlay = Some(overlay);
        self.overlay_close = Some(close);
        overlay
    }

    /// Tear the help overlay down again.
    pub fn close_help(&mut self, tree: &mut MemoryTree) {
        if let Some(overlay) = self.overlay.take() {
            tree.remove_child(self.handles.game, overlay);
        }
        self.overlay_close = None;
    }

    /// Interpret the clicks the tree recorded since the last pass: switch
    /// clicks flip their toggle's presence flag, close clicks dismiss the
    /// overlay.
    pub fn process_clicks(&mut self, tree: &mut MemoryTree) {
        for clicked in tree.take_clicks() {
            let toggle = self
                .switch_hosts
                .get(&clicked)
                .copied()
                .or_else(|| self.handles.toggles.contains(&clicked).then_some(clicked));
            if let Some(toggle) = toggle {
                if tree.has_attribute(toggle, attrs::CHECKED) {
                    tree.remove_attribute(toggle, attrs::CHECKED);
                } else {
                    tree.set_attribute(toggle, attrs::CHECKED, "");
                }
            } else if Some(clicked) == self.overlay_close {
                self.close_help(tree);
            }
        }
    }
}

fn status_from_str(value: &str) -> Option<TileStatus> {
    match value {
        "correct" => Some(TileStatus::Correct),
        "present" => Some(TileStatus::Present),
        "absent" => Some(TileStatus::Absent),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::build_page;

    fn session(target: &str) -> (MemoryTree, GameSim) {
        let mut tree = MemoryTree::new();
        let handles = build_page(&mut tree);
        let sim = GameSim::new(&tree, handles, target);
        (tree, sim)
    }

    fn type_word(sim: &mut GameSim, tree: &mut MemoryTree, word: &str) {
        for ch in word.chars() {
            assert!(sim.type_letter(tree, ch));
        }
    }

    #[test]
    fn evaluate_marks_exact_and_misplaced_letters() {
        use TileStatus::{Absent, Correct};
        // CRANE vs SLATE: A and E are exact, nothing else appears
        assert_eq!(
            evaluate("crane", "slate"),
            [Absent, Absent, Correct, Absent, Correct]
        );
    }

    #[test]
    fn evaluate_handles_duplicates_with_green_priority() {
        use TileStatus::{Absent, Present};
        // SPEED vs ERASE: both E's stay misplaced, S misplaced
        assert_eq!(
            evaluate("speed", "erase"),
            [Present, Absent, Present, Present, Absent]
        );
    }

    #[test]
    fn evaluate_exhausts_the_letter_pool() {
        use TileStatus::{Absent, Correct, Present};
        // ROBOT vs FLOOR: first O misplaced, second O exact, T gone
        assert_eq!(
            evaluate("robot", "floor"),
            [Present, Present, Absent, Correct, Absent]
        );
    }

    #[test]
    fn typing_and_deleting_moves_the_cursor() {
        let (mut tree, mut sim) = session("slate");
        assert!(sim.type_letter(&mut tree, 'c'));
        let tile = sim.handles().tiles[0][0];
        assert_eq!(tree.attribute(tile, "letter").as_deref(), Some("C"));

        assert!(sim.backspace(&mut tree));
        assert_eq!(tree.attribute(tile, "letter"), None);
        assert!(!sim.backspace(&mut tree));
    }

    #[test]
    fn short_guess_raises_a_toast_instead_of_evaluating() {
        let (mut tree, mut sim) = session("slate");
        type_word(&mut sim, &mut tree, "cra");
        assert_eq!(sim.submit(&mut tree), SubmitOutcome::NotEnoughLetters);

        let toast = tree
            .query_class_prefix(None, "Toaster-module")
            .expect("toast raised");
        assert_eq!(
            tree.attribute(toast, "message").as_deref(),
            Some("Not enough letters")
        );
        assert_eq!(tree.attribute(sim.handles().tiles[0][0], "data-state"), None);
    }

    #[test]
    fn submit_stamps_tiles_and_keys() {
        let (mut tree, mut sim) = session("slate");
        type_word(&mut sim, &mut tree, "crane");
        assert_eq!(sim.submit(&mut tree), SubmitOutcome::Accepted);

        let tiles = &sim.handles().tiles[0];
        let states: Vec<_> = tiles
            .iter()
            .map(|&t| tree.attribute(t, "data-state").unwrap())
            .collect();
        assert_eq!(states, vec!["absent", "absent", "correct", "absent", "correct"]);

        let a_key = tree.query_by_attribute(None, "data-key", "a").unwrap();
        assert_eq!(tree.attribute(a_key, "evaluation").as_deref(), Some("correct"));
    }

    #[test]
    fn key_evaluation_never_downgrades() {
        let (mut tree, mut sim) = session("slate");
        type_word(&mut sim, &mut tree, "earns");
        sim.submit(&mut tree);
        let e_key = tree.query_by_attribute(None, "data-key", "e").unwrap();
        let first = tree.attribute(e_key, "evaluation").unwrap();

        // E was misplaced; guessing SLATE later makes it correct, never back
        type_word(&mut sim, &mut tree, "slate");
        sim.submit(&mut tree);
        assert_eq!(first, "present");
        assert_eq!(tree.attribute(e_key, "evaluation").as_deref(), Some("correct"));
    }

    #[test]
    fn winning_guess_finishes_the_game() {
        let (mut tree, mut sim) = session("slate");
        type_word(&mut sim, &mut tree, "slate");
        assert_eq!(sim.submit(&mut tree), SubmitOutcome::Won);
        assert!(sim.finished());
        assert!(!sim.type_letter(&mut tree, 'a'));
        assert_eq!(sim.submit(&mut tree), SubmitOutcome::Finished);
    }

    #[test]
    fn switch_clicks_flip_the_presence_flag() {
        let (mut tree, mut sim) = session("slate");
        let toggle = sim.handles().toggles[0];
        let shadow = tree.shadow_root(toggle).unwrap();
        let switch = tree.query_class_prefix(Some(shadow), "switch").unwrap();

        tree.click(switch);
        sim.process_clicks(&mut tree);
        assert!(tree.has_attribute(toggle, "checked"));

        tree.click(switch);
        sim.process_clicks(&mut tree);
        assert!(!tree.has_attribute(toggle, "checked"));
    }

    #[test]
    fn close_click_dismisses_the_overlay() {
        let (mut tree, mut sim) = session("slate");
        sim.open_help(&mut tree);
        let close = tree
            .query_class_prefix(None, "Page-module_close_")
            .unwrap();

        tree.click(close);
        sim.process_clicks(&mut tree);
        assert!(!sim.help_open());
        assert!(tree.query_class_prefix(None, "Page-module_page_").is_none());
    }
}
