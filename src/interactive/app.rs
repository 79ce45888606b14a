//! TUI application state and logic
//!
//! Plays the simulated game live and shows, next to the visible board, what
//! the retrofit announces to a screen reader: derived tile names, toast
//! utterances, focus moves, and toggle states.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

use crate::annotate::{ActivationKey, dispatch_key};
use crate::core::attrs;
use crate::output::formatters::utterance;
use crate::runtime::{Runtime, WatcherKind};
use crate::setup::{self, SetupError};
use crate::sim::{Announcer, GameSim, build_page, random_target};
use crate::tree::{MemoryTree, NodeId, ObservableTree};

const FEED_LIMIT: usize = 30;

/// One tile as the renderer needs it: what is visible and what is spoken.
#[derive(Debug, Clone)]
pub struct TileView {
    pub letter: Option<String>,
    pub status: Option<String>,
    pub label: String,
}

/// Application state
pub struct App {
    rt: Runtime<MemoryTree>,
    sim: GameSim,
    announcer: Announcer,
    toggles: Vec<NodeId>,
    /// Rolling screen-reader utterance feed.
    pub feed: Vec<String>,
    pub should_quit: bool,
}

impl App {
    /// Build the page, bootstrap the retrofit, and settle the initial state.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] when the retrofit cannot bootstrap.
    pub fn new(settle_ms: u64) -> Result<Self, SetupError> {
        let mut tree = MemoryTree::new();
        let handles = build_page(&mut tree);
        let toggles = handles.toggles.clone();
        let target = random_target(&mut rand::rng());
        let sim = GameSim::new(&tree, handles, target);

        let mut rt = Runtime::new(tree);
        rt.set_settle_ms(settle_ms);
        setup::apply_fixes(&mut rt)?;
        for &toggle in &toggles {
            rt.begin_watching(Some(toggle), WatcherKind::Toggle);
        }
        rt.run_until_idle();

        let mut announcer = Announcer::new();
        announcer.prime(rt.tree());

        Ok(Self {
            rt,
            sim,
            announcer,
            toggles,
            feed: vec!["(screen reader ready)".to_string()],
            should_quit: false,
        })
    }

    /// Settle pending work and voice whatever changed.
    fn settle(&mut self) {
        self.rt.run_until_idle();
        self.sim.process_clicks(self.rt.tree_mut());
        self.rt.run_until_idle();

        for text in self.announcer.poll(self.rt.tree()) {
            self.feed.push(utterance(&text));
        }
        if self.feed.len() > FEED_LIMIT {
            let excess = self.feed.len() - FEED_LIMIT;
            self.feed.drain(..excess);
        }
    }

    pub fn type_letter(&mut self, ch: char) {
        self.sim.type_letter(self.rt.tree_mut(), ch);
        self.settle();
    }

    pub fn backspace(&mut self) {
        self.sim.backspace(self.rt.tree_mut());
        self.settle();
    }

    pub fn submit(&mut self) {
        self.sim.submit(self.rt.tree_mut());
        self.settle();
    }

    pub fn open_help(&mut self) {
        self.sim.open_help(self.rt.tree_mut());
        self.settle();
    }

    /// Native activation of whatever holds focus (the overlay close button).
    pub fn activate_focused(&mut self) {
        if let Some(focused) = self.rt.tree().focused() {
            self.rt.tree_mut().click(focused);
        }
        self.settle();
    }

    /// Synthesized keyboard activation of a settings toggle.
    pub fn toggle_setting(&mut self, index: usize) {
        if let Some(&toggle) = self.toggles.get(index) {
            dispatch_key(self.rt.tree_mut(), toggle, ActivationKey::Space);
        }
        self.settle();
    }

    #[must_use]
    pub fn help_open(&self) -> bool {
        self.sim.help_open()
    }

    #[must_use]
    pub fn finished(&self) -> bool {
        self.sim.finished()
    }

    /// Target word, revealed only once the game is over.
    #[must_use]
    pub fn revealed_target(&self) -> Option<String> {
        self.sim
            .finished()
            .then(|| self.sim.target().to_uppercase())
    }

    /// Board state for rendering, row by row.
    #[must_use]
    pub fn board_rows(&self) -> Vec<Vec<TileView>> {
        let tree = self.rt.tree();
        self.sim
            .handles()
            .tiles
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&tile| TileView {
                        letter: tree.attribute(tile, attrs::LETTER),
                        status: tree.attribute(tile, attrs::DATA_STATE),
                        label: tree.attribute(tile, attrs::ARIA_LABEL).unwrap_or_default(),
                    })
                    .collect()
            })
            .collect()
    }

    /// Settings toggles as (name, announced state).
    #[must_use]
    pub fn toggle_views(&self) -> Vec<(String, String)> {
        let tree = self.rt.tree();
        self.toggles
            .iter()
            .map(|&toggle| {
                (
                    tree.attribute(toggle, attrs::NAME).unwrap_or_default(),
                    tree.attribute(toggle, attrs::ARIA_CHECKED).unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Human-readable description of the focused element.
    #[must_use]
    pub fn focused_description(&self) -> Option<String> {
        let tree = self.rt.tree();
        let focused = tree.focused()?;
        let label = tree
            .attribute(focused, attrs::ARIA_LABEL)
            .unwrap_or_else(|| "(unnamed)".to_string());
        Some(format!("{} \"{label}\"", tree.tag(focused)))
    }
}

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if terminal setup/cleanup fails or if there's an I/O
/// error during rendering or event handling.
pub fn run_tui(app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| super::rendering::ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            // Only process key press events (avoids double input on Windows)
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true;
                }
                KeyCode::Esc => {
                    if app.help_open() {
                        app.activate_focused();
                    } else {
                        app.should_quit = true;
                    }
                }
                KeyCode::F(1) => {
                    app.open_help();
                }
                KeyCode::F(2) => {
                    app.toggle_setting(0);
                }
                KeyCode::F(3) => {
                    app.toggle_setting(1);
                }
                KeyCode::Enter => {
                    if app.help_open() {
                        app.activate_focused();
                    } else {
                        app.submit();
                    }
                }
                KeyCode::Backspace => {
                    app.backspace();
                }
                KeyCode::Char(ch) if ch.is_ascii_alphabetic() && !app.help_open() => {
                    app.type_letter(ch);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
