//! Scripted walkthrough
//!
//! Plays a fixed session against the simulated page and records, per step,
//! what a screen reader would have announced and where focus went. The
//! script exercises every watcher: tile relabeling, toast and overlay
//! handling, toggle activation, and the keyboard group.

use crate::annotate::{ActivationKey, dispatch_key};
use crate::core::attrs;
use crate::runtime::{Runtime, WatcherKind};
use crate::setup::{self, SetupError};
use crate::sim::{Announcer, GameSim, build_page};
use crate::tree::{MemoryTree, NodeId, ObservableTree};

/// One scripted action and what it produced.
#[derive(Debug, Clone)]
pub struct DemoStep {
    pub action: String,
    pub announcements: Vec<String>,
    pub focused: Option<String>,
}

/// Full transcript of the walkthrough.
#[derive(Debug)]
pub struct DemoReport {
    pub target: String,
    pub steps: Vec<DemoStep>,
    /// Final accessible names of the board, row by row.
    pub board_labels: Vec<Vec<String>>,
    /// Final evaluation statuses, row by row (None for untouched tiles).
    pub board_statuses: Vec<Vec<Option<String>>>,
    /// Final (name, announced checked state) of each settings toggle.
    pub toggles: Vec<(String, String)>,
}

/// Run the scripted session.
///
/// # Errors
///
/// Returns a [`SetupError`] when the retrofit cannot bootstrap.
pub fn run_demo(settle_ms: u64) -> Result<DemoReport, SetupError> {
    let target = "slate";
    let mut tree = MemoryTree::new();
    let handles = build_page(&mut tree);
    let toggles = handles.toggles.clone();
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

    let mut session = Session {
        rt,
        sim,
        announcer,
        steps: Vec::new(),
    };

    session.step("Type C R A N E", |rt, sim| {
        for ch in "crane".chars() {
            sim.type_letter(rt.tree_mut(), ch);
        }
    });
    session.step("Submit the guess", |rt, sim| {
        sim.submit(rt.tree_mut());
    });
    session.step("Open the help overlay", |rt, sim| {
        sim.open_help(rt.tree_mut());
    });
    session.step("Activate the focused close control", |rt, _| {
        // A native button: activation is a plain click on the focused node
        if let Some(focused) = rt.tree().focused() {
            rt.tree_mut().click(focused);
        }
    });
    session.step("Press Space on the Hard Mode toggle", |rt, _| {
        let toggle = toggles[0];
        dispatch_key(rt.tree_mut(), toggle, ActivationKey::Space);
    });
    session.step("Type and submit S L A T E", |rt, sim| {
        for ch in "slate".chars() {
            sim.type_letter(rt.tree_mut(), ch);
        }
        sim.submit(rt.tree_mut());
    });

    Ok(session.into_report(target))
}

struct Session {
    rt: Runtime<MemoryTree>,
    sim: GameSim,
    announcer: Announcer,
    steps: Vec<DemoStep>,
}

impl Session {
    /// Perform one action, settle the page, and record the outcome.
    fn step(&mut self, action: &str, run: impl FnOnce(&mut Runtime<MemoryTree>, &mut GameSim)) {
        run(&mut self.rt, &mut self.sim);
        self.rt.run_until_idle();
        self.sim.process_clicks(self.rt.tree_mut());
        self.rt.run_until_idle();

        self.steps.push(DemoStep {
            action: action.to_string(),
            announcements: self.announcer.poll(self.rt.tree()),
            focused: describe(self.rt.tree(), self.rt.tree().focused()),
        });
    }

    fn into_report(self, target: &str) -> DemoReport {
        let tree = self.rt.tree();
        let board_labels = self
            .sim
            .handles()
            .tiles
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&tile| tree.attribute(tile, attrs::ARIA_LABEL).unwrap_or_default())
                    .collect()
            })
            .collect();
        let board_statuses = self
            .sim
            .handles()
            .tiles
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&tile| tree.attribute(tile, attrs::DATA_STATE))
                    .collect()
            })
            .collect();
        let toggles = self
            .sim
            .handles()
            .toggles
            .iter()
            .map(|&toggle| {
                (
                    tree.attribute(toggle, attrs::NAME).unwrap_or_default(),
                    tree.attribute(toggle, attrs::ARIA_CHECKED).unwrap_or_default(),
                )
            })
            .collect();

        DemoReport {
            target: target.to_string(),
            steps: self.steps,
            board_labels,
            board_statuses,
            toggles,
        }
    }
}

fn describe(tree: &MemoryTree, node: Option<NodeId>) -> Option<String> {
    let node = node?;
    let label = tree
        .attribute(node, attrs::ARIA_LABEL)
        .unwrap_or_else(|| "(unnamed)".to_string());
    Some(format!("{} \"{label}\"", tree.tag(node)))
}
