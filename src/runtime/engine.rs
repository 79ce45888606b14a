//! Watcher subscriptions and batch delivery
//!
//! [`Runtime`] owns the observed tree, the timer queue, and the registered
//! watcher subscriptions. Mutation records drained from the tree are routed
//! to each subscription whose scope covers them, in occurrence order. Writes
//! a watcher performs during delivery are journaled like any other mutation
//! and show up in the next delivery cycle; termination relies on every
//! reconciliation path being equality-guarded, not on suppression.

use tracing::{debug, warn};

use super::scheduler::Scheduler;
use crate::tree::{ChangeNotification, MemoryTree, NodeId, ObservableTree, ObserveScope};
use crate::watch::{GamePageWatcher, KeyWatcher, TileWatcher, ToggleWatcher, toggle};

/// Receives change batches for one subscription.
pub trait Watcher<T: ObservableTree> {
    /// Handle one delivered batch. Notifications appear in occurrence order.
    fn on_batch(
        &mut self,
        tree: &mut T,
        scheduler: &mut Scheduler<T>,
        batch: &[ChangeNotification],
    );
}

/// The concerns an element can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherKind {
    /// Board subtree: tile relabeling on evaluation changes.
    Board,
    /// Single keyboard key: composite relabeling on attribute churn.
    Key,
    /// Toggle control: checkbox semantics from the `checked` presence flag.
    Toggle,
    /// Whole game panel: debounced structural + attribute handling.
    GamePage,
}

struct Subscription<T: ObservableTree> {
    root: NodeId,
    scope: ObserveScope,
    watcher: Box<dyn Watcher<T>>,
    /// Journal position at registration; earlier mutations are never
    /// delivered here.
    start_seq: u64,
}

/// Single-threaded engine binding a tree, a scheduler, and watchers.
///
/// Subscriptions live for the page session; there is no teardown.
pub struct Runtime<T: ObservableTree = MemoryTree> {
    tree: T,
    scheduler: Scheduler<T>,
    subscriptions: Vec<Subscription<T>>,
    settle_ms: u64,
}

impl<T: ObservableTree + 'static> Runtime<T> {
    pub fn new(tree: T) -> Self {
        Self {
            tree,
            scheduler: Scheduler::new(),
            subscriptions: Vec::new(),
            settle_ms: GamePageWatcher::DEFAULT_SETTLE_MS,
        }
    }

    #[must_use]
    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Override the game-panel settle delay for subsequently registered
    /// watchers.
    pub fn set_settle_ms(&mut self, settle_ms: u64) {
        self.settle_ms = settle_ms;
    }

    /// Register a watcher over `root` with the given scope. Only mutations
    /// from this point on are delivered to it.
    pub fn subscribe(&mut self, root: NodeId, scope: ObserveScope, watcher: impl Watcher<T> + 'static) {
        self.subscriptions.push(Subscription {
            root,
            scope,
            watcher: Box::new(watcher),
            start_seq: self.tree.journal_seq(),
        });
    }

    /// Register ongoing observation of an element found by discovery.
    ///
    /// Discovery may come up empty; an absent element logs a diagnostic and
    /// skips the feature so the rest of the retrofit keeps working.
    pub fn begin_watching(&mut self, node: Option<NodeId>, kind: WatcherKind) {
        let Some(node) = node else {
            warn!(?kind, "no element to watch; feature skipped");
            return;
        };
        match kind {
            WatcherKind::Board => {
                self.subscribe(node, ObserveScope::subtree_attributes(), TileWatcher);
            }
            WatcherKind::Key => {
                self.subscribe(node, ObserveScope::control(), KeyWatcher);
            }
            WatcherKind::Toggle => {
                toggle::register(&mut self.tree, node);
                self.subscribe(node, ObserveScope::control(), ToggleWatcher);
            }
            WatcherKind::GamePage => {
                let watcher = GamePageWatcher::new(self.settle_ms);
                self.subscribe(node, ObserveScope::panel(), watcher);
            }
        }
    }

    /// Drain the mutation journal and deliver one batch to every matching
    /// subscription. Returns whether anything was delivered.
    pub fn deliver(&mut self) -> bool {
        let records = self.tree.take_records();
        if records.is_empty() {
            return false;
        }
        debug!(count = records.len(), "delivering change batch");
        let base_seq = self.tree.journal_seq() - records.len() as u64;
        for sub in &mut self.subscriptions {
            let batch: Vec<ChangeNotification> = records
                .iter()
                .enumerate()
                .filter(|&(i, r)| {
                    base_seq + i as u64 >= sub.start_seq
                        && sub.scope.covers(r.kind)
                        && (r.target == sub.root
                            || (sub.scope.subtree && self.tree.contains(sub.root, r.target)))
                })
                .map(|(_, r)| r.clone())
                .map(|mut r| {
                    if !sub.scope.attribute_old_value {
                        r.old_value = None;
                    }
                    r
                })
                .collect();
            if !batch.is_empty() {
                sub.watcher
                    .on_batch(&mut self.tree, &mut self.scheduler, &batch);
            }
        }
        true
    }

    /// Alternate delivery and due timers until both are exhausted, jumping
    /// the virtual clock to each next deadline.
    pub fn run_until_idle(&mut self) {
        loop {
            while self.deliver() {}
            let Some(run) = self.scheduler.pop_next() else {
                break;
            };
            run(&mut self.tree);
        }
    }

    /// Advance the virtual clock by `ms`, delivering batches and running the
    /// timers that come due on the way.
    pub fn advance(&mut self, ms: u64) {
        let target = self.scheduler.now().saturating_add(ms);
        loop {
            while self.deliver() {}
            let Some(run) = self.scheduler.pop_due(target) else {
                break;
            };
            run(&mut self.tree);
        }
        self.scheduler.advance_clock_to(target);
    }
}
