//! Single-threaded cooperative runtime
//!
//! All work runs on one event loop: mutation batches are routed to watcher
//! subscriptions, and deferred work (the settle delay of the game-panel
//! watcher) is expressed as timer continuations on a virtual clock. Nothing
//! blocks, nothing is cancelled; overlapping continuations all run, and the
//! equality guards in the reconciliation paths are what keep that safe.

mod engine;
mod scheduler;

pub use engine::{Runtime, Watcher, WatcherKind};
pub use scheduler::Scheduler;
