//! Mutation watchers.
//!
//! The platform delivers mutation records as events to the coordinator; the
//! traits here only control whether a watcher is armed. A watcher that sees
//! the bundler's own writes would trigger another cycle, so every write pass
//! runs inside a [`PauseGuard`].

use std::fmt;

use crate::domain::RowId;

/// A single mutation watcher that can be armed and disarmed.
pub trait Watcher {
    /// Starts (or resumes) watching.
    fn observe(&mut self);

    /// Stops watching. Mutations made while disconnected are never reported.
    fn disconnect(&mut self);

    /// Whether the watcher is currently armed.
    fn is_observing(&self) -> bool;
}

/// One attribute watcher per rendered message row.
pub trait MessageWatchers {
    /// Starts watching class changes on the given rows, replacing any
    /// previous set.
    fn watch(&mut self, rows: &[RowId]);

    /// Stops watching every row.
    fn unwatch_all(&mut self);
}

/// Disconnects a watcher for its lifetime and re-arms it on drop.
///
/// Re-arming on drop also covers a cycle that returns early with an error.
pub struct PauseGuard<'a> {
    watcher: &'a mut dyn Watcher,
}

impl<'a> PauseGuard<'a> {
    /// Disconnects `watcher` until the guard is dropped.
    pub fn new(watcher: &'a mut dyn Watcher) -> Self {
        watcher.disconnect();
        Self { watcher }
    }
}

impl Drop for PauseGuard<'_> {
    fn drop(&mut self) {
        self.watcher.observe();
    }
}

/// The full set of watchers the coordinator drives.
pub struct Watchers {
    /// Child-list changes on the inbox message list container.
    pub message_list: Box<dyn Watcher>,
    /// Child-list changes on the starred page's list body.
    pub pinned_list: Box<dyn Watcher>,
    /// `role` attribute changes under the main area's parent (view switches).
    pub main_parent: Box<dyn Watcher>,
    /// Attribute changes on the inbox tab panels (tab switches).
    pub tab_panels: Box<dyn Watcher>,
    /// Class changes on individual message rows.
    pub messages: Box<dyn MessageWatchers>,
}

impl fmt::Debug for Watchers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watchers")
            .field("message_list", &self.message_list.is_observing())
            .field("pinned_list", &self.pinned_list.is_observing())
            .field("main_parent", &self.main_parent.is_observing())
            .field("tab_panels", &self.tab_panels.is_observing())
            .finish()
    }
}
