//! Bulk actions on a bundle or a date section.
//!
//! The host has no API for acting on a set of messages, so a bulk action
//! drives the host's own controls: it checks every target row, waits until
//! the host enables the matching toolbar button, and then plays the pointer
//! events that activate it.

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::dom::{MailDom, ToolbarControl, ACTIVATION_SEQUENCE};
use crate::domain::RowId;

/// What a bulk action does with its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Archive,
    Delete,
    /// Only selects the rows.
    Select,
}

impl BulkAction {
    /// The toolbar control the action ends on, if any.
    pub fn control(self) -> Option<ToolbarControl> {
        match self {
            BulkAction::Archive => Some(ToolbarControl::Archive),
            BulkAction::Delete => Some(ToolbarControl::Delete),
            BulkAction::Select => None,
        }
    }
}

/// The rows a bulk action applies to.
#[derive(Debug, Clone, Copy)]
pub enum BulkTarget<'a> {
    /// A bundle's members, gated by the header's enablement.
    Bundle {
        header: &'a RowId,
        members: &'a [RowId],
    },
    /// The messages in a date section.
    Section(&'a [RowId]),
}

impl<'a> BulkTarget<'a> {
    fn rows(&self) -> &'a [RowId] {
        match *self {
            BulkTarget::Bundle { members, .. } => members,
            BulkTarget::Section(rows) => rows,
        }
    }
}

/// Enablement of the host's toolbar controls, as reported by a watcher on
/// the toolbar.
#[derive(Debug, Clone)]
pub struct ToolbarSignals {
    archive: watch::Receiver<bool>,
    delete: watch::Receiver<bool>,
}

impl ToolbarSignals {
    pub fn new(archive: watch::Receiver<bool>, delete: watch::Receiver<bool>) -> Self {
        Self { archive, delete }
    }

    fn receiver(&mut self, control: ToolbarControl) -> &mut watch::Receiver<bool> {
        match control {
            ToolbarControl::Archive => &mut self.archive,
            ToolbarControl::Delete => &mut self.delete,
        }
    }
}

/// Runs `action` on `target`. Returns whether the action went through.
pub async fn run<D: MailDom + ?Sized>(
    dom: &mut D,
    action: BulkAction,
    target: BulkTarget<'_>,
    toolbar: &mut ToolbarSignals,
) -> bool {
    if let BulkTarget::Bundle { header, .. } = target {
        if !dom.bulk_actions_enabled(header) {
            return false;
        }
    }

    select_rows(dom, target.rows());

    let Some(control) = action.control() else {
        return true;
    };

    if toolbar.receiver(control).wait_for(|enabled| *enabled).await.is_err() {
        warn!(?control, "toolbar went away before the control was enabled");
        return false;
    }

    for event in ACTIVATION_SEQUENCE {
        dom.dispatch(control, event);
    }
    debug!(?action, rows = target.rows().len(), "bulk action dispatched");
    true
}

/// Checks every unchecked row, last row first.
fn select_rows<D: MailDom + ?Sized>(dom: &mut D, rows: &[RowId]) {
    for row in rows.iter().rev() {
        if !dom.is_checked(row) {
            dom.click_checkbox(row);
        }
    }
}
