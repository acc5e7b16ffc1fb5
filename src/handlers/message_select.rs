//! Class changes on individual message rows.
//!
//! The host rewrites a row's class list when it applies its own selection
//! styling, which drops the bundling marker classes. Those are put back, and
//! a flipped selection restyles the owning bundle headers.

use tracing::trace;

use crate::bundling::{styler, BundledMail, SelectiveBundling};
use crate::dom::{classes, MailDom};
use crate::domain::{PageKey, RowId};

/// A class attribute mutation reported by a per-row watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassChange {
    /// The mutated row.
    pub row: RowId,
    /// The class list before the mutation.
    pub old_classes: String,
}

impl ClassChange {
    pub fn new(row: impl Into<RowId>, old_classes: impl Into<String>) -> Self {
        Self {
            row: row.into(),
            old_classes: old_classes.into(),
        }
    }

    fn had(&self, class: &str) -> bool {
        self.old_classes.split_whitespace().any(|c| c == class)
    }
}

/// Restores stripped marker classes and restyles bundles on selection flips.
pub fn handle_class_change<D: MailDom + ?Sized>(
    dom: &mut D,
    mail: &BundledMail,
    key: &PageKey,
    policy: &SelectiveBundling,
    change: &ClassChange,
) {
    let row = &change.row;

    if change.had(classes::BUNDLED_MESSAGE) && !dom.has_class(row, classes::BUNDLED_MESSAGE) {
        for class in [classes::BUNDLED_MESSAGE, classes::VISIBLE, classes::LAST] {
            if change.had(class) {
                dom.add_class(row, class);
            }
        }
        trace!(%row, "restored bundling classes");
    }

    if change.had(classes::SELECTED) == dom.has_class(row, classes::SELECTED) {
        return;
    }

    let (Some(message), Some(page)) = (dom.message_row(row), mail.page(key)) else {
        return;
    };
    let labels = policy.filter_titles(&message.labels);
    styler::mark_selected_bundles_for(dom, page, &labels);
    styler::update_bulk_actions(dom, page);
}
