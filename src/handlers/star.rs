//! Scroll anchoring across star and unstar.
//!
//! Starring a bundled message pulls it out of its bundle, unstarring puts it
//! back, and either way the host redraws the list. The row the user was
//! looking at can't be found again after the rebuild, so the open bundle's
//! header stands in for it: on unstar the header is scrolled to where the
//! message was, on star it is kept where it was.

use tracing::trace;

use crate::bundling::{BundledMail, SelectiveBundling};
use crate::dom::MailDom;
use crate::domain::{PageKey, RowId};

/// Which way the star toggle is flipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarToggle {
    Star,
    Unstar,
}

/// Remembers one scroll anchor between a star click and the next cycle.
#[derive(Debug, Default)]
pub struct StarHandler {
    anchor: Option<f64>,
}

impl StarHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an anchor is waiting for the next cycle.
    pub fn has_anchor(&self) -> bool {
        self.anchor.is_some()
    }

    /// Records the anchor before the host reacts to the star click on `row`.
    ///
    /// Unstarring also remembers the message's first bundlable label as the
    /// open bundle, so the next cycle opens the bundle the message lands in.
    pub fn handle_starring<D: MailDom + ?Sized>(
        &mut self,
        dom: &D,
        mail: &mut BundledMail,
        key: &PageKey,
        policy: &SelectiveBundling,
        row: &RowId,
        toggle: StarToggle,
    ) {
        let Some(message) = dom.message_row(row) else {
            return;
        };
        let labels = policy.filter_titles(&message.labels);
        let Some(first) = labels.first() else {
            return;
        };

        let element_top = match toggle {
            StarToggle::Unstar => {
                mail.record_open(*first);
                dom.row_client_top(row)
            }
            StarToggle::Star => open_header(mail, key).and_then(|h| dom.row_client_top(&h)),
        };

        let Some(element_top) = element_top else {
            return;
        };
        let anchor = dom.scroll_top() + dom.scroll_container_top() - element_top;
        trace!(?toggle, %row, anchor, "recorded scroll anchor");
        self.anchor = Some(anchor);
    }

    /// Scrolls the open bundle's header back to the recorded anchor, once.
    pub fn scroll_if_necessary<D: MailDom + ?Sized>(
        &mut self,
        dom: &mut D,
        mail: &BundledMail,
        key: &PageKey,
    ) {
        let Some(anchor) = self.anchor.take() else {
            return;
        };
        let Some(header_top) = open_header(mail, key).and_then(|h| dom.row_client_top(&h)) else {
            return;
        };

        dom.set_scroll_top(anchor + header_top - dom.scroll_container_top());
    }
}

fn open_header(mail: &BundledMail, key: &PageKey) -> Option<RowId> {
    let label = mail.open_label()?;
    mail.bundle(key, label).map(|b| b.header.clone())
}
