//! Shift-click range selection.
//!
//! The host's own shift-click works on document order, which no longer
//! matches what the user sees once rows are reordered. Every real checkbox
//! click is routed through here instead; a shift-click toggles each row
//! whose visual order lies between the two clicks, inclusive, so it matches
//! the state of the previous click.

use tracing::trace;

use crate::dom::MailDom;
use crate::domain::RowId;

/// A click on a message row's checkbox.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxClick {
    /// Row whose checkbox was clicked.
    pub row: RowId,
    /// Whether shift was held.
    pub shift: bool,
    /// Pointer position in client coordinates; synthetic clicks carry none.
    pub pointer: Option<(f64, f64)>,
}

impl CheckboxClick {
    /// A real pointer click.
    pub fn at(row: impl Into<RowId>, x: f64, y: f64) -> Self {
        Self {
            row: row.into(),
            shift: false,
            pointer: Some((x, y)),
        }
    }

    /// Marks the click as shift-held.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    fn is_real(&self) -> bool {
        matches!(self.pointer, Some((x, y)) if x != 0.0 && y != 0.0)
    }
}

#[derive(Debug, Clone)]
struct LastClick {
    row: RowId,
    checked: bool,
}

/// Click history for range selection.
#[derive(Debug, Default)]
pub struct QuickSelect {
    last: Option<LastClick>,
}

impl QuickSelect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a checkbox click. Returns `false` for synthetic clicks, which
    /// are left to the host.
    pub fn handle_click<D: MailDom + ?Sized>(&mut self, dom: &mut D, click: &CheckboxClick) -> bool {
        if !click.is_real() {
            return false;
        }

        let range = match (&self.last, click.shift) {
            (Some(last), true) => order_range(dom, &last.row, &click.row).map(|r| (r, last.checked)),
            _ => None,
        };

        match range {
            Some(((min, max), checked)) => {
                let mut toggled = 0;
                for message in dom.message_rows() {
                    let in_range = dom.order(&message.id).is_some_and(|o| min <= o && o <= max);
                    if in_range && dom.is_checked(&message.id) != checked {
                        dom.click_checkbox(&message.id);
                        toggled += 1;
                    }
                }
                trace!(min, max, checked, toggled, "range selection");
            }
            None => dom.click_checkbox(&click.row),
        }

        self.last = Some(LastClick {
            row: click.row.clone(),
            checked: dom.is_checked(&click.row),
        });
        true
    }

    /// Forgets the click history; called on navigation.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

fn order_range<D: MailDom + ?Sized>(dom: &D, a: &RowId, b: &RowId) -> Option<(u32, u32)> {
    let a = dom.order(a)?;
    let b = dom.order(b)?;
    Some((a.min(b), a.max(b)))
}
