//! Opening and closing bundles.
//!
//! Opening a bundle slots its members in right after the header, marks the
//! last one, hides the now redundant label chip on each member and places
//! the floating panel behind them. Closing undoes every one of those writes,
//! so open followed by close leaves each row as rendering left it.

use tracing::debug;

use crate::dom::{classes, MailDom, PanelGeometry};
use crate::domain::{PageKey, RowId};

use super::{BundledMail, BundlingError, Result};

/// Opens the bundle with `label`, closing whichever bundle was open first.
/// Toggling the open bundle closes it.
pub fn toggle<D: MailDom + ?Sized>(
    dom: &mut D,
    mail: &mut BundledMail,
    key: &PageKey,
    label: &str,
) -> Result<()> {
    let previously_open = mail.open_label().map(str::to_owned);

    if previously_open.is_some() {
        close_all(dom, mail);
    }

    if previously_open.as_deref() != Some(label) {
        open(dom, mail, key, label)?;
    }

    Ok(())
}

/// Opens the bundle with `label` on the page/tab `key`.
pub fn open<D: MailDom + ?Sized>(
    dom: &mut D,
    mail: &mut BundledMail,
    key: &PageKey,
    label: &str,
) -> Result<()> {
    let page = mail.page(key).ok_or(BundlingError::NotRendered)?;
    let bundle = page
        .get(label)
        .ok_or_else(|| BundlingError::UnknownBundle(label.to_string()))?;

    let header = bundle.header.clone();
    let base = bundle.order;
    let members: Vec<RowId> = bundle.messages().iter().map(|m| m.id.clone()).collect();

    for (k, id) in members.iter().enumerate() {
        dom.set_order(id, Some(base + k as u32 + 1));
        dom.add_class(id, classes::VISIBLE);
        if k + 1 == members.len() {
            dom.add_class(id, classes::LAST);
        }
        dom.set_label_hidden(id, label, true);
    }
    dom.add_class(&header, classes::VISIBLE);

    let panel = panel_geometry(dom, &header, &members);
    dom.set_panel(panel);

    mail.record_open(label);
    debug!(label, members = members.len(), "opened bundle");
    Ok(())
}

/// Closes every open bundle.
pub fn close_all<D: MailDom + ?Sized>(dom: &mut D, mail: &mut BundledMail) {
    for id in dom.rows_with_classes(&[classes::BUNDLED_MESSAGE, classes::VISIBLE]) {
        dom.set_order(&id, None);
        dom.remove_class(&id, classes::VISIBLE);
        dom.remove_class(&id, classes::LAST);
        dom.show_all_labels(&id);
    }

    for id in dom.rows_with_classes(&[classes::BUNDLE_ROW, classes::VISIBLE]) {
        dom.remove_class(&id, classes::VISIBLE);
    }

    dom.set_panel(None);

    if let Some(label) = mail.open_label() {
        debug!(label, "closed bundle");
    }
    mail.record_closed();
}

/// Panel spanning from the header's bottom edge to the last member's.
fn panel_geometry<D: MailDom + ?Sized>(
    dom: &D,
    header: &RowId,
    members: &[RowId],
) -> Option<PanelGeometry> {
    let header = dom.row_box(header)?;
    let first = dom.row_box(members.first()?)?;
    let last = dom.row_box(members.last()?)?;

    Some(PanelGeometry {
        top: header.bottom(),
        height: last.offset_top - first.offset_top + last.height,
    })
}
