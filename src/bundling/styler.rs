//! Selection styling on bundle headers.

use std::collections::HashSet;

use crate::dom::{classes, MessageList};
use crate::domain::{RenderedBundle, RowId};

use super::PageBundles;

/// Marks the header of every bundle with a selected member.
pub fn mark_selected_bundles<D: MessageList + ?Sized>(dom: &mut D, page: &PageBundles) {
    for bundle in page.iter() {
        mark_selected(dom, bundle);
    }
}

/// Like [`mark_selected_bundles`], limited to the bundles with these labels.
pub fn mark_selected_bundles_for<D: MessageList + ?Sized>(
    dom: &mut D,
    page: &PageBundles,
    labels: &[&str],
) {
    for label in labels {
        if let Some(bundle) = page.get(label) {
            mark_selected(dom, bundle);
        }
    }
}

fn mark_selected<D: MessageList + ?Sized>(dom: &mut D, bundle: &RenderedBundle) {
    let any_selected = bundle
        .messages()
        .iter()
        .any(|m| dom.has_class(&m.id, classes::SELECTED));

    if any_selected {
        dom.add_class(&bundle.header, classes::SELECTED);
    } else {
        dom.remove_class(&bundle.header, classes::SELECTED);
    }
}

/// Disables a bundle's bulk actions while any message outside it is
/// selected, since the host toolbar would act on those messages too.
pub fn update_bulk_actions<D: MessageList + ?Sized>(dom: &mut D, page: &PageBundles) {
    let selected: Vec<RowId> = dom
        .message_rows()
        .into_iter()
        .filter(|m| m.selected)
        .map(|m| m.id)
        .collect();

    for bundle in page.iter() {
        let members: HashSet<&RowId> = bundle.messages().iter().map(|m| &m.id).collect();
        let enabled = selected.iter().all(|id| members.contains(id));
        dom.set_bulk_actions_enabled(&bundle.header, enabled);
    }
}
