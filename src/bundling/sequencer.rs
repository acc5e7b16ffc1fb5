//! Row sequencing and rendering.
//!
//! The host forbids reordering its row nodes, so the bundled view is drawn
//! purely through a numeric visual order on each row. Row `i` of the
//! sequence gets `(i + 1) * ORDER_INCREMENT`; the members of a bundle are
//! later slotted in at `bundle order + k + 1`, inside the headroom the
//! increment reserves.

use std::collections::HashSet;

use tracing::trace;

use crate::dom::{classes, BundleHeader, DividerRow, MessageList};
use crate::domain::{RenderedBundle, Row, RowId};
use crate::page::PageLocation;

use super::{dates, BundleSet, Classification, Classified};

/// Gap between the visual orders of consecutive rows.
pub const ORDER_INCREMENT: u32 = 1000;

/// Most message rows the host shows on one page.
pub const MAX_ROWS_PER_PAGE: u32 = 100;

// Members of a bundle must fit between its header and the next row.
const _: () = assert!(ORDER_INCREMENT > MAX_ROWS_PER_PAGE);

/// Merges classification and bundles into the rows of the bundled view.
///
/// Unbundled messages appear where they were scanned; each bundle appears
/// once, at the position of its first member.
pub fn sequence<'a>(classification: &Classification<'a>, bundles: &'a BundleSet) -> Vec<Row<'a>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut rows = Vec::with_capacity(classification.rows().len());

    for classified in classification.rows() {
        match classified {
            Classified::Unbundlable(message) => rows.push(Row::Message(*message)),
            Classified::Bundlable { labels, .. } => {
                let Some(chip) = labels.first() else {
                    continue;
                };
                if let Some(bundle) = bundles.get(&chip.title) {
                    if seen.insert(bundle.label()) {
                        rows.push(Row::Bundle(bundle));
                    }
                }
            }
        }
    }

    rows
}

/// Rendering options taken from settings and the page URL.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Paint headers with their label's chip colors.
    pub use_label_colors: bool,
    /// Page the list is rendered on, for "View all" links.
    pub location: &'a PageLocation,
}

/// Assigns visual orders and appends the synthesized rows.
///
/// Unbundled messages get their row's order; bundle members are marked and
/// left without an order until their bundle opens. Every message row starts
/// out closed. Returns the rendered bundles in sequence order.
pub fn render<D: MessageList + ?Sized>(
    rows: &[Row<'_>],
    dom: &mut D,
    options: RenderOptions<'_>,
) -> Vec<RenderedBundle> {
    let mut rendered = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let order = row_order(index);
        match row {
            Row::Message(message) => {
                reset_message(dom, &message.id);
                dom.remove_class(&message.id, classes::BUNDLED_MESSAGE);
                dom.set_order(&message.id, Some(order));
            }
            Row::Bundle(bundle) => {
                for message in bundle.messages() {
                    reset_message(dom, &message.id);
                    dom.add_class(&message.id, classes::BUNDLED_MESSAGE);
                    dom.set_order(&message.id, None);
                }

                let style = (options.use_label_colors && !bundle.style().is_empty())
                    .then(|| bundle.style().clone());
                let header = dom.append_bundle_header(BundleHeader {
                    label: bundle.label().to_string(),
                    style,
                    order,
                    count: bundle.display_count(),
                    unread: bundle.has_unread(),
                    view_all_url: options.location.label_url(bundle.label()),
                    members: bundle.messages().iter().map(|m| m.id.clone()).collect(),
                });
                trace!(label = bundle.label(), order, %header, "rendered bundle header");

                rendered.push(RenderedBundle {
                    bundle: (*bundle).clone(),
                    order,
                    header,
                });
            }
            Row::Divider(divider) => {
                dom.append_divider(DividerRow {
                    kind: divider.kind,
                    order,
                    members: dates::section_members(rows, index),
                });
            }
        }
    }

    rendered
}

/// Visual order of the row at `index`.
pub fn row_order(index: usize) -> u32 {
    (index as u32 + 1) * ORDER_INCREMENT
}

fn reset_message<D: MessageList + ?Sized>(dom: &mut D, id: &RowId) {
    dom.remove_class(id, classes::VISIBLE);
    dom.remove_class(id, classes::LAST);
    dom.show_all_labels(id);
}
