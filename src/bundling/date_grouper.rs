//! Date dividers on the starred page.
//!
//! The starred-in-inbox search page is never bundled; it only gets date
//! dividers, and its rows are ordered by plain index.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::config::Settings;
use crate::dom::{classes, DividerRow, MessageList, PauseGuard, Watcher};
use crate::domain::Row;

use super::dates;

/// Title of the chip the host shows on every inbox message.
pub const INBOX_LABEL: &str = "Inbox";

/// Redraws the date dividers of the starred page.
pub fn refresh_date_dividers<D: MessageList + ?Sized>(
    dom: &mut D,
    watcher: &mut dyn Watcher,
    settings: &Settings,
    now: NaiveDateTime,
) {
    if !dom.has_message_list() {
        return;
    }

    let _pause = PauseGuard::new(watcher);

    dom.remove_synthesized_rows(classes::DATE_ROW);

    let messages = dom.message_rows();
    let mut rows: Vec<Row<'_>> = messages.iter().map(Row::Message).collect();
    if settings.group_messages_by_date {
        let sample = messages.first().map(|m| m.date.as_str()).unwrap_or_default();
        rows = dates::interleave(rows, &dates::compute_dividers(sample, now));
    }

    for (index, row) in rows.iter().enumerate() {
        let order = index as u32;
        match row {
            Row::Message(message) => dom.set_order(&message.id, Some(order)),
            Row::Divider(divider) => {
                dom.append_divider(DividerRow {
                    kind: divider.kind,
                    order,
                    members: dates::section_members(&rows, index),
                });
            }
            Row::Bundle(_) => unreachable!("starred page rows are never bundled"),
        }
    }

    for message in &messages {
        dom.set_label_hidden(&message.id, INBOX_LABEL, true);
    }

    debug!(
        messages = messages.len(),
        rows = rows.len(),
        "refreshed starred page dividers"
    );
}
