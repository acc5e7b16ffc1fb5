//! Date dividers.
//!
//! Splits the bundled view into Today / Yesterday / This month (or Last
//! month) / Earlier sections. Boundaries are computed in host-local time
//! from a reference instant; a row's date is its most recent message's
//! host-formatted date string.

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDateTime, NaiveTime};

use crate::domain::{Divider, DividerKind, MessageRow, Row, RowId};

/// Date format of the host's per-message date tooltip
/// (`Sun, Mar 15, 2020, 9:00 AM`).
pub const HOST_DATE_FORMAT: &str = "%a, %b %d, %Y, %I:%M %p";

/// `Date::toString`-style format, minus the zone suffix.
const VERBOSE_DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S";

/// Parses a host-formatted date string into local time.
///
/// Returns `None` for anything the host would not produce.
pub fn parse_host_date(raw: &str) -> Option<NaiveDateTime> {
    let normalized = raw.replace(|c: char| c == '\u{202f}' || c == '\u{a0}', " ");
    let text = normalized.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDateTime::parse_from_str(text, HOST_DATE_FORMAT) {
        return Some(date);
    }

    let verbose = text.split(" GMT").next().unwrap_or(text);
    if let Ok(date) = NaiveDateTime::parse_from_str(verbose, VERBOSE_DATE_FORMAT) {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()
        .map(|date| date.with_timezone(&Local).naive_local())
}

/// Computes the four dividers relative to `now`.
///
/// Returns an empty list when `sample` is not a date the host format can
/// express, so date grouping quietly turns off instead of misplacing rows.
pub fn compute_dividers(sample: &str, now: NaiveDateTime) -> Vec<Divider> {
    if parse_host_date(sample).is_none() {
        return Vec::new();
    }
    boundaries(now).map(Vec::from).unwrap_or_default()
}

fn boundaries(now: NaiveDateTime) -> Option<[Divider; 4]> {
    let today = now.date().and_time(NaiveTime::MIN);
    let tomorrow = today.checked_add_days(Days::new(1))?;
    let yesterday = today.checked_sub_days(Days::new(1))?;
    let month_start = today.with_day(1)?;
    let last_month_start = month_start.checked_sub_months(Months::new(1))?;

    let use_this_month = yesterday > month_start;
    let (third, earliest) = if use_this_month {
        (DividerKind::ThisMonth, month_start)
    } else {
        (DividerKind::LastMonth, last_month_start)
    };

    Some([
        Divider {
            kind: DividerKind::Today,
            end: tomorrow,
        },
        Divider {
            kind: DividerKind::Yesterday,
            end: today,
        },
        Divider {
            kind: third,
            end: yesterday,
        },
        Divider {
            kind: DividerKind::Earlier,
            end: earliest,
        },
    ])
}

fn row_date(row: &Row<'_>) -> Option<NaiveDateTime> {
    row.latest_message()
        .and_then(|message| parse_host_date(&message.date))
}

fn is_snoozed(row: &Row<'_>) -> bool {
    row.latest_message().is_some_and(|message| message.snoozed)
}

/// The divider that opens the section of `curr`, given the date of the row
/// before it.
///
/// Dividers are tried from the oldest boundary up, so the tightest section
/// that `curr` falls under and `prev` does not wins.
fn divider_between(
    prev: Option<NaiveDateTime>,
    curr: NaiveDateTime,
    dividers: &[Divider],
) -> Option<Divider> {
    dividers
        .iter()
        .rev()
        .find(|d| prev.map_or(true, |prev| prev >= d.end) && d.end > curr)
        .copied()
}

/// Inserts dividers in front of the rows that open a new date section.
///
/// A snoozed row never opens a section: it stays in its predecessor's
/// section and does not move the section boundary. A snoozed first row is
/// preceded by the first divider instead. The same divider is never
/// inserted twice in a row. Rows whose date can't be parsed get no divider.
/// Dividers already in `rows` are dropped and computed afresh.
pub fn interleave<'a>(rows: Vec<Row<'a>>, dividers: &[Divider]) -> Vec<Row<'a>> {
    if dividers.is_empty() {
        return rows;
    }

    let mut out = Vec::with_capacity(rows.len() + dividers.len());
    let mut prev: Option<NaiveDateTime> = None;
    let mut last_inserted: Option<DividerKind> = None;

    let messages = rows.into_iter().filter(|row| !row.is_divider());
    for (index, row) in messages.enumerate() {
        if is_snoozed(&row) {
            if index == 0 {
                out.push(Row::Divider(dividers[0]));
                last_inserted = Some(dividers[0].kind);
            }
            out.push(row);
            continue;
        }

        let date = row_date(&row);
        if let Some(curr) = date {
            if let Some(divider) = divider_between(prev, curr, dividers) {
                if last_inserted != Some(divider.kind) {
                    out.push(Row::Divider(divider));
                    last_inserted = Some(divider.kind);
                }
            }
        }

        out.push(row);
        prev = date;
    }

    out
}

/// Messages in the section opened by the divider at `divider_index`: every
/// unbundled message and every bundle member up to the next divider.
pub fn section_members(rows: &[Row<'_>], divider_index: usize) -> Vec<RowId> {
    rows.iter()
        .skip(divider_index + 1)
        .take_while(|row| !row.is_divider())
        .flat_map(|row| match row {
            Row::Message(message) => std::slice::from_ref(*message),
            Row::Bundle(bundle) => bundle.messages(),
            Row::Divider(_) => &[] as &[MessageRow],
        })
        .map(|message| message.id.clone())
        .collect()
}
