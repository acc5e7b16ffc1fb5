//! Row classification.
//!
//! Decides per message whether it goes into a bundle. A message is bundled
//! under the first of its labels the policy allows; starred messages and
//! messages with no allowed label stay in the list as they are.

use crate::domain::{LabelChip, MessageRow};

use super::SelectiveBundling;

/// Verdict for one message, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified<'a> {
    /// The message joins the bundle of `labels[0]`.
    Bundlable {
        message: &'a MessageRow,
        /// Allowed labels in DOM order, without duplicate titles. Never empty.
        labels: Vec<&'a LabelChip>,
    },
    /// The message stays a row of its own.
    Unbundlable(&'a MessageRow),
}

impl<'a> Classified<'a> {
    /// The classified message.
    pub fn message(&self) -> &'a MessageRow {
        match self {
            Classified::Bundlable { message, .. } => *message,
            Classified::Unbundlable(message) => *message,
        }
    }

    /// The chip whose bundle the message joins, if bundlable.
    pub fn bundle_label(&self) -> Option<&'a LabelChip> {
        match self {
            Classified::Bundlable { labels, .. } => labels.first().copied(),
            Classified::Unbundlable(_) => None,
        }
    }
}

/// Classification of a whole message list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification<'a> {
    rows: Vec<Classified<'a>>,
}

impl<'a> Classification<'a> {
    /// Verdicts in scan order.
    pub fn rows(&self) -> &[Classified<'a>] {
        &self.rows
    }

    /// Bundlable messages with their allowed labels, in scan order.
    pub fn bundlable<'s>(
        &'s self,
    ) -> impl Iterator<Item = (&'a MessageRow, &'s [&'a LabelChip])> + 's {
        self.rows.iter().filter_map(|row| match row {
            Classified::Bundlable { message, labels } => Some((*message, labels.as_slice())),
            Classified::Unbundlable(_) => None,
        })
    }

    /// Messages that stay unbundled, in scan order.
    pub fn unbundlable(&self) -> impl Iterator<Item = &'a MessageRow> + '_ {
        self.rows.iter().filter_map(|row| match row {
            Classified::Unbundlable(message) => Some(*message),
            Classified::Bundlable { .. } => None,
        })
    }
}

/// Classifies `messages` under `policy`.
pub fn classify<'a>(messages: &'a [MessageRow], policy: &SelectiveBundling) -> Classification<'a> {
    let rows = messages
        .iter()
        .map(|message| {
            if message.starred {
                return Classified::Unbundlable(message);
            }

            let mut labels: Vec<&LabelChip> = Vec::new();
            for chip in policy.filter(&message.labels) {
                if !labels.iter().any(|l| l.title == chip.title) {
                    labels.push(chip);
                }
            }

            if labels.is_empty() {
                Classified::Unbundlable(message)
            } else {
                Classified::Bundlable { message, labels }
            }
        })
        .collect();

    Classification { rows }
}
