//! Bundle aggregation.
//!
//! Groups bundlable messages by label. Bundles come out in the order their
//! labels first occur in the scan; members keep scan order.

use std::collections::HashMap;

use crate::domain::{Bundle, LabelStyle, MessageRow};

use super::Classification;

/// The bundles of one cycle, in first-occurrence order, looked up by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleSet {
    bundles: Vec<Bundle>,
    index: HashMap<String, usize>,
}

impl BundleSet {
    /// Bundle for a label.
    pub fn get(&self, label: &str) -> Option<&Bundle> {
        self.index.get(label).map(|&i| &self.bundles[i])
    }

    /// Bundles in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &Bundle> {
        self.bundles.iter()
    }

    /// Number of bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether there are no bundles.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Labels in first-occurrence order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bundles.iter().map(Bundle::label)
    }
}

struct Pending {
    label: String,
    style: LabelStyle,
    messages: Vec<MessageRow>,
}

/// Groups the bundlable messages of `classification` into bundles.
pub fn aggregate(classification: &Classification<'_>) -> BundleSet {
    let mut pending: Vec<Pending> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (message, labels) in classification.bundlable() {
        let Some(chip) = labels.first() else {
            continue;
        };

        let slot = *index.entry(chip.title.clone()).or_insert_with(|| {
            pending.push(Pending {
                label: chip.title.clone(),
                style: chip.style.clone(),
                messages: Vec::new(),
            });
            pending.len() - 1
        });
        pending[slot].messages.push(message.clone());
    }

    let bundles = pending
        .into_iter()
        .map(|p| Bundle::new(p.label, p.style, p.messages))
        .collect();

    BundleSet { bundles, index }
}
