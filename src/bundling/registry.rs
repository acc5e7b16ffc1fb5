//! Registry of rendered bundles.
//!
//! Holds the bundles of every page and tab rendered in this view session,
//! and which bundle (if any) is open. Entries are replaced wholesale on each
//! rebuild; the open label survives rebuilds so the same bundle can be
//! reopened after the host redraws the list.

use std::collections::HashMap;

use crate::domain::{PageKey, RenderedBundle};

/// Open/closed state of the bundled view. At most one bundle is open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BundleState {
    /// No bundle is open.
    #[default]
    Closed,
    /// The bundle with this label is open.
    Open(String),
}

/// Rendered bundles of one page/tab, in sequence order.
#[derive(Debug, Clone, Default)]
pub struct PageBundles {
    bundles: Vec<RenderedBundle>,
    index: HashMap<String, usize>,
}

impl PageBundles {
    /// Indexes `bundles` by label.
    pub fn new(bundles: Vec<RenderedBundle>) -> Self {
        let index = bundles
            .iter()
            .enumerate()
            .map(|(i, b)| (b.label().to_string(), i))
            .collect();
        Self { bundles, index }
    }

    /// Bundle for a label.
    pub fn get(&self, label: &str) -> Option<&RenderedBundle> {
        self.index.get(label).map(|&i| &self.bundles[i])
    }

    /// Bundles in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &RenderedBundle> {
        self.bundles.iter()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

/// Bundles by page/tab plus the open-bundle state.
#[derive(Debug, Clone, Default)]
pub struct BundledMail {
    pages: HashMap<PageKey, PageBundles>,
    state: BundleState,
}

impl BundledMail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the bundles of a page/tab.
    pub fn set_bundles(&mut self, key: PageKey, bundles: Vec<RenderedBundle>) {
        self.pages.insert(key, PageBundles::new(bundles));
    }

    /// Bundles of a page/tab, if it has been rendered.
    pub fn page(&self, key: &PageKey) -> Option<&PageBundles> {
        self.pages.get(key)
    }

    /// Bundle for a label on a page/tab.
    pub fn bundle(&self, key: &PageKey, label: &str) -> Option<&RenderedBundle> {
        self.page(key).and_then(|page| page.get(label))
    }

    pub fn state(&self) -> &BundleState {
        &self.state
    }

    /// Label of the open bundle.
    pub fn open_label(&self) -> Option<&str> {
        match &self.state {
            BundleState::Open(label) => Some(label),
            BundleState::Closed => None,
        }
    }

    /// Records that the bundle with `label` is open.
    pub fn record_open(&mut self, label: impl Into<String>) {
        self.state = BundleState::Open(label.into());
    }

    /// Records that no bundle is open.
    pub fn record_closed(&mut self) {
        self.state = BundleState::Closed;
    }
}
