//! The bundling pipeline.
//!
//! One cycle classifies the message rows, aggregates bundles, sequences and
//! date-partitions the rows, renders them, stores the result in the
//! [`BundledMail`] registry and finally reopens (or closes) the remembered
//! bundle. The list watcher is disconnected for the whole cycle.

mod aggregator;
mod classifier;
pub mod date_grouper;
pub mod dates;
mod registry;
mod selective;
mod sequencer;
pub mod styler;
pub mod toggler;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::debug;

use crate::config::SharedSettings;
use crate::dom::{classes, MailDom, PauseGuard, Watchers};
use crate::domain::{PageKey, RowId};
use crate::page::PageLocation;

pub use aggregator::{aggregate, BundleSet};
pub use classifier::{classify, Classification, Classified};
pub use registry::{BundleState, BundledMail, PageBundles};
pub use selective::SelectiveBundling;
pub use sequencer::{
    render, row_order, sequence, RenderOptions, MAX_ROWS_PER_PAGE, ORDER_INCREMENT,
};

/// Errors that can occur while bundling.
#[derive(Debug, Error)]
pub enum BundlingError {
    /// The message list never appeared.
    #[error("message list not found after {attempts} attempts")]
    StartupTimeout { attempts: u32 },

    /// No bundle with this label on the current page.
    #[error("no bundle labeled {0:?} on this page")]
    UnknownBundle(String),

    /// The current page/tab has not been bundled yet.
    #[error("current page has not been bundled")]
    NotRendered,

    /// The page URL could not be parsed.
    #[error("invalid page url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type for bundling operations.
pub type Result<T> = std::result::Result<T, BundlingError>;

/// Source of the reference instant for date dividers.
pub type Clock = fn() -> NaiveDateTime;

/// The current host-local time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Summary of one bundling cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleReport {
    /// Whether the message list was present.
    pub found_list: bool,
    /// Whether the list had been redrawn and was rebuilt.
    pub rebuilt: bool,
    /// Message rows seen by the rebuild.
    pub messages: usize,
    /// Bundles rendered by the rebuild.
    pub bundles: usize,
    /// Whether the remembered bundle was reopened.
    pub reopened: bool,
}

/// Runs bundling cycles against the host page.
#[derive(Debug, Clone)]
pub struct Bundler {
    settings: SharedSettings,
    clock: Clock,
}

impl Bundler {
    /// Creates a bundler reading `settings` on every cycle.
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            clock: local_now,
        }
    }

    /// Replaces the clock used for date dividers.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Shared settings handle.
    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// The current reference instant.
    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// Bundles the current page unless it is still bundled, then reopens the
    /// remembered bundle when `reopen` is set, or closes everything.
    pub fn bundle<D: MailDom + ?Sized>(
        &self,
        dom: &mut D,
        watchers: &mut Watchers,
        mail: &mut BundledMail,
        location: &PageLocation,
        reopen: bool,
    ) -> Result<BundleReport> {
        if !dom.has_message_list() {
            return Ok(BundleReport::default());
        }

        let key = page_key(dom, location);
        let mut report = BundleReport {
            found_list: true,
            ..Default::default()
        };

        let _pause = PauseGuard::new(watchers.message_list.as_mut());

        if !dom.is_marked_bundled() {
            let (messages, bundles, watched) = self.rebuild(dom, mail, &key, location);
            watchers.messages.watch(&watched);
            dom.mark_bundled();

            report.rebuilt = true;
            report.messages = messages;
            report.bundles = bundles;
        }

        match mail.open_label().map(str::to_owned) {
            Some(label) if reopen && mail.bundle(&key, &label).is_some() => {
                toggler::open(dom, mail, &key, &label)?;
                report.reopened = true;
            }
            _ => toggler::close_all(dom, mail),
        }

        debug!(
            page = %key,
            rebuilt = report.rebuilt,
            messages = report.messages,
            bundles = report.bundles,
            reopened = report.reopened,
            "bundle cycle"
        );

        Ok(report)
    }

    fn rebuild<D: MailDom + ?Sized>(
        &self,
        dom: &mut D,
        mail: &mut BundledMail,
        key: &PageKey,
        location: &PageLocation,
    ) -> (usize, usize, Vec<RowId>) {
        dom.remove_synthesized_rows(classes::BUNDLE_ROW);
        dom.remove_synthesized_rows(classes::DATE_ROW);

        let settings = self.settings.snapshot();
        let policy = SelectiveBundling::from_settings(&settings);
        let messages = dom.message_rows();

        let classification = classify(&messages, &policy);
        let bundles = aggregate(&classification);
        let mut rows = sequence(&classification, &bundles);
        if settings.group_messages_by_date {
            let sample = messages.first().map(|m| m.date.as_str()).unwrap_or_default();
            rows = dates::interleave(rows, &dates::compute_dividers(sample, self.now()));
        }

        let rendered = render(
            &rows,
            dom,
            RenderOptions {
                use_label_colors: settings.use_label_colors,
                location,
            },
        );
        mail.set_bundles(key.clone(), rendered);

        if let Some(page) = mail.page(key) {
            styler::mark_selected_bundles(dom, page);
            styler::update_bulk_actions(dom, page);
        }

        let watched = messages.iter().map(|m| m.id.clone()).collect();
        (messages.len(), bundles.len(), watched)
    }
}

/// Registry key of the list currently shown.
pub fn page_key<D: MailDom + ?Sized>(dom: &D, location: &PageLocation) -> PageKey {
    PageKey::new(
        location.page_number().unwrap_or(1),
        dom.current_tab().as_deref(),
    )
}
