//! The coordinator owns the page session and decides when to bundle.
//!
//! The platform binding turns mutation records and pointer events into
//! [`DomEvent`]s and feeds them to [`Coordinator::handle`] one at a time.
//! Events are handled to completion before the next one, so bundling cycles
//! never overlap; watchers are disconnected around every write pass so the
//! coordinator never sees its own writes.

use tracing::{debug, info, trace, warn};

use crate::bundling::{
    date_grouper, page_key, toggler, BundleReport, BundledMail, Bundler, BundlingError, Result,
    SelectiveBundling,
};
use crate::dom::{MailDom, PauseGuard, Watchers};
use crate::domain::{PageKey, RowId};
use crate::handlers::{
    bulk_action, handle_class_change, BulkAction, BulkTarget, CheckboxClick, ClassChange,
    QuickSelect, StarHandler, StarToggle, ToolbarSignals,
};
use crate::page::PageLocation;

use super::{startup, AppEvent, EventBus};

/// Where a mouse press landed, as far as bundling cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseTarget {
    /// An inbox tab, a page-changing button or the refresh button.
    Navigation,
    /// A bundled message or a header's "View all" link.
    BundleUi,
    Other,
}

/// Something that happened on the host page.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// The message list's rows were added or removed.
    ListChildrenChanged,
    /// The starred page's rows were added or removed.
    PinnedListChanged,
    /// The main area switched views.
    MainRoleChanged,
    /// The inbox switched tabs.
    TabPanelsChanged,
    /// A mouse button went down.
    MouseDown(MouseTarget),
    /// A star toggle was pressed, before the host reacted.
    StarPressed { row: RowId, toggle: StarToggle },
    /// A watched message row's class list changed.
    MessageClassChanged(ClassChange),
    /// A bundle header was clicked.
    HeaderClicked(String),
    /// The panel behind the open bundle was clicked.
    PanelClicked,
    /// The list was clicked outside of any row.
    OutsideClick,
    /// A message checkbox was clicked.
    CheckboxClicked(CheckboxClick),
}

/// Rows a bulk action can target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkSelection {
    /// The bundle with this label on the current page.
    Bundle(String),
    /// A date divider's section.
    Section(Vec<RowId>),
}

/// Drives bundling for one page session.
pub struct Coordinator<D> {
    dom: D,
    watchers: Watchers,
    location: PageLocation,
    bundler: Bundler,
    mail: BundledMail,
    star: StarHandler,
    quick_select: QuickSelect,
    events: EventBus,
    fresh: bool,
    interacted: bool,
}

impl<D: MailDom> Coordinator<D> {
    pub fn new(
        dom: D,
        watchers: Watchers,
        location: PageLocation,
        bundler: Bundler,
        events: EventBus,
    ) -> Self {
        Self {
            dom,
            watchers,
            location,
            bundler,
            mail: BundledMail::new(),
            star: StarHandler::new(),
            quick_select: QuickSelect::new(),
            events,
            fresh: false,
            interacted: false,
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Mutable access for the platform binding, e.g. to apply host redraws.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn mail(&self) -> &BundledMail {
        &self.mail
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Registry key of the list currently shown.
    pub fn page_key(&self) -> PageKey {
        page_key(&self.dom, &self.location)
    }

    /// Waits for the host page, runs the first cycle and arms the
    /// navigation watchers.
    ///
    /// Fails with [`BundlingError::StartupTimeout`] when the page never
    /// appears; the failure is also published as a notification.
    pub async fn start(&mut self) -> Result<()> {
        let bundling = self.location.supports_bundling();
        let dom = &self.dom;
        let waited = startup::retry_until(|| {
            if bundling {
                dom.has_message_list()
            } else {
                dom.has_main()
            }
        })
        .await;

        let attempts = match waited {
            Ok(attempts) => attempts,
            Err(err) => {
                warn!(%err, "host page never loaded");
                self.events
                    .publish(AppEvent::ShowNotification(startup::failure_notification()));
                return Err(err);
            }
        };

        if bundling {
            self.cycle(false)?;
        }
        self.watchers.main_parent.observe();
        self.watchers.tab_panels.observe();
        if self.location.is_starred_page() {
            self.refresh_dates();
        }

        info!(attempts, bundling, "inboxy started");
        Ok(())
    }

    /// Follows a URL change.
    pub fn navigate(&mut self, url: &str) -> Result<()> {
        self.location = PageLocation::parse(url)?;
        self.quick_select.reset();
        debug!(url, "navigated");
        Ok(())
    }

    /// Handles one event to completion.
    pub fn handle(&mut self, event: DomEvent) -> Result<()> {
        trace!(?event, "dom event");

        match event {
            DomEvent::ListChildrenChanged => self.on_list_changed()?,
            DomEvent::PinnedListChanged => {
                if self.location.is_starred_page() {
                    self.refresh_dates();
                }
            }
            DomEvent::MainRoleChanged => {
                if self.location.supports_bundling() {
                    self.rebundle()?;
                } else if self.location.is_starred_page() {
                    self.refresh_dates();
                }
            }
            DomEvent::TabPanelsChanged => {
                if self.location.supports_bundling() {
                    self.rebundle()?;
                }
            }
            DomEvent::MouseDown(MouseTarget::Navigation) => self.fresh = true,
            DomEvent::MouseDown(MouseTarget::BundleUi) => self.interacted = true,
            DomEvent::MouseDown(MouseTarget::Other) => {}
            DomEvent::StarPressed { row, toggle } => {
                if self.location.supports_bundling() {
                    let key = self.page_key();
                    let policy = self.policy();
                    self.star.handle_starring(
                        &self.dom,
                        &mut self.mail,
                        &key,
                        &policy,
                        &row,
                        toggle,
                    );
                }
            }
            DomEvent::MessageClassChanged(change) => {
                if self.location.supports_bundling() {
                    let key = self.page_key();
                    let policy = self.policy();
                    let _pause = PauseGuard::new(self.watchers.message_list.as_mut());
                    handle_class_change(&mut self.dom, &self.mail, &key, &policy, &change);
                }
            }
            DomEvent::HeaderClicked(label) => self.toggle(&label)?,
            DomEvent::PanelClicked | DomEvent::OutsideClick => self.close_all(),
            DomEvent::CheckboxClicked(click) => {
                self.quick_select.handle_click(&mut self.dom, &click);
            }
        }

        Ok(())
    }

    /// Runs a bulk action once the host toolbar allows it.
    pub async fn bulk_action(
        &mut self,
        action: BulkAction,
        selection: &BulkSelection,
        toolbar: &mut ToolbarSignals,
    ) -> Result<bool> {
        let (done, rows) = match selection {
            BulkSelection::Bundle(label) => {
                let key = page_key(&self.dom, &self.location);
                let bundle = self
                    .mail
                    .bundle(&key, label)
                    .ok_or_else(|| BundlingError::UnknownBundle(label.clone()))?;
                let members: Vec<RowId> = bundle.messages().iter().map(|m| m.id.clone()).collect();
                let target = BulkTarget::Bundle {
                    header: &bundle.header,
                    members: &members,
                };
                let done = bulk_action::run(&mut self.dom, action, target, toolbar).await;
                (done, members.len())
            }
            BulkSelection::Section(rows) => {
                let target = BulkTarget::Section(rows);
                let done = bulk_action::run(&mut self.dom, action, target, toolbar).await;
                (done, rows.len())
            }
        };

        if done && action.control().is_some() {
            self.events
                .publish(AppEvent::BulkActionDispatched { action, rows });
        }
        Ok(done)
    }

    fn policy(&self) -> SelectiveBundling {
        SelectiveBundling::from_settings(&self.bundler.settings().snapshot())
    }

    fn cycle(&mut self, reopen: bool) -> Result<BundleReport> {
        let report = self.bundler.bundle(
            &mut self.dom,
            &mut self.watchers,
            &mut self.mail,
            &self.location,
            reopen,
        )?;

        if report.rebuilt {
            self.events.publish(AppEvent::Bundled {
                page: self.page_key(),
                messages: report.messages,
                bundles: report.bundles,
            });
        }
        Ok(report)
    }

    fn on_list_changed(&mut self) -> Result<()> {
        if !self.location.supports_bundling() {
            return Ok(());
        }

        self.cycle(!self.fresh)?;
        let key = self.page_key();
        self.star.scroll_if_necessary(&mut self.dom, &self.mail, &key);
        self.fresh = false;
        Ok(())
    }

    /// Rebuilds after a view or tab switch. The remembered bundle is only
    /// reopened when the user had just interacted with it.
    fn rebundle(&mut self) -> Result<()> {
        if !self.interacted || self.fresh {
            let _pause = PauseGuard::new(self.watchers.message_list.as_mut());
            toggler::close_all(&mut self.dom, &mut self.mail);
        }
        self.cycle(true)?;

        self.fresh = false;
        self.interacted = false;
        Ok(())
    }

    fn toggle(&mut self, label: &str) -> Result<()> {
        let key = self.page_key();
        {
            let _pause = PauseGuard::new(self.watchers.message_list.as_mut());
            toggler::toggle(&mut self.dom, &mut self.mail, &key, label)?;
        }

        let event = match self.mail.open_label() {
            Some(open) => AppEvent::BundleOpened(open.to_string()),
            None => AppEvent::BundlesClosed,
        };
        self.events.publish(event);
        Ok(())
    }

    fn close_all(&mut self) {
        {
            let _pause = PauseGuard::new(self.watchers.message_list.as_mut());
            toggler::close_all(&mut self.dom, &mut self.mail);
        }
        self.events.publish(AppEvent::BundlesClosed);
    }

    fn refresh_dates(&mut self) {
        let settings = self.bundler.settings().snapshot();
        date_grouper::refresh_date_dividers(
            &mut self.dom,
            self.watchers.pinned_list.as_mut(),
            &settings,
            self.bundler.now(),
        );
        self.events.publish(AppEvent::DatesRefreshed);
    }
}

impl<D> std::fmt::Debug for Coordinator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("location", &self.location)
            .field("watchers", &self.watchers)
            .field("open", &self.mail.open_label())
            .field("fresh", &self.fresh)
            .field("interacted", &self.interacted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, SharedSettings};
    use crate::dom::memory::{MemoryDom, MemoryMessageWatchers, MemoryWatcher};
    use crate::dom::{classes, MessageList, Watcher};
    use crate::domain::MessageRow;
    use std::sync::{Arc, Mutex};

    fn watchers(list: &MemoryWatcher) -> Watchers {
        Watchers {
            message_list: Box::new(list.clone()),
            pinned_list: Box::new(MemoryWatcher::new()),
            main_parent: Box::new(MemoryWatcher::new()),
            tab_panels: Box::new(MemoryWatcher::new()),
            messages: Box::new(MemoryMessageWatchers::new()),
        }
    }

    fn inbox() -> Vec<MessageRow> {
        vec![
            MessageRow::new("a", ""),
            MessageRow::new("t1", "").with_labels(["Trips"]),
            MessageRow::new("t2", "").with_labels(["Trips"]),
        ]
    }

    fn coordinator(list: &MemoryWatcher, url: &str) -> Coordinator<MemoryDom> {
        let settings = SharedSettings::with(Settings {
            group_messages_by_date: false,
            ..Default::default()
        });
        let mut coordinator = Coordinator::new(
            MemoryDom::new(inbox()),
            watchers(list),
            PageLocation::parse(url).unwrap(),
            Bundler::new(settings),
            EventBus::new(),
        );
        tokio_test::block_on(coordinator.start()).unwrap();
        coordinator
    }

    fn is_open(coordinator: &Coordinator<MemoryDom>, id: &str) -> bool {
        coordinator.dom().has_class(&RowId::from(id), classes::VISIBLE)
    }

    #[test]
    fn start_bundles_and_arms_watchers() {
        let list = MemoryWatcher::new();
        let coordinator = coordinator(&list, "https://mail.example.com/#inbox");

        assert_eq!(coordinator.dom().headers().len(), 1);
        assert!(list.is_observing());
        assert!(coordinator.watchers.main_parent.is_observing());
        assert!(coordinator.watchers.tab_panels.is_observing());
    }

    #[test]
    fn header_clicks_toggle_and_publish() {
        let list = MemoryWatcher::new();
        let mut coordinator = coordinator(&list, "https://mail.example.com/#inbox");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        coordinator.events().subscribe(move |event| {
            sink.lock().unwrap().push(format!("{event:?}"));
        });

        coordinator
            .handle(DomEvent::HeaderClicked("Trips".to_string()))
            .unwrap();
        assert!(is_open(&coordinator, "t1"));

        coordinator.handle(DomEvent::OutsideClick).unwrap();
        assert!(!is_open(&coordinator, "t1"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["BundleOpened(\"Trips\")", "BundlesClosed"]
        );
    }

    #[test]
    fn list_redraw_reopens_unless_fresh() {
        let list = MemoryWatcher::new();
        let mut coordinator = coordinator(&list, "https://mail.example.com/#inbox");
        coordinator
            .handle(DomEvent::HeaderClicked("Trips".to_string()))
            .unwrap();

        coordinator.dom_mut().host_redraw(inbox());
        coordinator.handle(DomEvent::ListChildrenChanged).unwrap();
        assert!(is_open(&coordinator, "t1"));

        coordinator
            .handle(DomEvent::MouseDown(MouseTarget::Navigation))
            .unwrap();
        coordinator.dom_mut().host_redraw(inbox());
        coordinator.handle(DomEvent::ListChildrenChanged).unwrap();
        assert!(!is_open(&coordinator, "t1"));
        assert_eq!(coordinator.mail().open_label(), None);
    }

    #[test]
    fn view_switch_keeps_the_bundle_after_an_interaction() {
        let list = MemoryWatcher::new();
        let mut coordinator = coordinator(&list, "https://mail.example.com/#inbox");
        coordinator
            .handle(DomEvent::HeaderClicked("Trips".to_string()))
            .unwrap();

        coordinator
            .handle(DomEvent::MouseDown(MouseTarget::BundleUi))
            .unwrap();
        coordinator.dom_mut().host_redraw(inbox());
        coordinator.handle(DomEvent::MainRoleChanged).unwrap();
        assert!(is_open(&coordinator, "t1"));

        coordinator.dom_mut().host_redraw(inbox());
        coordinator.handle(DomEvent::TabPanelsChanged).unwrap();
        assert!(!is_open(&coordinator, "t1"));
    }

    #[test]
    fn pages_without_bundling_are_left_alone() {
        let list = MemoryWatcher::new();
        let mut coordinator = coordinator(&list, "https://mail.example.com/#sent");

        coordinator.handle(DomEvent::ListChildrenChanged).unwrap();

        assert!(coordinator.dom().headers().is_empty());
        assert!(!list.is_observing());
    }

    #[test]
    fn navigation_rejects_bad_urls() {
        let list = MemoryWatcher::new();
        let mut coordinator = coordinator(&list, "https://mail.example.com/#inbox");

        let err = coordinator.navigate("not a url").unwrap_err();
        assert!(matches!(err, BundlingError::InvalidUrl(_)));

        coordinator
            .navigate("https://mail.example.com/#inbox/p2")
            .unwrap();
        assert_eq!(coordinator.page_key(), PageKey::new(2, None));
    }
}
