//! Integration tests for the bundling flow.
//!
//! These tests drive a [`Coordinator`] over the in-memory DOM the way the
//! platform binding would: host redraws, mutation events and clicks. Each
//! module contains its own unit tests for detailed logic.

use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use tokio::sync::watch;

use inboxy::app::{
    bootstrap, AppEvent, BulkSelection, Coordinator, DomEvent, EventBus, MouseTarget,
    NotificationLevel,
};
use inboxy::bundling::dates::HOST_DATE_FORMAT;
use inboxy::bundling::{Bundler, BundlingError};
use inboxy::config::{JsonSettingsStore, MemorySettingsStore, Settings, SharedSettings};
use inboxy::dom::memory::{MemoryDom, MemoryMessageWatchers, MemoryWatcher};
use inboxy::dom::{
    classes, HostActions, MessageList, ToolbarControl, Viewport, Watcher, Watchers,
    ACTIVATION_SEQUENCE,
};
use inboxy::domain::{DividerKind, MessageRow, RowId};
use inboxy::handlers::{BulkAction, CheckboxClick, ClassChange, StarToggle, ToolbarSignals};
use inboxy::page::PageLocation;

const INBOX: &str = "https://mail.example.com/mail/u/0/#inbox";
const STARRED: &str = "https://mail.example.com/mail/u/0/#search/is%3Astarred+label%3Ainbox";

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 3, 15)
        .unwrap()
        .and_hms_opt(13, 0, 0)
        .unwrap()
}

fn on(day: u32, hour: u32) -> String {
    NaiveDate::from_ymd_opt(2020, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .format(HOST_DATE_FORMAT)
        .to_string()
}

fn watchers(list: &MemoryWatcher, pinned: &MemoryWatcher) -> Watchers {
    Watchers {
        message_list: Box::new(list.clone()),
        pinned_list: Box::new(pinned.clone()),
        main_parent: Box::new(MemoryWatcher::new()),
        tab_panels: Box::new(MemoryWatcher::new()),
        messages: Box::new(MemoryMessageWatchers::new()),
    }
}

/// An inbox page with two label bundles and dates spread over three days.
fn inbox() -> Vec<MessageRow> {
    vec![
        MessageRow::new("a", on(15, 9)),
        MessageRow::new("t1", on(15, 8)).with_labels(["Trips"]),
        MessageRow::new("k1", on(14, 10)).with_labels(["Bank", "Trips"]),
        MessageRow::new("t2", on(14, 9)).with_labels(["Trips"]).unread(),
        MessageRow::new("s", on(2, 5)).with_labels(["Trips"]).starred(),
    ]
}

struct Session {
    coordinator: Coordinator<MemoryDom>,
    list: MemoryWatcher,
    pinned: MemoryWatcher,
    events: Arc<Mutex<Vec<AppEvent>>>,
}

impl Session {
    async fn open(url: &str, rows: Vec<MessageRow>, settings: Settings) -> Self {
        let list = MemoryWatcher::new();
        let pinned = MemoryWatcher::new();
        let mut dom = MemoryDom::new(rows).with_container_top(100.0);
        dom.count_writes_while(list.flag());
        dom.count_writes_while(pinned.flag());

        let bus = EventBus::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        bus.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        let bundler = Bundler::new(SharedSettings::with(settings)).with_clock(now);
        let mut coordinator = Coordinator::new(
            dom,
            watchers(&list, &pinned),
            PageLocation::parse(url).unwrap(),
            bundler,
            bus,
        );
        coordinator.start().await.unwrap();

        Self {
            coordinator,
            list,
            pinned,
            events,
        }
    }

    fn start(url: &str, rows: Vec<MessageRow>, settings: Settings) -> Self {
        tokio_test::block_on(Self::open(url, rows, settings))
    }

    fn inbox() -> Self {
        Self::start(INBOX, inbox(), Settings::default())
    }

    fn dom(&self) -> &MemoryDom {
        self.coordinator.dom()
    }

    fn send(&mut self, event: DomEvent) {
        self.coordinator.handle(event).unwrap();
    }

    fn redraw(&mut self, rows: Vec<MessageRow>) {
        self.coordinator.dom_mut().host_redraw(rows);
        self.send(DomEvent::ListChildrenChanged);
    }

    fn header(&self, label: &str) -> RowId {
        let key = self.coordinator.page_key();
        self.coordinator
            .mail()
            .bundle(&key, label)
            .unwrap()
            .header
            .clone()
    }

    fn visible(&self, id: &str) -> bool {
        self.dom().has_class(&RowId::from(id), classes::VISIBLE)
    }

    fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| format!("{e:?}"))
            .collect()
    }
}

fn header_labels(dom: &MemoryDom) -> Vec<(String, String, u32)> {
    dom.headers()
        .into_iter()
        .map(|(_, h)| (h.label, h.count, h.order))
        .collect()
}

// ============================================================================
// Bundling Cycle Tests
// ============================================================================

#[test]
fn first_cycle_renders_bundles_and_dividers() {
    let session = Session::inbox();
    let dom = session.dom();

    assert_eq!(
        header_labels(dom),
        vec![
            ("Trips".to_string(), "2".to_string(), 3000),
            ("Bank".to_string(), "1".to_string(), 5000),
        ]
    );

    let dividers: Vec<_> = dom.dividers().into_iter().map(|(_, d)| d.kind).collect();
    assert_eq!(
        dividers,
        vec![DividerKind::Today, DividerKind::Yesterday, DividerKind::ThisMonth]
    );

    let trips = dom.headers().into_iter().find(|(_, h)| h.label == "Trips").unwrap().1;
    assert!(trips.unread);
    assert_eq!(
        trips.view_all_url,
        "https://mail.example.com/mail/u/0/#label/Trips"
    );
    assert!(dom.is_marked_bundled());
}

#[test]
fn bundling_never_trips_its_own_watchers() {
    let mut session = Session::inbox();

    session.send(DomEvent::HeaderClicked("Trips".to_string()));
    session.send(DomEvent::HeaderClicked("Bank".to_string()));
    session.send(DomEvent::PanelClicked);
    session.redraw(inbox());
    session.send(DomEvent::MainRoleChanged);

    assert_eq!(session.dom().guarded_writes(), 0);
    assert!(session.list.is_observing());
}

#[test]
fn unchanged_list_is_not_rebuilt() {
    let mut session = Session::inbox();
    let before = session.header("Trips");

    session.send(DomEvent::ListChildrenChanged);

    assert_eq!(session.header("Trips"), before);
    let bundled = session
        .events()
        .iter()
        .filter(|e| e.starts_with("Bundled"))
        .count();
    assert_eq!(bundled, 1);
}

#[test]
fn include_mode_bundles_only_listed_labels() {
    let settings = Settings {
        exclude: false,
        labels: vec!["bank".to_string()],
        ..Default::default()
    };
    let session = Session::start(INBOX, inbox(), settings);

    let labels: Vec<_> = header_labels(session.dom())
        .into_iter()
        .map(|(label, _, _)| label)
        .collect();
    assert_eq!(labels, vec!["Bank".to_string()]);
}

// ============================================================================
// Open / Close Tests
// ============================================================================

#[test]
fn open_and_close_round_trip() {
    let mut session = Session::inbox();
    let snapshot = |dom: &MemoryDom| -> Vec<(Option<u32>, String)> {
        dom.message_rows()
            .iter()
            .map(|m| (dom.order(&m.id), dom.class_list(&m.id)))
            .collect()
    };
    let before = snapshot(session.dom());

    session.send(DomEvent::HeaderClicked("Trips".to_string()));
    assert!(session.visible("t1") && session.visible("t2"));
    assert!(!session.visible("k1"));
    assert!(session.dom().panel().is_some());

    session.send(DomEvent::HeaderClicked("Trips".to_string()));
    assert_eq!(snapshot(session.dom()), before);
    assert_eq!(session.dom().panel(), None);
    assert!(session
        .events()
        .ends_with(&["BundleOpened(\"Trips\")".to_string(), "BundlesClosed".to_string()]));
}

#[test]
fn redraw_reopens_the_remembered_bundle() {
    let mut session = Session::inbox();
    session.send(DomEvent::HeaderClicked("Trips".to_string()));

    session.redraw(inbox());

    assert!(session.visible("t2"));
    assert_eq!(session.coordinator.mail().open_label(), Some("Trips"));
    let header = session.header("Trips");
    assert!(session.dom().has_class(&header, classes::VISIBLE));
}

#[test]
fn fresh_navigation_starts_closed() {
    let mut session = Session::inbox();
    session.send(DomEvent::HeaderClicked("Trips".to_string()));

    session.send(DomEvent::MouseDown(MouseTarget::Navigation));
    session.redraw(inbox());

    assert!(!session.visible("t1"));
    assert_eq!(session.coordinator.mail().open_label(), None);
}

#[test]
fn tabs_keep_separate_registries() {
    let mut session = Session::inbox();

    session.coordinator.dom_mut().host_select_tab(Some("Social"));
    session.coordinator.dom_mut().host_redraw(vec![
        MessageRow::new("f1", on(15, 7)).with_labels(["Friends"]),
    ]);
    session.send(DomEvent::TabPanelsChanged);

    let social = session.coordinator.page_key();
    assert!(session.coordinator.mail().bundle(&social, "Friends").is_some());
    assert!(session.coordinator.mail().bundle(&social, "Trips").is_none());
}

// ============================================================================
// Handler Tests
// ============================================================================

#[test]
fn unstar_scrolls_the_bundle_into_the_message_slot() {
    let rows = |starred: bool| {
        let s = MessageRow::new("s", "").with_labels(["Trips"]);
        vec![
            MessageRow::new("a", ""),
            MessageRow::new("b", ""),
            if starred { s.starred() } else { s },
            MessageRow::new("t1", "").with_labels(["Trips"]),
        ]
    };
    let mut session = Session::start(INBOX, rows(true), Settings::default());
    session.coordinator.dom_mut().set_scroll_top(30.0);
    let message_top = session.dom().row_client_top(&RowId::from("s")).unwrap();

    session.send(DomEvent::StarPressed {
        row: RowId::from("s"),
        toggle: StarToggle::Unstar,
    });
    session.redraw(rows(false));

    let header = session.header("Trips");
    assert!(session.visible("s"));
    assert_eq!(session.dom().row_client_top(&header), Some(message_top));
}

#[test]
fn host_selection_styling_keeps_bundle_classes() {
    let mut session = Session::inbox();
    session.send(DomEvent::HeaderClicked("Trips".to_string()));
    let t2 = RowId::from("t2");

    let old = session.coordinator.dom_mut().host_set_selected(&t2, true);
    session.send(DomEvent::MessageClassChanged(ClassChange::new("t2", old)));

    let dom = session.dom();
    assert!(dom.has_class(&t2, classes::BUNDLED_MESSAGE));
    assert!(dom.has_class(&t2, classes::VISIBLE));
    assert!(dom.has_class(&t2, classes::LAST));
    assert!(dom.has_class(&session.header("Trips"), classes::SELECTED));
    assert!(!dom.bulk_actions_enabled(&session.header("Bank")));
    assert_eq!(dom.guarded_writes(), 0);
}

#[test]
fn shift_click_follows_visual_order() {
    let mut session = Session::inbox();
    session.send(DomEvent::HeaderClicked("Trips".to_string()));

    session.send(DomEvent::CheckboxClicked(CheckboxClick::at("a", 4.0, 4.0)));
    session.send(DomEvent::CheckboxClicked(
        CheckboxClick::at("t2", 4.0, 4.0).with_shift(),
    ));

    let dom = session.dom();
    let checked: Vec<_> = ["a", "t1", "k1", "t2", "s"]
        .iter()
        .map(|id| dom.is_checked(&RowId::from(*id)))
        .collect();
    assert_eq!(checked, vec![true, true, false, true, false]);
}

#[tokio::test(start_paused = true)]
async fn bulk_archive_waits_for_the_toolbar() {
    let mut session = Session::open(INBOX, inbox(), Settings::default()).await;
    let (archive_tx, archive_rx) = watch::channel(false);
    let (_delete_tx, delete_rx) = watch::channel(false);
    let mut toolbar = ToolbarSignals::new(archive_rx, delete_rx);

    let enable = async {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        archive_tx.send_replace(true);
    };
    let selection = BulkSelection::Bundle("Trips".to_string());
    let (done, ()) = tokio::join!(
        session
            .coordinator
            .bulk_action(BulkAction::Archive, &selection, &mut toolbar),
        enable
    );

    assert!(done.unwrap());
    let dom = session.dom();
    assert!(dom.is_checked(&RowId::from("t1")));
    assert!(dom.is_checked(&RowId::from("t2")));
    assert!(!dom.is_checked(&RowId::from("k1")));
    assert!(!dom.is_checked(&RowId::from("a")));
    let expected: Vec<_> = ACTIVATION_SEQUENCE
        .iter()
        .map(|e| (ToolbarControl::Archive, *e))
        .collect();
    assert_eq!(dom.dispatched(), expected.as_slice());
    assert!(session
        .events()
        .contains(&"BulkActionDispatched { action: Archive, rows: 2 }".to_string()));
}

#[tokio::test]
async fn divider_section_can_be_selected() {
    let mut session = Session::open(INBOX, inbox(), Settings::default()).await;
    let (_archive_tx, archive_rx) = watch::channel(false);
    let (_delete_tx, delete_rx) = watch::channel(false);
    let mut toolbar = ToolbarSignals::new(archive_rx, delete_rx);

    let yesterday = session
        .dom()
        .dividers()
        .into_iter()
        .find(|(_, d)| d.kind == DividerKind::Yesterday)
        .unwrap()
        .1;
    let selection = BulkSelection::Section(yesterday.members);
    let done = session
        .coordinator
        .bulk_action(BulkAction::Select, &selection, &mut toolbar)
        .await
        .unwrap();

    assert!(done);
    assert!(session.dom().is_checked(&RowId::from("k1")));
    assert!(session.dom().dispatched().is_empty());
}

#[tokio::test]
async fn bulk_action_on_unknown_bundle_fails() {
    let mut session = Session::open(INBOX, inbox(), Settings::default()).await;
    let (_archive_tx, archive_rx) = watch::channel(true);
    let (_delete_tx, delete_rx) = watch::channel(true);
    let mut toolbar = ToolbarSignals::new(archive_rx, delete_rx);

    let err = session
        .coordinator
        .bulk_action(
            BulkAction::Delete,
            &BulkSelection::Bundle("Nope".to_string()),
            &mut toolbar,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BundlingError::UnknownBundle(label) if label == "Nope"));
}

// ============================================================================
// Starred Page Tests
// ============================================================================

#[test]
fn starred_page_gets_dividers_only() {
    let rows = vec![
        MessageRow::new("s1", on(15, 9)).with_labels(["Inbox", "Trips"]).starred(),
        MessageRow::new("s2", on(14, 9)).with_labels(["Inbox"]).starred(),
    ];
    let mut session = Session::start(STARRED, rows, Settings::default());

    let dom = session.dom();
    assert!(dom.headers().is_empty());
    let kinds: Vec<_> = dom.dividers().into_iter().map(|(_, d)| (d.kind, d.order)).collect();
    assert_eq!(
        kinds,
        vec![(DividerKind::Today, 0), (DividerKind::Yesterday, 2)]
    );
    assert!(dom.is_label_hidden(&RowId::from("s1"), "Inbox"));
    assert!(session.pinned.is_observing());

    session.coordinator.dom_mut().host_redraw(vec![
        MessageRow::new("s2", on(14, 9)).with_labels(["Inbox"]).starred(),
    ]);
    session.send(DomEvent::PinnedListChanged);
    let kinds: Vec<_> = session
        .dom()
        .dividers()
        .into_iter()
        .map(|(_, d)| d.kind)
        .collect();
    assert_eq!(kinds, vec![DividerKind::Yesterday]);
    assert_eq!(session.dom().guarded_writes(), 0);
}

// ============================================================================
// Startup Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn bootstrap_waits_for_a_slow_page() {
    let list = MemoryWatcher::new();
    let store = MemorySettingsStore::new(Settings {
        labels: vec!["trips".to_string()],
        ..Default::default()
    });

    let coordinator = bootstrap(
        MemoryDom::loading_until(5, inbox()),
        watchers(&list, &MemoryWatcher::new()),
        INBOX,
        &store,
        EventBus::new(),
    )
    .await
    .unwrap();

    let labels: Vec<_> = header_labels(coordinator.dom())
        .into_iter()
        .map(|(label, _, _)| label)
        .collect();
    assert_eq!(labels, vec!["Bank".to_string()]);
    assert!(list.is_observing());
}

#[tokio::test(start_paused = true)]
async fn bootstrap_gives_up_and_notifies() {
    let bus = EventBus::new();
    let notified = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notified);
    bus.subscribe(move |event| {
        if let AppEvent::ShowNotification(n) = event {
            sink.lock().unwrap().push(n.title.clone());
        }
    });

    let err = bootstrap(
        MemoryDom::loading(),
        watchers(&MemoryWatcher::new(), &MemoryWatcher::new()),
        INBOX,
        &MemorySettingsStore::default(),
        bus,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<BundlingError>(),
        Some(BundlingError::StartupTimeout { .. })
    ));
    assert_eq!(
        *notified.lock().unwrap(),
        vec!["inboxy was unable to bundle messages.".to_string()]
    );
}

#[tokio::test]
async fn bootstrap_warns_about_unreadable_settings() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let store = JsonSettingsStore::new(file.path());

    let bus = EventBus::new();
    let notified = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notified);
    bus.subscribe(move |event| {
        if let AppEvent::ShowNotification(n) = event {
            sink.lock().unwrap().push((n.level, n.title.clone()));
        }
    });

    let coordinator = bootstrap(
        MemoryDom::new(inbox()),
        watchers(&MemoryWatcher::new(), &MemoryWatcher::new()),
        INBOX,
        &store,
        bus,
    )
    .await
    .unwrap();

    assert_eq!(
        *notified.lock().unwrap(),
        vec![(
            NotificationLevel::Warning,
            "inboxy could not read its settings.".to_string()
        )]
    );
    assert_eq!(header_labels(coordinator.dom()).len(), 2);
}

#[tokio::test]
async fn bootstrap_rejects_a_bad_url() {
    let err = bootstrap(
        MemoryDom::new(inbox()),
        watchers(&MemoryWatcher::new(), &MemoryWatcher::new()),
        "inbox",
        &MemorySettingsStore::default(),
        EventBus::new(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Failed to parse page url"));
}
