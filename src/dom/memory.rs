//! In-memory implementation of the host surface.
//!
//! `MemoryDom` models the list container as a flat list of elements in
//! document order and lays them out the way a flex column would: visible
//! rows sorted by visual order (unset counts as 0), ties broken by document
//! order, each `row_height` tall. Methods prefixed `host_` simulate what the
//! host application does on its own.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use uuid::Uuid;

use super::{
    classes, BundleHeader, DividerRow, HostActions, MessageList, MessageWatchers, PanelGeometry,
    PointerEvent, RowBox, ToolbarControl, Viewport, Watcher,
};
use crate::domain::{MessageRow, RowId};

/// Default rendered height of every row.
pub const DEFAULT_ROW_HEIGHT: f64 = 40.0;

#[derive(Debug, Clone)]
enum Content {
    Message(MessageRow),
    Header(BundleHeader),
    Divider(DividerRow),
}

#[derive(Debug, Clone)]
struct Element {
    id: RowId,
    content: Content,
    classes: BTreeSet<String>,
    order: Option<u32>,
    hidden_labels: BTreeSet<String>,
    bulk_enabled: bool,
}

impl Element {
    fn message(row: MessageRow) -> Self {
        let mut classes = BTreeSet::new();
        if row.selected {
            classes.insert(classes::SELECTED.to_string());
        }
        Self {
            id: row.id.clone(),
            content: Content::Message(row),
            classes,
            order: None,
            hidden_labels: BTreeSet::new(),
            bulk_enabled: true,
        }
    }

    fn synthesized(content: Content, class: &str, order: u32) -> Self {
        Self {
            id: RowId::from(format!("inboxy-{}", Uuid::new_v4())),
            content,
            classes: BTreeSet::from([class.to_string()]),
            order: Some(order),
            hidden_labels: BTreeSet::new(),
            bulk_enabled: true,
        }
    }

    fn is_displayed(&self) -> bool {
        match self.content {
            Content::Message(_) => {
                !self.classes.contains(classes::BUNDLED_MESSAGE)
                    || self.classes.contains(classes::VISIBLE)
            }
            Content::Header(_) | Content::Divider(_) => true,
        }
    }

    fn snapshot(&self) -> Option<MessageRow> {
        match &self.content {
            Content::Message(row) => {
                let mut row = row.clone();
                row.selected = self.classes.contains(classes::SELECTED);
                Some(row)
            }
            Content::Header(_) | Content::Divider(_) => None,
        }
    }
}

/// In-memory message list, viewport and host toolbar.
#[derive(Debug)]
pub struct MemoryDom {
    elements: Vec<Element>,
    has_main: Cell<bool>,
    has_list: Cell<bool>,
    loading_probes: Cell<Option<u32>>,
    tab: Option<String>,
    marked: bool,
    panel: Option<PanelGeometry>,
    scroll_top: f64,
    container_top: f64,
    row_height: f64,
    dispatched: Vec<(ToolbarControl, PointerEvent)>,
    write_guards: Vec<Rc<Cell<bool>>>,
    guarded_writes: usize,
}

impl MemoryDom {
    /// Creates a loaded page whose list holds `rows`.
    pub fn new(rows: Vec<MessageRow>) -> Self {
        Self {
            elements: rows.into_iter().map(Element::message).collect(),
            has_main: Cell::new(true),
            has_list: Cell::new(true),
            loading_probes: Cell::new(None),
            tab: None,
            marked: false,
            panel: None,
            scroll_top: 0.0,
            container_top: 0.0,
            row_height: DEFAULT_ROW_HEIGHT,
            dispatched: Vec::new(),
            write_guards: Vec::new(),
            guarded_writes: 0,
        }
    }

    /// Creates a page that has not rendered its main area yet.
    pub fn loading() -> Self {
        let dom = Self::new(Vec::new());
        dom.has_main.set(false);
        dom.has_list.set(false);
        dom
    }

    /// Creates a page holding `rows` that finishes loading after `probes`
    /// failed presence checks.
    pub fn loading_until(probes: u32, rows: Vec<MessageRow>) -> Self {
        let dom = Self::new(rows);
        dom.has_main.set(false);
        dom.has_list.set(false);
        dom.loading_probes.set(Some(probes));
        dom
    }

    /// Sets the selected inbox tab.
    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = Some(tab.into());
        self
    }

    /// Sets the client-coordinate top of the scroll container.
    pub fn with_container_top(mut self, top: f64) -> Self {
        self.container_top = top;
        self
    }

    /// Counts writes made while `flag` is set.
    ///
    /// Pass the flag of a [`MemoryWatcher`] to detect writes it would have
    /// reported.
    pub fn count_writes_while(&mut self, flag: Rc<Cell<bool>>) {
        self.write_guards.push(flag);
    }

    /// Number of writes made while a guarded watcher was armed.
    pub fn guarded_writes(&self) -> usize {
        self.guarded_writes
    }

    /// Host finishes loading its scaffolding.
    pub fn host_finish_loading(&mut self) {
        self.has_main.set(true);
        self.has_list.set(true);
        self.loading_probes.set(None);
    }

    /// Host redraws the list from scratch, dropping every synthesized row,
    /// order and class along with the bundled marker.
    pub fn host_redraw(&mut self, rows: Vec<MessageRow>) {
        self.elements = rows.into_iter().map(Element::message).collect();
        self.marked = false;
    }

    /// Host switches inbox tab.
    pub fn host_select_tab(&mut self, tab: Option<&str>) {
        self.tab = tab.map(str::to_string);
    }

    /// Host applies its selection styling, replacing the row's class list
    /// with its own classes. Returns the class list before the change.
    pub fn host_set_selected(&mut self, id: &RowId, selected: bool) -> String {
        let Some(element) = self.element_mut(id) else {
            return String::new();
        };
        let old = element.classes.iter().cloned().collect::<Vec<_>>().join(" ");
        element.classes.clear();
        if selected {
            element.classes.insert(classes::SELECTED.to_string());
        }
        old
    }

    /// Space-separated class list of a row.
    pub fn class_list(&self, id: &RowId) -> String {
        self.element(id)
            .map(|e| e.classes.iter().cloned().collect::<Vec<_>>().join(" "))
            .unwrap_or_default()
    }

    /// Whether a chip with `label` is hidden on the row.
    pub fn is_label_hidden(&self, id: &RowId, label: &str) -> bool {
        self.element(id)
            .is_some_and(|e| e.hidden_labels.contains(label))
    }

    /// Synthesized header rows in document order.
    pub fn headers(&self) -> Vec<(RowId, BundleHeader)> {
        self.elements
            .iter()
            .filter_map(|e| match &e.content {
                Content::Header(h) => Some((e.id.clone(), h.clone())),
                Content::Message(_) | Content::Divider(_) => None,
            })
            .collect()
    }

    /// Synthesized divider rows in document order.
    pub fn dividers(&self) -> Vec<(RowId, DividerRow)> {
        self.elements
            .iter()
            .filter_map(|e| match &e.content {
                Content::Divider(d) => Some((e.id.clone(), d.clone())),
                Content::Message(_) | Content::Header(_) => None,
            })
            .collect()
    }

    /// Displayed rows in visual order.
    pub fn visual_rows(&self) -> Vec<RowId> {
        self.layout().into_iter().map(|(id, _)| id).collect()
    }

    /// Current panel geometry.
    pub fn panel(&self) -> Option<PanelGeometry> {
        self.panel
    }

    /// Pointer events dispatched on toolbar controls so far.
    pub fn dispatched(&self) -> &[(ToolbarControl, PointerEvent)] {
        &self.dispatched
    }

    fn element(&self, id: &RowId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    fn element_mut(&mut self, id: &RowId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    fn poll_loading(&self) {
        match self.loading_probes.get() {
            Some(0) => {
                self.has_main.set(true);
                self.has_list.set(true);
                self.loading_probes.set(None);
            }
            Some(left) => self.loading_probes.set(Some(left - 1)),
            None => {}
        }
    }

    fn note_write(&mut self) {
        if self.write_guards.iter().any(|flag| flag.get()) {
            self.guarded_writes += 1;
        }
    }

    fn layout(&self) -> Vec<(RowId, RowBox)> {
        let mut displayed: Vec<(usize, &Element)> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_displayed())
            .collect();
        displayed.sort_by_key(|(index, e)| (e.order.unwrap_or(0), *index));

        displayed
            .into_iter()
            .enumerate()
            .map(|(position, (_, e))| {
                let row_box = RowBox {
                    offset_top: position as f64 * self.row_height,
                    height: self.row_height,
                };
                (e.id.clone(), row_box)
            })
            .collect()
    }
}

impl MessageList for MemoryDom {
    fn has_main(&self) -> bool {
        self.poll_loading();
        self.has_main.get()
    }

    fn has_message_list(&self) -> bool {
        self.poll_loading();
        self.has_list.get()
    }

    fn current_tab(&self) -> Option<String> {
        self.tab.clone()
    }

    fn message_rows(&self) -> Vec<MessageRow> {
        self.elements.iter().filter_map(Element::snapshot).collect()
    }

    fn message_row(&self, id: &RowId) -> Option<MessageRow> {
        self.element(id).and_then(Element::snapshot)
    }

    fn is_marked_bundled(&self) -> bool {
        self.marked
    }

    fn mark_bundled(&mut self) {
        self.note_write();
        self.marked = true;
    }

    fn order(&self, row: &RowId) -> Option<u32> {
        self.element(row).and_then(|e| e.order)
    }

    fn set_order(&mut self, row: &RowId, order: Option<u32>) {
        self.note_write();
        if let Some(element) = self.element_mut(row) {
            element.order = order;
        }
    }

    fn has_class(&self, row: &RowId, class: &str) -> bool {
        self.element(row).is_some_and(|e| e.classes.contains(class))
    }

    fn add_class(&mut self, row: &RowId, class: &str) {
        self.note_write();
        if let Some(element) = self.element_mut(row) {
            element.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, row: &RowId, class: &str) {
        self.note_write();
        if let Some(element) = self.element_mut(row) {
            element.classes.remove(class);
        }
    }

    fn rows_with_classes(&self, wanted: &[&str]) -> Vec<RowId> {
        self.elements
            .iter()
            .filter(|e| wanted.iter().all(|c| e.classes.contains(*c)))
            .map(|e| e.id.clone())
            .collect()
    }

    fn set_label_hidden(&mut self, row: &RowId, label: &str, hidden: bool) {
        self.note_write();
        if let Some(element) = self.element_mut(row) {
            if hidden {
                element.hidden_labels.insert(label.to_string());
            } else {
                element.hidden_labels.remove(label);
            }
        }
    }

    fn show_all_labels(&mut self, row: &RowId) {
        self.note_write();
        if let Some(element) = self.element_mut(row) {
            element.hidden_labels.clear();
        }
    }

    fn remove_synthesized_rows(&mut self, class: &str) {
        self.note_write();
        self.elements.retain(|e| {
            matches!(e.content, Content::Message(_)) || !e.classes.contains(class)
        });
    }

    fn append_bundle_header(&mut self, header: BundleHeader) -> RowId {
        self.note_write();
        let order = header.order;
        let element = Element::synthesized(Content::Header(header), classes::BUNDLE_ROW, order);
        let id = element.id.clone();
        self.elements.push(element);
        id
    }

    fn append_divider(&mut self, divider: DividerRow) -> RowId {
        self.note_write();
        let order = divider.order;
        let element = Element::synthesized(Content::Divider(divider), classes::DATE_ROW, order);
        let id = element.id.clone();
        self.elements.push(element);
        id
    }

    fn bulk_actions_enabled(&self, header: &RowId) -> bool {
        self.element(header).is_some_and(|e| e.bulk_enabled)
    }

    fn set_bulk_actions_enabled(&mut self, header: &RowId, enabled: bool) {
        self.note_write();
        if let Some(element) = self.element_mut(header) {
            element.bulk_enabled = enabled;
        }
    }
}

impl Viewport for MemoryDom {
    fn row_box(&self, row: &RowId) -> Option<RowBox> {
        self.layout()
            .into_iter()
            .find(|(id, _)| id == row)
            .map(|(_, row_box)| row_box)
    }

    fn row_client_top(&self, row: &RowId) -> Option<f64> {
        self.row_box(row)
            .map(|b| self.container_top + b.offset_top - self.scroll_top)
    }

    fn scroll_container_top(&self) -> f64 {
        self.container_top
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, top: f64) {
        self.scroll_top = top.max(0.0);
    }

    fn set_panel(&mut self, panel: Option<PanelGeometry>) {
        self.note_write();
        self.panel = panel;
    }
}

impl HostActions for MemoryDom {
    fn is_checked(&self, row: &RowId) -> bool {
        self.has_class(row, classes::SELECTED)
    }

    fn click_checkbox(&mut self, row: &RowId) {
        if let Some(element) = self.element_mut(row) {
            if !element.classes.remove(classes::SELECTED) {
                element.classes.insert(classes::SELECTED.to_string());
            }
        }
    }

    fn dispatch(&mut self, control: ToolbarControl, event: PointerEvent) {
        self.dispatched.push((control, event));
    }
}

/// Watcher whose armed state is a shared flag.
#[derive(Debug, Clone, Default)]
pub struct MemoryWatcher {
    observing: Rc<Cell<bool>>,
    arm_count: Rc<Cell<usize>>,
}

impl MemoryWatcher {
    /// Creates a disarmed watcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared armed flag, for [`MemoryDom::count_writes_while`].
    pub fn flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.observing)
    }

    /// How many times the watcher has been armed.
    pub fn arm_count(&self) -> usize {
        self.arm_count.get()
    }
}

impl Watcher for MemoryWatcher {
    fn observe(&mut self) {
        self.observing.set(true);
        self.arm_count.set(self.arm_count.get() + 1);
    }

    fn disconnect(&mut self) {
        self.observing.set(false);
    }

    fn is_observing(&self) -> bool {
        self.observing.get()
    }
}

/// Per-row watchers recorded as a shared list of watched ids.
#[derive(Debug, Clone, Default)]
pub struct MemoryMessageWatchers {
    watched: Rc<RefCell<Vec<RowId>>>,
}

impl MemoryMessageWatchers {
    /// Creates an empty watcher set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently watched.
    pub fn watched(&self) -> Vec<RowId> {
        self.watched.borrow().clone()
    }
}

impl MessageWatchers for MemoryMessageWatchers {
    fn watch(&mut self, rows: &[RowId]) {
        *self.watched.borrow_mut() = rows.to_vec();
    }

    fn unwatch_all(&mut self) {
        self.watched.borrow_mut().clear();
    }
}
