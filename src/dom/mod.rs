//! The narrow surface the bundler needs from the host page.
//!
//! The host application forbids physically reordering its row nodes, so the
//! bundled view is produced entirely through the calls below: a numeric
//! visual order per row, marker classes, synthesized header and divider
//! rows appended to the list container, and a floating panel.
//!
//! [`memory::MemoryDom`] implements the whole surface in memory for tests
//! and headless use; a browser binding implements the same traits over the
//! real document.

pub mod memory;
mod watch;

use serde::{Deserialize, Serialize};

use crate::domain::{DividerKind, LabelStyle, MessageRow, RowId};

pub use watch::{MessageWatchers, PauseGuard, Watcher, Watchers};

/// Marker classes written onto rows.
pub mod classes {
    /// A message that belongs to a bundle (hidden unless [`VISIBLE`]).
    pub const BUNDLED_MESSAGE: &str = "bundled-message";
    /// A synthesized bundle header row.
    pub const BUNDLE_ROW: &str = "bundle-row";
    /// A synthesized date divider row.
    pub const DATE_ROW: &str = "date-row";
    /// An open bundle's header or member.
    pub const VISIBLE: &str = "visible";
    /// The last member of the open bundle.
    pub const LAST: &str = "last";
    /// The host's own "row is selected" class.
    pub const SELECTED: &str = "x7";
}

/// A bundle header row to be appended to the list container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleHeader {
    /// Label title shown on the header.
    pub label: String,
    /// Chip colors to paint the header with, when label colors are enabled.
    pub style: Option<LabelStyle>,
    /// Visual order of the header.
    pub order: u32,
    /// Member count as displayed (`3`, `25+`).
    pub count: String,
    /// Whether any member is unread.
    pub unread: bool,
    /// Target of the header's "View all" link.
    pub view_all_url: String,
    /// Member row ids, for the header's bulk actions.
    pub members: Vec<RowId>,
}

/// A date divider row to be appended to the list container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividerRow {
    /// Section the divider opens.
    pub kind: DividerKind,
    /// Visual order of the divider.
    pub order: u32,
    /// Messages in the section, for the divider's bulk archive.
    pub members: Vec<RowId>,
}

/// Layout box of a row relative to the list container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBox {
    /// Distance from the top of the list container.
    pub offset_top: f64,
    /// Rendered height.
    pub height: f64,
}

impl RowBox {
    /// Bottom edge relative to the list container.
    pub fn bottom(&self) -> f64 {
        self.offset_top + self.height
    }
}

/// Position and size of the floating panel behind an open bundle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    /// Top edge relative to the list container.
    pub top: f64,
    /// Panel height.
    pub height: f64,
}

/// Toolbar controls of the host that bulk actions drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarControl {
    /// The host's archive button.
    Archive,
    /// The host's delete button.
    Delete,
}

/// Synthetic pointer events dispatched on a host control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    MouseOver,
    MouseDown,
    Click,
    MouseUp,
}

/// The event sequence that activates a host control.
pub const ACTIVATION_SEQUENCE: [PointerEvent; 4] = [
    PointerEvent::MouseOver,
    PointerEvent::MouseDown,
    PointerEvent::Click,
    PointerEvent::MouseUp,
];

/// Reads and writes on the message list container.
pub trait MessageList {
    /// Whether the host's main content area exists yet.
    fn has_main(&self) -> bool;

    /// Whether the message list container exists yet.
    fn has_message_list(&self) -> bool;

    /// Name of the selected inbox tab, if the inbox has tabs.
    fn current_tab(&self) -> Option<String>;

    /// Snapshots of the message rows, in document order.
    fn message_rows(&self) -> Vec<MessageRow>;

    /// Snapshot of one message row.
    fn message_row(&self, id: &RowId) -> Option<MessageRow>;

    /// Whether the list still carries the marker set after the last render.
    fn is_marked_bundled(&self) -> bool;

    /// Sets the marker; the host drops it whenever it redraws the list.
    fn mark_bundled(&mut self);

    /// Visual order of a row, if one is set.
    fn order(&self, row: &RowId) -> Option<u32>;

    /// Sets or clears a row's visual order.
    fn set_order(&mut self, row: &RowId, order: Option<u32>);

    /// Whether a row carries a class.
    fn has_class(&self, row: &RowId, class: &str) -> bool;

    /// Adds a class to a row.
    fn add_class(&mut self, row: &RowId, class: &str);

    /// Removes a class from a row.
    fn remove_class(&mut self, row: &RowId, class: &str);

    /// Rows carrying every one of `classes`, in document order.
    fn rows_with_classes(&self, classes: &[&str]) -> Vec<RowId>;

    /// Hides or shows a row's label chip with the given title.
    fn set_label_hidden(&mut self, row: &RowId, label: &str, hidden: bool);

    /// Shows every label chip on a row.
    fn show_all_labels(&mut self, row: &RowId);

    /// Removes synthesized rows carrying `class`.
    fn remove_synthesized_rows(&mut self, class: &str);

    /// Appends a bundle header row and returns its id.
    fn append_bundle_header(&mut self, header: BundleHeader) -> RowId;

    /// Appends a divider row and returns its id.
    fn append_divider(&mut self, divider: DividerRow) -> RowId;

    /// Whether a header's bulk actions are enabled.
    fn bulk_actions_enabled(&self, header: &RowId) -> bool;

    /// Enables or disables a header's bulk actions.
    fn set_bulk_actions_enabled(&mut self, header: &RowId, enabled: bool);
}

/// Layout and scrolling.
pub trait Viewport {
    /// Layout box of a rendered row; `None` when the row is hidden or gone.
    fn row_box(&self, row: &RowId) -> Option<RowBox>;

    /// Top of a row in client (window) coordinates.
    fn row_client_top(&self, row: &RowId) -> Option<f64>;

    /// Top of the scroll container in client coordinates.
    fn scroll_container_top(&self) -> f64;

    /// Current scroll offset of the scroll container.
    fn scroll_top(&self) -> f64;

    /// Sets the scroll offset of the scroll container.
    fn set_scroll_top(&mut self, top: f64);

    /// Shows the floating panel at the given geometry, or hides it.
    fn set_panel(&mut self, panel: Option<PanelGeometry>);
}

/// Simulated interaction with the host's own controls.
pub trait HostActions {
    /// Whether a message row's checkbox is checked.
    fn is_checked(&self, row: &RowId) -> bool;

    /// Clicks a message row's checkbox.
    fn click_checkbox(&mut self, row: &RowId);

    /// Dispatches a synthetic pointer event on a toolbar control.
    fn dispatch(&mut self, control: ToolbarControl, event: PointerEvent);
}

/// Everything the bundler touches on the host page.
pub trait MailDom: MessageList + Viewport + HostActions {}

impl<T: MessageList + Viewport + HostActions> MailDom for T {}
