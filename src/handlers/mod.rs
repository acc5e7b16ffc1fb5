//! Handlers for individual user and host events.
//!
//! Each handler reacts to one kind of event the coordinator receives and
//! patches the rendered list in place; none of them runs a bundling cycle.

pub mod bulk_action;
mod message_select;
mod quick_select;
mod star;

pub use bulk_action::{BulkAction, BulkTarget, ToolbarSignals};
pub use message_select::{handle_class_change, ClassChange};
pub use quick_select::{CheckboxClick, QuickSelect};
pub use star::{StarHandler, StarToggle};
