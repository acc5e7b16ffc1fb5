//! Domain layer types for the bundled message list.
//!
//! This module contains the value types the bundling pipeline works on:
//! scraped message rows, label chips, bundles, date dividers and the
//! row sum type the sequencer emits.

mod bundle;
mod divider;
mod label;
mod message;
mod row;
mod types;

pub use bundle::{Bundle, RenderedBundle, MAX_DISPLAYED_COUNT};
pub use divider::{Divider, DividerKind};
pub use label::{LabelChip, LabelStyle};
pub use message::MessageRow;
pub use row::Row;
pub use types::{PageKey, RowId, NO_TAB};
