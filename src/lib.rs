//! inboxy - Inbox-style bundles for a webmail message list
//!
//! This crate groups the messages of a webmail inbox page into one
//! collapsible bundle per label and partitions the list with date
//! dividers, without ever moving the host's own row nodes. The host page is
//! reached through the traits in [`dom`]; [`app::Coordinator`] reacts to
//! the host's mutations and the user's clicks.

pub mod app;
pub mod bundling;
pub mod config;
pub mod dom;
pub mod domain;
pub mod handlers;
pub mod page;

pub use app::{bootstrap, init_logging, Coordinator, DomEvent};
pub use bundling::{Bundler, BundlingError};
pub use config::{Settings, SharedSettings};
