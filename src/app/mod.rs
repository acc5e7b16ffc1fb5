//! Application lifecycle: logging, startup and the event coordinator.

mod coordinator;
mod events;
pub mod startup;

use anyhow::{Context, Result};
use tracing::warn;

use crate::bundling::Bundler;
use crate::config::{SettingsStore, SharedSettings};
use crate::dom::{MailDom, Watchers};
use crate::page::PageLocation;

pub use coordinator::{BulkSelection, Coordinator, DomEvent, MouseTarget};
pub use events::{AppEvent, EventBus, EventHandler, Notification, NotificationLevel, SubscriberId};

/// Installs the global `tracing` subscriber. `RUST_LOG` refines the
/// default `info` level; a second call is a no-op.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Builds a coordinator for the page at `url` and starts it.
///
/// Settings are loaded from `store` while startup waits for the host page;
/// if the load fails the defaults stay in effect and a warning is published.
pub async fn bootstrap<D: MailDom>(
    dom: D,
    watchers: Watchers,
    url: &str,
    store: &dyn SettingsStore,
    events: EventBus,
) -> Result<Coordinator<D>> {
    let location =
        PageLocation::parse(url).with_context(|| format!("Failed to parse page url {url}"))?;

    let settings = SharedSettings::new();
    let bundler = Bundler::new(settings.clone());
    let mut coordinator = Coordinator::new(dom, watchers, location, bundler, events.clone());

    let (loaded, started) = tokio::join!(settings.load_from(store), coordinator.start());
    if let Err(err) = loaded {
        warn!(%err, "failed to load settings, using defaults");
        events.publish(AppEvent::ShowNotification(startup::settings_notification()));
    }
    started.context("Failed to start bundling")?;

    tracing::debug!(url, "bootstrap complete");
    Ok(coordinator)
}
