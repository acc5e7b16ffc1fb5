//! Waiting for the host page to load.
//!
//! The script can be injected before the host has built its list, so the
//! first cycle polls for it at a fixed interval and gives up after a bounded
//! number of attempts.

use std::time::Duration;

use tokio::time::sleep;
use tracing::trace;
use uuid::Uuid;

use crate::bundling::{BundlingError, Result};

use super::Notification;

/// Delay between two presence checks.
pub const RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Presence checks before startup fails.
pub const MAX_ATTEMPTS: u32 = 60;

/// Shown when startup fails.
pub const FAILURE_TITLE: &str = "inboxy was unable to bundle messages.";

/// Shown under [`FAILURE_TITLE`].
pub const FAILURE_HINT: &str = "To try again, refresh the page.";

/// Shown when the settings could not be read.
pub const SETTINGS_TITLE: &str = "inboxy could not read its settings.";

/// Shown under [`SETTINGS_TITLE`].
pub const SETTINGS_HINT: &str = "Bundling uses the default settings for now.";

/// Calls `probe` every [`RETRY_INTERVAL`] until it returns `true`.
///
/// Returns the number of the successful attempt, starting at 1.
pub async fn retry_until<F>(mut probe: F) -> Result<u32>
where
    F: FnMut() -> bool,
{
    for attempt in 1..=MAX_ATTEMPTS {
        if probe() {
            return Ok(attempt);
        }
        trace!(attempt, "host page not ready");
        sleep(RETRY_INTERVAL).await;
    }

    Err(BundlingError::StartupTimeout {
        attempts: MAX_ATTEMPTS,
    })
}

/// The user-visible notification for a failed startup.
pub fn failure_notification() -> Notification {
    Notification::error(Uuid::new_v4().to_string(), FAILURE_TITLE).with_body(FAILURE_HINT)
}

/// The user-visible notification for settings that failed to load.
pub fn settings_notification() -> Notification {
    Notification::warning(Uuid::new_v4().to_string(), SETTINGS_TITLE).with_body(SETTINGS_HINT)
}
