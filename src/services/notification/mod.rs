use anyhow::Result;
use notify_rust::{Notification, Timeout};

/// Desktop notification sink for schedule alerts.
///
/// The tracker decides *when* to alert; this service only attempts the
/// delivery. Callers swallow delivery failures: the tracker has already
/// recorded the attempt, so a denied notification is never retried.
pub struct NotificationService {
    enabled: bool,
}

impl NotificationService {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Check if notifications are enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable notifications
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Show a pre-event schedule alert. Alerts stay up longer than casual
    /// notifications since the user may be away from the screen.
    pub fn send_alert(&self, title: &str, body: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        Notification::new()
            .summary(title)
            .body(body)
            .timeout(Timeout::Milliseconds(10000))
            .show()
            .map_err(|e| anyhow::anyhow!("Failed to show notification: {}", e))?;

        Ok(())
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}
