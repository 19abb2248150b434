//! Desktop notifications, via `notify-send` or notify-rust (D-Bus).

use notify_rust::{Notification, Timeout};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::{NotificationBackend, NotificationConfig};
use crate::error::{self, DeliveryError};

pub struct Notifier {
    backend: NotificationBackend,
    command: String,
    title: String,
    icon: String,
    timeout_ms: u32,
}

impl Notifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            backend: config.backend,
            command: config.command.clone(),
            title: config.title.clone(),
            icon: config.icon.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    /// Show `message` under the configured title. Failures are logged only.
    pub async fn notify(&self, message: &str) {
        debug!("Notification: {} / {message}", self.title);

        if let Err(e) = self.try_notify(message).await {
            warn!("Error sending notification: {}", error::chain(&e));
        }
    }

    async fn try_notify(&self, message: &str) -> Result<(), DeliveryError> {
        match self.backend {
            NotificationBackend::Command => self.notify_with_command(message).await,
            NotificationBackend::Dbus => self.notify_with_dbus(message),
        }
    }

    async fn notify_with_command(&self, message: &str) -> Result<(), DeliveryError> {
        let status = Command::new(&self.command)
            .arg(&self.title)
            .arg(message)
            .status()
            .await
            .map_err(|source| DeliveryError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DeliveryError::Status {
                command: self.command.clone(),
                status,
            });
        }
        Ok(())
    }

    fn notify_with_dbus(&self, message: &str) -> Result<(), DeliveryError> {
        let timeout = match self.timeout_ms {
            0 => Timeout::Default,
            ms => Timeout::Milliseconds(ms),
        };

        Notification::new()
            .summary(&self.title)
            .body(message)
            .icon(&self.icon)
            .timeout(timeout)
            .show()?;
        Ok(())
    }
}
