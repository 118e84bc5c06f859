//! Notifier implementations for the scheduling engine.

use std::time::Duration;

use agenda_core::errors::{AgendaError, AgendaResult};
use agenda_core::notifier::{AppointmentNotification, NotificationReceipt, Notifier};
use async_trait::async_trait;
use eyre::{eyre, Result};
use tracing::debug;

pub const NOTIFICATION_PATH: &str = "/api/send-appointment-notification";

/// Posts notifications as JSON to the notification service.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNotifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), NOTIFICATION_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send_appointment_notification(
        &self,
        notification: &AppointmentNotification,
    ) -> AgendaResult<NotificationReceipt> {
        debug!(
            "Sending notification for appointment {} to {}",
            notification.appointment_id, self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(notification)
            .send()
            .await
            .map_err(|e| {
                AgendaError::Dependency(
                    eyre::Report::new(e).wrap_err("Error reaching notification service"),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgendaError::Dependency(eyre!(
                "Notification service returned {}: {}",
                status,
                error_text
            )));
        }

        response.json::<NotificationReceipt>().await.map_err(|e| {
            AgendaError::Dependency(
                eyre::Report::new(e).wrap_err("Invalid notification service response"),
            )
        })
    }
}

/// Stand-in used when no notification service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send_appointment_notification(
        &self,
        notification: &AppointmentNotification,
    ) -> AgendaResult<NotificationReceipt> {
        debug!(
            "Notifications disabled, skipping appointment {}",
            notification.appointment_id
        );
        Ok(NotificationReceipt {
            message: "Notifications disabled".to_string(),
            success: false,
        })
    }
}
