//! Capability used by the scheduling engine to announce new appointments.
//!
//! The engine never depends on a concrete transport. Deployments inject an
//! HTTP client, tests inject fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AgendaResult;
use crate::models::{AppointmentId, ClientId, ProfessionalId};

/// Payload of `SendAppointmentNotification`. Times are RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentNotification {
    pub client_id: ClientId,
    pub professional_id: ProfessionalId,
    pub appointment_id: AppointmentId,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    pub message: String,
    pub success: bool,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_appointment_notification(
        &self,
        notification: &AppointmentNotification,
    ) -> AgendaResult<NotificationReceipt>;
}
