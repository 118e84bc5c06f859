//! Request and response records of the agenda operations.
//!
//! Timestamps travel as strings so the engine can report format errors with
//! the offending field instead of a generic deserialization failure.

use serde::{Deserialize, Serialize};

use super::appointment::{AppointmentId, ClientId, ScheduledAppointment};
use super::slot::{ProfessionalId, Slot, SlotId};
use crate::time::format_instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub professional_id: ProfessionalId,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotResponse {
    pub message: String,
    pub success: bool,
    pub slot_id: SlotId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAvailableSlotsRequest {
    pub professional_id: ProfessionalId,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResponse {
    pub id: SlotId,
    pub professional_id: ProfessionalId,
    pub start_time: String,
    pub end_time: String,
    pub available: bool,
}

impl From<&Slot> for SlotResponse {
    fn from(slot: &Slot) -> Self {
        Self {
            id: slot.id,
            professional_id: slot.professional_id,
            start_time: format_instant(slot.start_time),
            end_time: format_instant(slot.end_time),
            available: slot.available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAvailableSlotsResponse {
    pub slots: Vec<SlotResponse>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub client_id: ClientId,
    pub slot_id: SlotId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentResponse {
    pub message: String,
    pub success: bool,
    pub appointment_id: AppointmentId,
}

/// Both filters are optional; `0` is treated like an absent value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAppointmentsRequest {
    pub client_id: Option<ClientId>,
    pub professional_id: Option<ProfessionalId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: AppointmentId,
    pub client_id: ClientId,
    pub slot_id: SlotId,
    pub start_time: String,
    pub end_time: String,
    pub professional_id: ProfessionalId,
}

impl From<&ScheduledAppointment> for AppointmentResponse {
    fn from(scheduled: &ScheduledAppointment) -> Self {
        Self {
            id: scheduled.appointment.id,
            client_id: scheduled.appointment.client_id,
            slot_id: scheduled.appointment.slot_id,
            start_time: format_instant(scheduled.start_time),
            end_time: format_instant(scheduled.end_time),
            professional_id: scheduled.appointment.professional_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAppointmentsResponse {
    pub appointments: Vec<AppointmentResponse>,
    pub success: bool,
}
