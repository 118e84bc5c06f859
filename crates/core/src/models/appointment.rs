use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slot::{ProfessionalId, Slot, SlotId};

pub type AppointmentId = i64;
pub type ClientId = i64;

/// A confirmed booking binding one client to one slot.
///
/// `professional_id` is copied from the slot when the appointment is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub client_id: ClientId,
    pub slot_id: SlotId,
    pub professional_id: ProfessionalId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub client_id: ClientId,
    pub slot_id: SlotId,
    pub professional_id: ProfessionalId,
}

impl NewAppointment {
    pub fn into_appointment(self, id: AppointmentId) -> Appointment {
        Appointment {
            id,
            client_id: self.client_id,
            slot_id: self.slot_id,
            professional_id: self.professional_id,
        }
    }
}

/// Optional filters for listing appointments. `None` leaves a field unrestricted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub client_id: Option<ClientId>,
    pub professional_id: Option<ProfessionalId>,
}

impl AppointmentFilter {
    /// Builds a filter from wire values where `0` means "no filter".
    pub fn from_wire(client_id: ClientId, professional_id: ProfessionalId) -> Self {
        Self {
            client_id: (client_id != 0).then_some(client_id),
            professional_id: (professional_id != 0).then_some(professional_id),
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.client_id.is_none_or(|id| id == appointment.client_id)
            && self
                .professional_id
                .is_none_or(|id| id == appointment.professional_id)
    }
}

/// An appointment together with the time range of its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAppointment {
    pub appointment: Appointment,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ScheduledAppointment {
    pub fn new(appointment: Appointment, slot: &Slot) -> Self {
        Self {
            appointment,
            start_time: slot.start_time,
            end_time: slot.end_time,
        }
    }
}
