//! In-process implementation of the store contracts.
//!
//! Mirrors the Postgres store: ids start at 1, and a slot can be referenced
//! by at most one appointment. Used by the engine and transport tests.

use agenda_core::errors::{AgendaError, AgendaResult};
use agenda_core::models::{
    Appointment, AppointmentFilter, NewAppointment, NewSlot, ProfessionalId, Slot, SlotId,
    TimeWindow,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::store::{AgendaStore, AppointmentStore, SlotStore};

#[derive(Debug, Default)]
struct MemoryState {
    slots: BTreeMap<SlotId, Slot>,
    appointments: BTreeMap<i64, Appointment>,
    next_slot_id: SlotId,
    next_appointment_id: i64,
}

impl MemoryState {
    fn insert_appointment(&mut self, new_appointment: NewAppointment) -> AgendaResult<Appointment> {
        if self
            .appointments
            .values()
            .any(|existing| existing.slot_id == new_appointment.slot_id)
        {
            return Err(AgendaError::ConstraintViolation(format!(
                "slot {} already has an appointment",
                new_appointment.slot_id
            )));
        }

        self.next_appointment_id += 1;
        let appointment = new_appointment.into_appointment(self.next_appointment_id);
        self.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn appointment_count(&self) -> usize {
        self.state.lock().await.appointments.len()
    }
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn create_slot(&self, slot: NewSlot) -> AgendaResult<Slot> {
        let mut state = self.state.lock().await;
        state.next_slot_id += 1;
        let slot = slot.into_slot(state.next_slot_id);
        state.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn list_available_slots(
        &self,
        professional_id: ProfessionalId,
        window: TimeWindow,
    ) -> AgendaResult<Vec<Slot>> {
        let state = self.state.lock().await;
        Ok(state
            .slots
            .values()
            .filter(|slot| {
                slot.professional_id == professional_id
                    && slot.available
                    && window.contains(slot.start_time)
            })
            .cloned()
            .collect())
    }

    async fn get_slot_by_id(&self, id: SlotId) -> AgendaResult<Option<Slot>> {
        Ok(self.state.lock().await.slots.get(&id).cloned())
    }

    async fn get_slots_by_ids(&self, ids: &[SlotId]) -> AgendaResult<Vec<Slot>> {
        let state = self.state.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.slots.get(id).cloned())
            .collect())
    }

    async fn set_availability(&self, id: SlotId, available: bool) -> AgendaResult<()> {
        let mut state = self.state.lock().await;
        let slot = state
            .slots
            .get_mut(&id)
            .ok_or(AgendaError::SlotNotFound(id))?;
        slot.available = available;
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn create_appointment(&self, appointment: NewAppointment) -> AgendaResult<Appointment> {
        self.state.lock().await.insert_appointment(appointment)
    }

    async fn list_appointments(&self, filter: AppointmentFilter) -> AgendaResult<Vec<Appointment>> {
        let state = self.state.lock().await;
        Ok(state
            .appointments
            .values()
            .filter(|appointment| filter.matches(appointment))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AgendaStore for MemoryStore {
    async fn book_slot(&self, appointment: NewAppointment) -> AgendaResult<Appointment> {
        let mut state = self.state.lock().await;
        let slot_id = appointment.slot_id;
        match state.slots.get(&slot_id) {
            None => return Err(AgendaError::SlotNotFound(slot_id)),
            Some(slot) if !slot.available => {
                return Err(AgendaError::ConstraintViolation(format!(
                    "slot {} is no longer available",
                    slot_id
                )));
            }
            Some(_) => {}
        }

        let appointment = state.insert_appointment(appointment)?;
        if let Some(slot) = state.slots.get_mut(&slot_id) {
            slot.available = false;
        }
        Ok(appointment)
    }
}
