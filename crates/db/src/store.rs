//! Store contracts used by the scheduling engine, and their Postgres
//! implementation.
//!
//! Store methods report failures as [`AgendaError`]: a write rejected by the
//! one-appointment-per-slot rule becomes `ConstraintViolation`, anything else
//! the database reports becomes `Storage` with the failing operation as
//! context.

use agenda_core::errors::{AgendaError, AgendaResult};
use agenda_core::models::{
    Appointment, AppointmentFilter, NewAppointment, NewSlot, ProfessionalId, Slot, SlotId,
    TimeWindow,
};
use async_trait::async_trait;
use tracing::debug;

use crate::repositories::{appointment, slot};
use crate::DbPool;

#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn create_slot(&self, slot: NewSlot) -> AgendaResult<Slot>;

    /// Available slots of `professional_id` starting inside `window`.
    async fn list_available_slots(
        &self,
        professional_id: ProfessionalId,
        window: TimeWindow,
    ) -> AgendaResult<Vec<Slot>>;

    async fn get_slot_by_id(&self, id: SlotId) -> AgendaResult<Option<Slot>>;

    /// Slots with the given ids. Unknown ids are skipped.
    async fn get_slots_by_ids(&self, ids: &[SlotId]) -> AgendaResult<Vec<Slot>>;

    async fn set_availability(&self, id: SlotId, available: bool) -> AgendaResult<()>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn create_appointment(&self, appointment: NewAppointment) -> AgendaResult<Appointment>;

    async fn list_appointments(&self, filter: AppointmentFilter) -> AgendaResult<Vec<Appointment>>;
}

#[async_trait]
pub trait AgendaStore: SlotStore + AppointmentStore {
    /// Creates the appointment and marks its slot booked as one unit.
    ///
    /// Fails with `ConstraintViolation` when the slot is no longer available
    /// or already has an appointment; in that case nothing is written.
    async fn book_slot(&self, appointment: NewAppointment) -> AgendaResult<Appointment>;
}

/// Maps a repository failure, turning unique violations into
/// `ConstraintViolation`.
pub(crate) fn store_error(report: eyre::Report, context: &'static str) -> AgendaError {
    let unique_violation = report
        .downcast_ref::<sqlx::Error>()
        .and_then(|error| error.as_database_error())
        .is_some_and(|error| error.is_unique_violation());

    if unique_violation {
        AgendaError::ConstraintViolation(format!("{}: slot already has an appointment", context))
    } else {
        AgendaError::Storage(report.wrap_err(context))
    }
}

#[derive(Clone)]
pub struct PgAgendaStore {
    pool: DbPool,
}

impl PgAgendaStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl SlotStore for PgAgendaStore {
    async fn create_slot(&self, new_slot: NewSlot) -> AgendaResult<Slot> {
        debug!(
            "Creating slot: professional_id={}, start={}, end={}",
            new_slot.professional_id, new_slot.start_time, new_slot.end_time
        );
        let row = slot::create_slot(&self.pool, &new_slot)
            .await
            .map_err(|e| store_error(e, "Error creating slot"))?;
        Ok(row.into())
    }

    async fn list_available_slots(
        &self,
        professional_id: ProfessionalId,
        window: TimeWindow,
    ) -> AgendaResult<Vec<Slot>> {
        let rows = slot::list_available_slots(&self.pool, professional_id, window)
            .await
            .map_err(|e| store_error(e, "Error listing available slots"))?;
        Ok(rows.into_iter().map(Slot::from).collect())
    }

    async fn get_slot_by_id(&self, id: SlotId) -> AgendaResult<Option<Slot>> {
        let row = slot::get_slot_by_id(&self.pool, id)
            .await
            .map_err(|e| store_error(e, "Error fetching slot"))?;
        Ok(row.map(Slot::from))
    }

    async fn get_slots_by_ids(&self, ids: &[SlotId]) -> AgendaResult<Vec<Slot>> {
        let rows = slot::get_slots_by_ids(&self.pool, ids)
            .await
            .map_err(|e| store_error(e, "Error fetching slots"))?;
        Ok(rows.into_iter().map(Slot::from).collect())
    }

    async fn set_availability(&self, id: SlotId, available: bool) -> AgendaResult<()> {
        let updated = slot::update_slot_availability(&self.pool, id, available)
            .await
            .map_err(|e| store_error(e, "Error updating slot"))?;
        if updated == 0 {
            return Err(AgendaError::SlotNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for PgAgendaStore {
    async fn create_appointment(&self, new_appointment: NewAppointment) -> AgendaResult<Appointment> {
        let row = appointment::create_appointment(&self.pool, &new_appointment)
            .await
            .map_err(|e| store_error(e, "Error generating appointment"))?;
        Ok(row.into())
    }

    async fn list_appointments(&self, filter: AppointmentFilter) -> AgendaResult<Vec<Appointment>> {
        let rows = appointment::list_appointments(&self.pool, filter)
            .await
            .map_err(|e| store_error(e, "Error listing appointments"))?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }
}

#[async_trait]
impl AgendaStore for PgAgendaStore {
    async fn book_slot(&self, new_appointment: NewAppointment) -> AgendaResult<Appointment> {
        let slot_id = new_appointment.slot_id;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error(e.into(), "Error generating appointment"))?;

        // An uncommitted transaction rolls back when dropped.
        let reserved = slot::reserve_slot(&mut *tx, slot_id)
            .await
            .map_err(|e| store_error(e, "Error updating slot"))?;
        if !reserved {
            debug!("Slot {} lost to a concurrent booking", slot_id);
            return Err(AgendaError::ConstraintViolation(format!(
                "slot {} is no longer available",
                slot_id
            )));
        }

        let row = appointment::create_appointment(&mut *tx, &new_appointment)
            .await
            .map_err(|e| store_error(e, "Error generating appointment"))?;

        tx.commit()
            .await
            .map_err(|e| store_error(e.into(), "Error generating appointment"))?;

        debug!("Booked slot {} as appointment {}", slot_id, row.id);
        Ok(row.into())
    }
}
