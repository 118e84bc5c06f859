//! # Scheduling Engine
//!
//! Slot creation, availability queries and the booking flow. The engine owns
//! no state of its own: every request goes straight to the injected store, so
//! all coordination between concurrent requests happens in the store.
//!
//! ## Booking
//!
//! 1. Look the slot up; a missing slot, or a store error during the lookup,
//!    fails the call with `SlotNotFound` without writing.
//! 2. A booked slot is an ordinary outcome, [`BookingOutcome::Unavailable`].
//! 3. [`AgendaStore::book_slot`] inserts the appointment and flips the slot in
//!    one transaction. A request that lost the race to another booking after
//!    step 2 gets `ConstraintViolation`.
//! 4. The notifier is told about the appointment. Its failures are logged and
//!    never change the outcome.

use std::collections::HashMap;
use std::sync::Arc;

use agenda_core::errors::{AgendaError, AgendaResult};
use agenda_core::models::{
    Appointment, AppointmentFilter, ClientId, NewAppointment, NewSlot, ProfessionalId,
    ScheduledAppointment, Slot, SlotId,
};
use agenda_core::notifier::{AppointmentNotification, Notifier};
use agenda_core::time::{day_window, format_instant, parse_date, parse_instant};
use agenda_db::store::AgendaStore;
use chrono_tz::Tz;
use tracing::{debug, error, info, warn};

/// How the post-booking notification is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationDispatch {
    /// Awaited before the booking response is returned.
    #[default]
    Inline,
    /// Spawned on the runtime; the response does not wait for it.
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Booked(Appointment),
    /// The slot exists but is already booked.
    Unavailable(Slot),
}

pub struct SchedulingEngine {
    store: Arc<dyn AgendaStore>,
    notifier: Arc<dyn Notifier>,
    timezone: Tz,
    dispatch: NotificationDispatch,
}

impl SchedulingEngine {
    /// Creates an engine that uses UTC calendar days and inline notifications.
    pub fn new(store: Arc<dyn AgendaStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            timezone: chrono_tz::UTC,
            dispatch: NotificationDispatch::Inline,
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_dispatch(mut self, dispatch: NotificationDispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Creates an available slot from two RFC 3339 instants.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - an instant does not parse, or `start >= end`
    /// * `Storage` - the store failed; the message is `Error creating slot`
    pub async fn create_slot(
        &self,
        professional_id: ProfessionalId,
        start_time: &str,
        end_time: &str,
    ) -> AgendaResult<Slot> {
        let start = parse_instant("start_time", start_time)?;
        let end = parse_instant("end_time", end_time)?;
        if start >= end {
            return Err(AgendaError::InvalidRange {
                start: start_time.to_string(),
                end: end_time.to_string(),
            });
        }

        let slot = self
            .store
            .create_slot(NewSlot {
                professional_id,
                start_time: start,
                end_time: end,
            })
            .await?;

        info!(
            "Slot {} created for professional {} ({} - {})",
            slot.id, professional_id, start_time, end_time
        );
        Ok(slot)
    }

    /// Available slots of a professional starting on `date` (`YYYY-MM-DD`).
    pub async fn list_available_slots(
        &self,
        professional_id: ProfessionalId,
        date: &str,
    ) -> AgendaResult<Vec<Slot>> {
        let date = parse_date(date)?;
        let window = day_window(date, self.timezone)?;

        let slots = self
            .store
            .list_available_slots(professional_id, window)
            .await?;

        debug!(
            "Found {} available slots for professional {} on {}",
            slots.len(),
            professional_id,
            date
        );
        Ok(slots)
    }

    pub async fn book_appointment(
        &self,
        client_id: ClientId,
        slot_id: SlotId,
    ) -> AgendaResult<BookingOutcome> {
        let slot = match self.store.get_slot_by_id(slot_id).await {
            Ok(slot) => slot.ok_or(AgendaError::SlotNotFound(slot_id))?,
            Err(e) => {
                error!("Error looking up slot {}: {:#}", slot_id, e);
                return Err(AgendaError::SlotNotFound(slot_id));
            }
        };

        if !slot.available {
            info!(
                "Client {} asked for slot {}, which is already booked",
                client_id, slot_id
            );
            return Ok(BookingOutcome::Unavailable(slot));
        }

        let appointment = self
            .store
            .book_slot(NewAppointment {
                client_id,
                slot_id,
                professional_id: slot.professional_id,
            })
            .await?;

        info!(
            "Appointment {} booked: client {} on slot {}",
            appointment.id, client_id, slot_id
        );

        let notification = AppointmentNotification {
            client_id,
            professional_id: slot.professional_id,
            appointment_id: appointment.id,
            start_time: format_instant(slot.start_time),
            end_time: format_instant(slot.end_time),
        };
        match self.dispatch {
            NotificationDispatch::Inline => notify(self.notifier.as_ref(), notification).await,
            NotificationDispatch::Background => {
                let notifier = Arc::clone(&self.notifier);
                tokio::spawn(async move { notify(notifier.as_ref(), notification).await });
            }
        }

        Ok(BookingOutcome::Booked(appointment))
    }

    /// Appointments matching `filter`, each with its slot's time range.
    ///
    /// Fails as a whole if any referenced slot cannot be resolved.
    pub async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> AgendaResult<Vec<ScheduledAppointment>> {
        let appointments = self.store.list_appointments(filter).await?;
        if appointments.is_empty() {
            return Ok(Vec::new());
        }

        let slot_ids: Vec<SlotId> = appointments.iter().map(|a| a.slot_id).collect();
        let slots: HashMap<SlotId, Slot> = self
            .store
            .get_slots_by_ids(&slot_ids)
            .await?
            .into_iter()
            .map(|slot| (slot.id, slot))
            .collect();

        appointments
            .into_iter()
            .map(|appointment| {
                let slot = slots
                    .get(&appointment.slot_id)
                    .ok_or(AgendaError::SlotNotFound(appointment.slot_id))?;
                Ok(ScheduledAppointment::new(appointment, slot))
            })
            .collect()
    }
}

async fn notify(notifier: &dyn Notifier, notification: AppointmentNotification) {
    match notifier.send_appointment_notification(&notification).await {
        Ok(receipt) if receipt.success => {
            info!(
                "Notification sent for appointment {}: {}",
                notification.appointment_id, receipt.message
            );
        }
        Ok(receipt) => {
            warn!(
                "Notification for appointment {} was not delivered: {}",
                notification.appointment_id, receipt.message
            );
        }
        Err(err) => {
            warn!(
                "Error sending notification for appointment {}: {:?}",
                notification.appointment_id, err
            );
        }
    }
}
