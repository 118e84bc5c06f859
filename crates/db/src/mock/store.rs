use agenda_core::errors::AgendaResult;
use agenda_core::models::{
    Appointment, AppointmentFilter, NewAppointment, NewSlot, ProfessionalId, Slot, SlotId,
    TimeWindow,
};
use async_trait::async_trait;
use mockall::mock;

use crate::store::{AgendaStore, AppointmentStore, SlotStore};

// Mock store for testing the scheduling engine without a database
mock! {
    pub Store {}

    #[async_trait]
    impl SlotStore for Store {
        async fn create_slot(&self, slot: NewSlot) -> AgendaResult<Slot>;

        async fn list_available_slots(
            &self,
            professional_id: ProfessionalId,
            window: TimeWindow,
        ) -> AgendaResult<Vec<Slot>>;

        async fn get_slot_by_id(&self, id: SlotId) -> AgendaResult<Option<Slot>>;

        async fn get_slots_by_ids(&self, ids: &[SlotId]) -> AgendaResult<Vec<Slot>>;

        async fn set_availability(&self, id: SlotId, available: bool) -> AgendaResult<()>;
    }

    #[async_trait]
    impl AppointmentStore for Store {
        async fn create_appointment(&self, appointment: NewAppointment) -> AgendaResult<Appointment>;

        async fn list_appointments(
            &self,
            filter: AppointmentFilter,
        ) -> AgendaResult<Vec<Appointment>>;
    }

    #[async_trait]
    impl AgendaStore for Store {
        async fn book_slot(&self, appointment: NewAppointment) -> AgendaResult<Appointment>;
    }
}
