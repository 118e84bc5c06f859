pub mod appointment;
pub mod rpc;
pub mod slot;

pub use appointment::{
    Appointment, AppointmentFilter, AppointmentId, ClientId, NewAppointment, ScheduledAppointment,
};
pub use slot::{NewSlot, ProfessionalId, Slot, SlotId, TimeWindow};
