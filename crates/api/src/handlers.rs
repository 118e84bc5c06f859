/// Agenda operations: slots, availability and bookings
pub mod agenda;
