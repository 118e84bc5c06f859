//! # Agenda Core
//!
//! Domain types shared by the agenda service crates: slots and appointments,
//! the wire formats used for instants and dates, the error taxonomy, and the
//! `Notifier` capability the scheduling engine calls after a booking.

pub mod errors;
pub mod models;
pub mod notifier;
pub mod time;
