//! # Agenda Handlers
//!
//! Thin transport layer over [`SchedulingEngine`](crate::engine::SchedulingEngine):
//! deserialize the request, call the engine, serialize the response.

use agenda_core::models::rpc::{
    AppointmentResponse, BookAppointmentRequest, BookAppointmentResponse, CreateSlotRequest,
    CreateSlotResponse, ListAppointmentsRequest, ListAppointmentsResponse,
    ListAvailableSlotsRequest, ListAvailableSlotsResponse, SlotResponse,
};
use agenda_core::models::AppointmentFilter;
use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::{engine::BookingOutcome, middleware::error_handling::AppError, ApiState};

pub const SLOT_CREATED: &str = "Slot created";
pub const APPOINTMENT_BOOKED: &str = "Appointment successfully generated";
pub const SLOT_NOT_AVAILABLE: &str = "This slot is not available";

/// `POST /api/create-slot`
#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<Json<CreateSlotResponse>, AppError> {
    let slot = state
        .engine
        .create_slot(payload.professional_id, &payload.start_time, &payload.end_time)
        .await?;

    Ok(Json(CreateSlotResponse {
        message: SLOT_CREATED.to_string(),
        success: true,
        slot_id: slot.id,
    }))
}

/// `GET /api/list-available-slots?professional_id=1&date=2025-03-10`
#[axum::debug_handler]
pub async fn list_available_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListAvailableSlotsRequest>,
) -> Result<Json<ListAvailableSlotsResponse>, AppError> {
    let slots = state
        .engine
        .list_available_slots(query.professional_id, &query.date)
        .await?;

    Ok(Json(ListAvailableSlotsResponse {
        slots: slots.iter().map(SlotResponse::from).collect(),
        success: true,
    }))
}

/// `POST /api/book-appointment`
///
/// An already booked slot answers `200` with `success: false`.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<Json<BookAppointmentResponse>, AppError> {
    let outcome = state
        .engine
        .book_appointment(payload.client_id, payload.slot_id)
        .await?;

    let response = match outcome {
        BookingOutcome::Booked(appointment) => BookAppointmentResponse {
            message: APPOINTMENT_BOOKED.to_string(),
            success: true,
            appointment_id: appointment.id,
        },
        BookingOutcome::Unavailable(_) => BookAppointmentResponse {
            message: SLOT_NOT_AVAILABLE.to_string(),
            success: false,
            appointment_id: 0,
        },
    };

    Ok(Json(response))
}

/// `GET /api/list-appointments?client_id=7&professional_id=1`
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListAppointmentsRequest>,
) -> Result<Json<ListAppointmentsResponse>, AppError> {
    let filter = AppointmentFilter::from_wire(
        query.client_id.unwrap_or(0),
        query.professional_id.unwrap_or(0),
    );
    let appointments = state.engine.list_appointments(filter).await?;

    Ok(Json(ListAppointmentsResponse {
        appointments: appointments.iter().map(AppointmentResponse::from).collect(),
        success: true,
    }))
}
