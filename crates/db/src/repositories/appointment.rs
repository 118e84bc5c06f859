use agenda_core::models::{AppointmentFilter, NewAppointment};
use eyre::Result;
use sqlx::PgExecutor;

use crate::models::DbAppointment;

pub async fn create_appointment<'e, E>(
    executor: E,
    appointment: &NewAppointment,
) -> Result<DbAppointment>
where
    E: PgExecutor<'e>,
{
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (client_id, slot_id, professional_id)
        VALUES ($1, $2, $3)
        RETURNING id, client_id, slot_id, professional_id, created_at
        "#,
    )
    .bind(appointment.client_id)
    .bind(appointment.slot_id)
    .bind(appointment.professional_id)
    .fetch_one(executor)
    .await?;

    Ok(appointment)
}

pub async fn list_appointments<'e, E>(
    executor: E,
    filter: AppointmentFilter,
) -> Result<Vec<DbAppointment>>
where
    E: PgExecutor<'e>,
{
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, client_id, slot_id, professional_id, created_at
        FROM appointments
        WHERE ($1::BIGINT IS NULL OR client_id = $1)
          AND ($2::BIGINT IS NULL OR professional_id = $2)
        ORDER BY id ASC
        "#,
    )
    .bind(filter.client_id)
    .bind(filter.professional_id)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}
