use agenda_core::models::{NewSlot, TimeWindow};
use eyre::Result;
use sqlx::PgExecutor;

use crate::models::DbSlot;

pub async fn create_slot<'e, E>(executor: E, slot: &NewSlot) -> Result<DbSlot>
where
    E: PgExecutor<'e>,
{
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        INSERT INTO slots (professional_id, start_time, end_time, available)
        VALUES ($1, $2, $3, TRUE)
        RETURNING id, professional_id, start_time, end_time, available, created_at
        "#,
    )
    .bind(slot.professional_id)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .fetch_one(executor)
    .await?;

    Ok(slot)
}

pub async fn list_available_slots<'e, E>(
    executor: E,
    professional_id: i64,
    window: TimeWindow,
) -> Result<Vec<DbSlot>>
where
    E: PgExecutor<'e>,
{
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, professional_id, start_time, end_time, available, created_at
        FROM slots
        WHERE professional_id = $1
          AND start_time >= $2
          AND start_time < $3
          AND available
        ORDER BY start_time ASC
        "#,
    )
    .bind(professional_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

pub async fn get_slot_by_id<'e, E>(executor: E, id: i64) -> Result<Option<DbSlot>>
where
    E: PgExecutor<'e>,
{
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, professional_id, start_time, end_time, available, created_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(slot)
}

pub async fn get_slots_by_ids<'e, E>(executor: E, ids: &[i64]) -> Result<Vec<DbSlot>>
where
    E: PgExecutor<'e>,
{
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, professional_id, start_time, end_time, available, created_at
        FROM slots
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

/// Returns the number of rows updated, `0` when the slot does not exist.
pub async fn update_slot_availability<'e, E>(executor: E, id: i64, available: bool) -> Result<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET available = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(available)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Flips an available slot to booked. Returns `false` if the slot is missing
/// or already booked. The row stays locked until the surrounding transaction
/// ends, so concurrent reservations of one slot serialize here.
pub async fn reserve_slot<'e, E>(executor: E, id: i64) -> Result<bool>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET available = FALSE
        WHERE id = $1 AND available
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}
