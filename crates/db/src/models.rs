use agenda_core::models::{Appointment, Slot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: i64,
    pub professional_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: i64,
    pub client_id: i64,
    pub slot_id: i64,
    pub professional_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<DbSlot> for Slot {
    fn from(row: DbSlot) -> Self {
        Slot {
            id: row.id,
            professional_id: row.professional_id,
            start_time: row.start_time,
            end_time: row.end_time,
            available: row.available,
        }
    }
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Appointment {
            id: row.id,
            client_id: row.client_id,
            slot_id: row.slot_id,
            professional_id: row.professional_id,
        }
    }
}
