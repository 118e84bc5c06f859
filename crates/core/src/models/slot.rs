use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type SlotId = i64;
pub type ProfessionalId = i64;

/// A bookable time window owned by a professional.
///
/// `available` only ever goes from `true` to `false`, when the slot is booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub professional_id: ProfessionalId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub available: bool,
}

/// Slot data before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSlot {
    pub professional_id: ProfessionalId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl NewSlot {
    pub fn into_slot(self, id: SlotId) -> Slot {
        Slot {
            id,
            professional_id: self.professional_id,
            start_time: self.start_time,
            end_time: self.end_time,
            available: true,
        }
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}
