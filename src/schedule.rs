//! Order scheduling
//!
//! Pickup and delivery times are offered in 15-minute slots from opening to
//! closing, both inclusive. A slot is only offered once the kitchen has had
//! its preparation time, so same-day slots start at the first quarter hour
//! at least that far from now.

use jiff::{
    ToSpan,
    civil::{Date, DateTime, Time, time},
};

/// Minutes between consecutive slots.
pub const SLOT_MINUTES: i64 = 15;

/// Opening hours and preparation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreHours {
    /// First slot of the day
    pub open: Time,

    /// Last slot of the day
    pub close: Time,

    /// Minimum minutes between ordering and the chosen slot
    pub prep_minutes: u16,
}

impl Default for StoreHours {
    fn default() -> Self {
        Self {
            open: time(6, 0, 0, 0),
            close: time(21, 0, 0, 0),
            prep_minutes: 30,
        }
    }
}

impl StoreHours {
    /// The earliest moment an order placed at `now` can be ready.
    pub fn earliest(&self, now: DateTime) -> DateTime {
        now.checked_add(i64::from(self.prep_minutes).minutes())
            .unwrap_or(DateTime::MAX)
    }

    /// Slots on `date` still open to a customer ordering at `now`, in order.
    ///
    /// Empty for past days and once the last slot is within the preparation time.
    pub fn slots(&self, now: DateTime, date: Date) -> Vec<DateTime> {
        let earliest = self.earliest(now);
        let closing = date.to_datetime(self.close);

        date.to_datetime(self.open)
            .series(SLOT_MINUTES.minutes())
            .take_while(|slot| *slot <= closing)
            .filter(|slot| *slot >= earliest)
            .collect()
    }

    /// Whether `slot` is offered to a customer ordering at `now`.
    pub fn offers(&self, now: DateTime, slot: DateTime) -> bool {
        self.slots(now, slot.date()).contains(&slot)
    }
}
