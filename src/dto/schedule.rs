//! DTO definitions for the court daily schedule.

use serde::{Deserialize, Serialize};
use time::Time;
use utoipa::{IntoParams, ToSchema};

use crate::state::schedule::{CLOCK_TIME, TimeSlot};

/// Query string of the daily schedule endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DailyScheduleQuery {
    /// Day to display (`YYYY-MM-DD`).
    pub date: String,
}

/// One slot of the daily schedule.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotSummary {
    /// Start time (`HH:MM`).
    pub start: String,
    /// End time (`HH:MM`).
    pub end: String,
    /// Part of the day the slot starts in.
    pub period: String,
    /// Whether the slot can still be booked.
    pub available: bool,
}

impl From<&TimeSlot> for SlotSummary {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            start: format_clock(slot.start),
            end: format_clock(slot.end),
            period: slot.period.label().to_string(),
            available: slot.available,
        }
    }
}

/// Availability of a court over a whole day.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyScheduleResponse {
    /// Court the grid was computed for.
    pub court_id: String,
    /// Day of the grid (`YYYY-MM-DD`).
    pub date: String,
    /// Slots in chronological order.
    pub slots: Vec<SlotSummary>,
}

fn format_clock(time: Time) -> String {
    time.format(CLOCK_TIME)
        .unwrap_or_else(|_| time.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::schedule::generate_slots;

    #[test]
    fn slots_are_rendered_as_hours_and_minutes() {
        let slots = generate_slots();
        let first = SlotSummary::from(&slots[0]);
        assert_eq!(first.start, "04:00");
        assert_eq!(first.end, "05:30");
        assert_eq!(first.period, "Early Morning");

        let last = SlotSummary::from(&slots[slots.len() - 1]);
        assert_eq!(last.start, "22:00");
        assert_eq!(last.end, "23:30");
    }
}
