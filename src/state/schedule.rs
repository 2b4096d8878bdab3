//! Fixed-interval daily slot generation for a court.

use std::time::Duration;

use time::{
    Date, Time,
    format_description::BorrowedFormatItem,
    macros::format_description,
};

/// Opening time of the facility.
pub const OPENING_TIME: Time = clock(4, 0);
/// Latest time a slot may end.
pub const CLOSING_TIME: Time = clock(23, 30);
/// Length of a bookable slot.
pub const SLOT_DURATION: Duration = Duration::from_secs(90 * 60);
/// The only accepted calendar date form, `YYYY-MM-DD`.
pub const CALENDAR_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");
/// Clock time as shown in the slot grid, `HH:MM`.
pub const CLOCK_TIME: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_calendar_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), CALENDAR_DATE).ok()
}

/// Render `date` as `YYYY-MM-DD`.
pub fn format_calendar_date(date: Date) -> String {
    date.format(CALENDAR_DATE)
        .unwrap_or_else(|_| date.to_string())
}

const fn clock(hour: u8, minute: u8) -> Time {
    match Time::from_hms(hour, minute, 0) {
        Ok(time) => time,
        Err(_) => panic!("invalid clock time"),
    }
}

/// Coarse part of the day a slot starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    /// Before 07:00.
    EarlyMorning,
    /// 07:00 to 11:59.
    Morning,
    /// 12:00 to 16:59.
    Afternoon,
    /// 17:00 to 20:59.
    Evening,
    /// 21:00 onwards.
    Night,
}

impl DayPeriod {
    /// Bucket for a slot starting at `hour`.
    pub fn from_hour(hour: u8) -> Self {
        match hour {
            0..=6 => DayPeriod::EarlyMorning,
            7..=11 => DayPeriod::Morning,
            12..=16 => DayPeriod::Afternoon,
            17..=20 => DayPeriod::Evening,
            _ => DayPeriod::Night,
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            DayPeriod::EarlyMorning => "Early Morning",
            DayPeriod::Morning => "Morning",
            DayPeriod::Afternoon => "Afternoon",
            DayPeriod::Evening => "Evening",
            DayPeriod::Night => "Night",
        }
    }
}

/// An existing reservation on the court, as a half-open interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booking {
    /// Start of the reservation.
    pub start: Time,
    /// End of the reservation (exclusive).
    pub end: Time,
}

/// A bookable slot of the daily schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    /// Start of the slot.
    pub start: Time,
    /// End of the slot.
    pub end: Time,
    /// Part of the day the slot starts in.
    pub period: DayPeriod,
    /// Whether no booking overlaps the slot.
    pub available: bool,
}

impl TimeSlot {
    /// Half-open overlap test: `[start, end)` against `[booking.start, booking.end)`.
    pub fn overlaps(&self, booking: &Booking) -> bool {
        self.start < booking.end && self.end > booking.start
    }
}

/// Generate the ordered slots of a day, all marked available.
///
/// Slots are back to back from [`OPENING_TIME`]; a slot that would end after
/// [`CLOSING_TIME`] is not generated.
pub fn generate_slots() -> Vec<TimeSlot> {
    let latest_start = CLOSING_TIME - SLOT_DURATION;
    let mut slots = Vec::new();
    let mut start = OPENING_TIME;

    while start <= latest_start {
        let end = start + SLOT_DURATION;
        slots.push(TimeSlot {
            start,
            end,
            period: DayPeriod::from_hour(start.hour()),
            available: true,
        });
        start = end;
    }

    slots
}

/// Generate the day's slots and mark those overlapping any booking as unavailable.
pub fn daily_slots(bookings: &[Booking]) -> Vec<TimeSlot> {
    let mut slots = generate_slots();
    for slot in &mut slots {
        slot.available = !bookings.iter().any(|booking| slot.overlaps(booking));
    }
    slots
}
