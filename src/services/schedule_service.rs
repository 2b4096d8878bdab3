//! Court availability for one day, computed from the bookings service.

use time::{Time, format_description::BorrowedFormatItem, macros::format_description};
use tracing::{debug, warn};

use crate::{
    dao::gateway::models::BookingDocument,
    dto::{
        schedule::{DailyScheduleResponse, SlotSummary},
        validation::parse_iso_date,
    },
    error::ServiceError,
    services::health_service,
    state::{
        SharedState,
        schedule::{Booking, CLOSING_TIME, daily_slots, format_calendar_date},
        user::CurrentUser,
    },
};

const CLOCK_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute][optional [:[second]]]");

/// Build the slot grid of `court_id` for `date`, marking booked slots unavailable.
pub async fn daily_schedule(
    state: &SharedState,
    user: CurrentUser,
    court_id: String,
    date: &str,
) -> Result<DailyScheduleResponse, ServiceError> {
    let day = parse_iso_date(date)
        .ok_or_else(|| ServiceError::InvalidInput(format!("`{date}` is not a YYYY-MM-DD date")))?;

    let result = state
        .bookings_gateway()
        .list_bookings(user.token, court_id.clone(), day)
        .await;
    health_service::record_upstream(state, result.is_ok());
    let documents = result?;

    let bookings: Vec<Booking> = documents
        .iter()
        .filter(|document| !document.is_cancelled())
        .filter_map(to_booking)
        .collect();
    debug!(%court_id, date, bookings = bookings.len(), "computing daily schedule");

    Ok(DailyScheduleResponse {
        court_id,
        date: format_calendar_date(day),
        slots: daily_slots(&bookings).iter().map(SlotSummary::from).collect(),
    })
}

/// Parse the reservation bounds. A reservation ending at or before its start runs past
/// midnight and holds the court until closing.
fn to_booking(document: &BookingDocument) -> Option<Booking> {
    let parse = |value: &str| Time::parse(value.trim(), CLOCK_FORMAT).ok();
    let (Some(start), Some(end)) = (parse(&document.start_time), parse(&document.end_time)) else {
        warn!(
            start = %document.start_time,
            end = %document.end_time,
            "skipping booking with unreadable times"
        );
        return None;
    };

    let end = if end <= start { CLOSING_TIME.max(start) } else { end };
    Some(Booking { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeGateway, booking, state_with};

    fn available(response: &DailyScheduleResponse, start: &str) -> bool {
        response
            .slots
            .iter()
            .find(|slot| slot.start == start)
            .map(|slot| slot.available)
            .unwrap()
    }

    #[tokio::test]
    async fn bookings_block_overlapping_slots() {
        let gateway = FakeGateway::with_bookings(vec![
            booking("12:00", "13:30", None),
            booking("05:30", "07:00", Some("cancelled")),
            booking("later", "13:30", None),
        ]);
        let state = state_with(gateway);

        let response = daily_schedule(&state, CurrentUser::anonymous(), "court-1".into(), "2024-06-01")
            .await
            .unwrap();

        assert_eq!(response.slots.len(), 13);
        assert_eq!(response.date, "2024-06-01");
        assert!(!available(&response, "11:30"));
        assert!(!available(&response, "13:00"));
        assert!(available(&response, "10:00"));
        assert!(available(&response, "14:30"));
        assert!(available(&response, "05:30"));
        assert_eq!(response.slots[0].period, "Early Morning");
    }

    #[tokio::test]
    async fn overnight_booking_holds_the_court_until_closing() {
        let state = state_with(FakeGateway::with_bookings(vec![booking("22:30", "01:00", None)]));

        let response = daily_schedule(&state, CurrentUser::anonymous(), "court-1".into(), "2024-06-01")
            .await
            .unwrap();
        assert!(!available(&response, "22:00"));
        assert!(available(&response, "20:30"));
    }

    #[tokio::test]
    async fn malformed_date_is_rejected() {
        let state = state_with(FakeGateway::with_bookings(Vec::new()));
        for date in ["06/01/2024", "20240601", "2024-W22-6"] {
            let err = daily_schedule(&state, CurrentUser::anonymous(), "court-1".into(), date)
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)), "{date}");
        }
    }

    #[tokio::test]
    async fn bookings_failure_is_reported() {
        let state = state_with(FakeGateway::failing());
        let err = daily_schedule(&state, CurrentUser::anonymous(), "court-1".into(), "2024-06-01")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));
        assert!(state.is_degraded());
    }

    #[test]
    fn clock_accepts_seconds() {
        let parsed = to_booking(&booking("08:15:00", "09:00", None)).unwrap();
        assert_eq!(parsed.start, Time::from_hms(8, 15, 0).unwrap());
    }
}
