use serde::{Deserialize, Serialize};

use crate::state::wizard::Schedule;

/// Envelope returned by `GET /api/teams`.
#[derive(Debug, Deserialize)]
pub struct TeamsEnvelope {
    /// Teams returned by the service.
    #[serde(default)]
    pub teams: Vec<TeamDocument>,
}

/// Team as stored by the teams service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDocument {
    /// Identifier assigned by the teams service.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional logo URL.
    #[serde(default)]
    pub logo: Option<String>,
    /// Player references; only the count is used here.
    #[serde(default)]
    pub players: Option<Vec<serde_json::Value>>,
}

/// Body sent to `POST /api/tournaments/:id/schedule`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequestDocument {
    /// First day of the tournament.
    pub start_date: String,
    /// Last day of the tournament, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Where the matches are played.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Length of a single match.
    pub match_duration_minutes: u32,
    /// Participating teams.
    pub team_ids: Vec<String>,
}

/// Tournament returned by the scheduling endpoint; only the schedule is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct TournamentDocument {
    /// Identifier of the tournament.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    /// Calendar computed by the service.
    #[serde(default)]
    pub schedule: Option<Schedule>,
}

/// Envelope returned by `GET /api/bookings`.
#[derive(Debug, Deserialize)]
pub struct BookingsEnvelope {
    /// Reservations of the requested day.
    #[serde(default)]
    pub bookings: Vec<BookingDocument>,
}

/// Court reservation with `HH:MM` bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDocument {
    /// Start of the reservation (`HH:MM`).
    pub start_time: String,
    /// End of the reservation (`HH:MM`).
    pub end_time: String,
    /// Booking status, e.g. `confirmed` or `cancelled`.
    #[serde(default)]
    pub status: Option<String>,
}

impl BookingDocument {
    /// Cancelled reservations no longer hold the court.
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("cancelled"))
    }
}
