/// Gateway error types.
pub mod error;
/// reqwest implementation of the gateways.
pub mod http;
/// Documents exchanged with the platform API.
pub mod models;

use futures::future::BoxFuture;
use time::Date;

use crate::state::user::AccessToken;

use self::{
    error::GatewayResult,
    models::{BookingDocument, ScheduleRequestDocument, TeamDocument, TournamentDocument},
};

/// Source of the teams eligible for a tournament.
pub trait TeamsGateway: Send + Sync {
    /// List up to `limit` teams visible to `token`.
    fn list_teams(
        &self,
        token: Option<AccessToken>,
        limit: u32,
    ) -> BoxFuture<'static, GatewayResult<Vec<TeamDocument>>>;
}

/// Remote tournament service owning schedules and brackets.
pub trait TournamentGateway: Send + Sync {
    /// Ask the tournament service to plan the matches of `tournament_id`.
    fn schedule_tournament(
        &self,
        token: Option<AccessToken>,
        tournament_id: String,
        request: ScheduleRequestDocument,
    ) -> BoxFuture<'static, GatewayResult<TournamentDocument>>;
}

/// Court reservations, used to compute slot availability.
pub trait BookingsGateway: Send + Sync {
    /// Reservations of `court_id` on `date`.
    fn list_bookings(
        &self,
        token: Option<AccessToken>,
        court_id: String,
        date: Date,
    ) -> BoxFuture<'static, GatewayResult<Vec<BookingDocument>>>;
}
