//! In-memory gateways shared by the service tests.

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::StatusCode;
use time::Date;

use crate::{
    config::AppConfig,
    dao::gateway::{
        BookingsGateway, TeamsGateway, TournamentGateway,
        error::{GatewayError, GatewayResult},
        models::{BookingDocument, ScheduleRequestDocument, TeamDocument, TournamentDocument},
    },
    state::{
        AppState, Gateways, SharedState,
        user::AccessToken,
        wizard::{Schedule, Team},
    },
};

/// Gateway answering from fixed data, or failing every call.
#[derive(Default)]
pub struct FakeGateway {
    teams: Vec<TeamDocument>,
    bookings: Vec<BookingDocument>,
    failing: bool,
}

impl FakeGateway {
    pub fn with_teams(count: usize) -> Self {
        Self {
            teams: (0..count)
                .map(|index| TeamDocument {
                    id: format!("team-{index}"),
                    name: format!("Team {index}"),
                    logo: None,
                    players: Some(vec![serde_json::Value::Null; 5]),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_bookings(bookings: Vec<BookingDocument>) -> Self {
        Self {
            bookings,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn check(&self, path: &str) -> GatewayResult<()> {
        if self.failing {
            return Err(GatewayError::RequestStatus {
                path: path.to_string(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(())
    }
}

impl TeamsGateway for FakeGateway {
    fn list_teams(
        &self,
        _token: Option<AccessToken>,
        limit: u32,
    ) -> BoxFuture<'static, GatewayResult<Vec<TeamDocument>>> {
        let result: GatewayResult<Vec<TeamDocument>> = self
            .check("api/teams")
            .map(|()| self.teams.iter().take(limit as usize).cloned().collect());
        Box::pin(async move { result })
    }
}

impl TournamentGateway for FakeGateway {
    fn schedule_tournament(
        &self,
        _token: Option<AccessToken>,
        tournament_id: String,
        request: ScheduleRequestDocument,
    ) -> BoxFuture<'static, GatewayResult<TournamentDocument>> {
        let result = self.check("api/tournaments").map(|()| TournamentDocument {
            id: Some(tournament_id),
            schedule: Some(Schedule {
                start_date: request.start_date,
                end_date: request.end_date,
                venue: Some("Remote arena".to_string()),
                match_duration_minutes: request.match_duration_minutes,
                matches: Vec::new(),
            }),
        });
        Box::pin(async move { result })
    }
}

impl BookingsGateway for FakeGateway {
    fn list_bookings(
        &self,
        _token: Option<AccessToken>,
        _court_id: String,
        _date: Date,
    ) -> BoxFuture<'static, GatewayResult<Vec<BookingDocument>>> {
        let result = self.check("api/bookings").map(|()| self.bookings.clone());
        Box::pin(async move { result })
    }
}

/// Application state backed by `gateway`.
pub fn state_with(gateway: FakeGateway) -> SharedState {
    state_with_config(AppConfig::default(), gateway)
}

/// Same as [`state_with`] with an explicit configuration.
pub fn state_with_config(config: AppConfig, gateway: FakeGateway) -> SharedState {
    AppState::new(config, Gateways::from_shared(Arc::new(gateway)))
}

/// Selectable team number `index`.
pub fn team(index: usize) -> Team {
    Team {
        id: format!("team-{index}"),
        name: format!("Team {index}"),
        logo: None,
        players_count: Some(5),
    }
}

pub fn booking(start: &str, end: &str, status: Option<&str>) -> BookingDocument {
    BookingDocument {
        start_time: start.to_string(),
        end_time: end.to_string(),
        status: status.map(str::to_string),
    }
}
