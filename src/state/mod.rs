/// Daily slot grid of a court.
pub mod schedule;
/// Live wizard sessions.
pub mod session;
mod sse;
/// Wizard step transitions.
pub mod state_machine;
/// Caller identity.
pub mod user;
/// Tournament and stepper model.
pub mod wizard;

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::gateway::{BookingsGateway, TeamsGateway, TournamentGateway},
    error::ServiceError,
};

pub use self::session::WizardSession;
pub use self::sse::SseHub;

/// Application state shared across handlers and background tasks.
pub type SharedState = Arc<AppState>;

const SSE_CAPACITY: usize = 64;

/// Upstream services the application talks to.
#[derive(Clone)]
pub struct Gateways {
    /// Teams directory.
    pub teams: Arc<dyn TeamsGateway>,
    /// Tournament scheduling service.
    pub tournaments: Arc<dyn TournamentGateway>,
    /// Court bookings service.
    pub bookings: Arc<dyn BookingsGateway>,
}

impl Gateways {
    /// Use a single client implementing every gateway.
    pub fn from_shared<G>(gateway: Arc<G>) -> Self
    where
        G: TeamsGateway + TournamentGateway + BookingsGateway + 'static,
    {
        Self {
            teams: gateway.clone(),
            tournaments: gateway.clone(),
            bookings: gateway,
        }
    }
}

/// Central application state: live wizard sessions, gateways and broadcast hubs.
pub struct AppState {
    config: AppConfig,
    gateways: Gateways,
    sessions: DashMap<Uuid, Arc<WizardSession>>,
    sse: SseHub,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, gateways: Gateways) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(false);
        Arc::new(Self {
            config,
            gateways,
            sessions: DashMap::new(),
            sse: SseHub::new(SSE_CAPACITY),
            degraded: degraded_tx,
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Gateway used to list teams.
    pub fn teams_gateway(&self) -> Arc<dyn TeamsGateway> {
        self.gateways.teams.clone()
    }

    /// Gateway used to schedule tournaments.
    pub fn tournament_gateway(&self) -> Arc<dyn TournamentGateway> {
        self.gateways.tournaments.clone()
    }

    /// Gateway used to read court bookings.
    pub fn bookings_gateway(&self) -> Arc<dyn BookingsGateway> {
        self.gateways.bookings.clone()
    }

    /// Broadcast hub used for the wizard SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Register a freshly opened wizard.
    pub fn insert_session(&self, session: Arc<WizardSession>) {
        self.sessions.insert(session.id(), session);
    }

    /// Look up a live wizard, marking it as used.
    pub fn session(&self, id: Uuid) -> Result<Arc<WizardSession>, ServiceError> {
        let session = self
            .sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ServiceError::NotFound(format!("wizard `{id}` not found")))?;
        session.touch();
        Ok(session)
    }

    /// Wizards untouched for at least `ttl`.
    pub fn idle_sessions(&self, ttl: Duration) -> Vec<Uuid> {
        self.sessions
            .iter()
            .filter(|entry| entry.value().idle_for() >= ttl)
            .map(|entry| *entry.key())
            .collect()
    }

    /// Remove a wizard from the registry, handing back the last strong reference held here.
    pub fn remove_session(&self, id: Uuid) -> Option<Arc<WizardSession>> {
        self.sessions.remove(&id).map(|(_, session)| session)
    }

    /// Number of open wizards.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop every session, cancelling their pending timers.
    pub fn close_sessions(&self) -> usize {
        let ids: Vec<Uuid> = self.sessions.iter().map(|entry| *entry.key()).collect();
        ids.into_iter()
            .filter_map(|id| self.remove_session(id))
            .inspect(|session| {
                session.cancel_animation_timer();
            })
            .count()
    }

    /// Whether the last upstream call failed.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update the degraded flag, returning whether it changed.
    pub fn set_degraded(&self, value: bool) -> bool {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        })
    }
}
