//! Business logic powering the wizard routes. These helpers own the session lifecycle,
//! funnel every step completion through the state machine and keep the champion
//! animation timer tied to the session it belongs to.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval, sleep},
};
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::wizard::{
        PlanningRequest, ScheduleResponse, StepCompletionRequest, TeamsResponse, WizardSnapshot,
    },
    error::ServiceError,
    services::{health_service, sse_events},
    state::{
        SharedState, WizardSession,
        state_machine::{CHAMPION_ANIMATION_DELAY, CompletionOutcome, StepPayload},
        user::{AccessToken, CurrentUser},
        wizard::{Step, Team},
    },
};

/// Open a new wizard and start loading the eligible teams in the background.
pub async fn create_wizard(state: &SharedState, user: CurrentUser) -> WizardSnapshot {
    let session = Arc::new(WizardSession::new(&user));
    state.insert_session(session.clone());
    info!(wizard_id = %session.id(), owner = ?session.owner(), "wizard opened");

    tokio::spawn(fetch_available_teams(
        state.clone(),
        Arc::downgrade(&session),
        user.token,
    ));

    snapshot(&session).await
}

/// Load the teams once for a freshly opened wizard. Failures are logged and leave the
/// list empty; there is no retry.
pub(crate) async fn fetch_available_teams(
    state: SharedState,
    session: Weak<WizardSession>,
    token: Option<AccessToken>,
) {
    let limit = state.config().teams_fetch_limit();
    let result = state.teams_gateway().list_teams(token, limit).await;
    health_service::record_upstream(&state, result.is_ok());

    let Some(session) = session.upgrade() else {
        debug!("wizard closed before teams were loaded");
        return;
    };

    match result {
        Ok(documents) => {
            let teams: Vec<Team> = documents.into_iter().map(Team::from).collect();
            debug!(wizard_id = %session.id(), count = teams.len(), "available teams loaded");
            session.set_available_teams(teams).await;
        }
        Err(err) => {
            warn!(wizard_id = %session.id(), error = %err, "failed to fetch available teams");
        }
    }
}

/// Snapshot of a live wizard.
pub async fn get_wizard(state: &SharedState, id: Uuid) -> Result<WizardSnapshot, ServiceError> {
    let session = state.session(id)?;
    Ok(snapshot(&session).await)
}

/// Teams the user can pick from in the team-selection step.
pub async fn available_teams(state: &SharedState, id: Uuid) -> Result<TeamsResponse, ServiceError> {
    let session = state.session(id)?;
    Ok(TeamsResponse {
        teams: session.available_teams().await,
    })
}

/// Close a wizard, cancelling its pending animation timer.
pub async fn delete_wizard(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let session = state
        .remove_session(id)
        .ok_or_else(|| ServiceError::NotFound(format!("wizard `{id}` not found")))?;

    if session.cancel_animation_timer() {
        debug!(wizard_id = %id, "pending champion animation cancelled");
    }
    info!(wizard_id = %id, "wizard closed");
    sse_events::broadcast_wizard_deleted(state, id);
    Ok(())
}

/// Close every wizard left untouched for longer than the configured idle TTL.
pub fn evict_idle_sessions(state: &SharedState) -> usize {
    let ttl = state.config().session_idle_ttl();
    let evicted = state
        .idle_sessions(ttl)
        .into_iter()
        .filter_map(|id| state.remove_session(id))
        .inspect(|session| {
            session.cancel_animation_timer();
            info!(wizard_id = %session.id(), "idle wizard closed");
            sse_events::broadcast_wizard_deleted(state, session.id());
        })
        .count();
    if evicted > 0 {
        debug!(evicted, remaining = state.session_count(), "idle sweep done");
    }
    evicted
}

/// Run [`evict_idle_sessions`] periodically until the returned task is aborted.
pub fn spawn_session_sweeper(state: SharedState) -> JoinHandle<()> {
    let period = (state.config().session_idle_ttl() / 4).clamp(
        Duration::from_secs(1),
        Duration::from_secs(60),
    );
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            evict_idle_sessions(&state);
        }
    })
}

/// Apply the completion report of the current step.
pub async fn complete_step(
    state: &SharedState,
    id: Uuid,
    request: StepCompletionRequest,
) -> Result<WizardSnapshot, ServiceError> {
    request.validate()?;
    let session = state.session(id)?;
    apply_completion(state, &session, None, request.into()).await
}

/// Complete the planning step through the tournament service, keeping the local planning
/// data when the service cannot be reached.
pub async fn schedule_planning(
    state: &SharedState,
    id: Uuid,
    user: CurrentUser,
    request: PlanningRequest,
) -> Result<ScheduleResponse, ServiceError> {
    let session = state.session(id)?;

    let (version, tournament_id, team_ids) = {
        let machine = session.machine().read().await;
        if machine.current_step() != Step::Planning {
            return Err(ServiceError::InvalidState(format!(
                "planning requires the wizard to be on step {}, current step {}",
                Step::Planning,
                machine.current_step()
            )));
        }
        let draft = machine.draft();
        let team_ids = draft
            .map(|draft| draft.teams.iter().map(|team| team.id.clone()).collect())
            .unwrap_or_default();
        (
            machine.version(),
            draft.and_then(|draft| draft.id.clone()),
            team_ids,
        )
    };

    let local = request.local_schedule();
    let (schedule, alert) = match tournament_id {
        Some(tournament_id) => {
            let document = request.to_schedule_document(team_ids);
            match state
                .tournament_gateway()
                .schedule_tournament(user.token, tournament_id.clone(), document)
                .await
            {
                Ok(tournament) => {
                    health_service::record_upstream(state, true);
                    (tournament.schedule, None)
                }
                Err(err) => {
                    health_service::record_upstream(state, false);
                    warn!(
                        wizard_id = %id,
                        %tournament_id,
                        error = %err,
                        "remote scheduling failed; keeping local planning"
                    );
                    (
                        None,
                        Some(format!(
                            "The schedule could not be saved remotely ({err}); local planning was kept."
                        )),
                    )
                }
            }
        }
        None => {
            debug!(wizard_id = %id, "tournament has no remote id; planning locally");
            (None, None)
        }
    };

    let fallback = schedule.is_none();
    let payload = StepPayload::Planning(request.into_planning_data(schedule.unwrap_or(local)));
    let wizard = apply_completion(state, &session, Some(version), payload).await?;

    Ok(ScheduleResponse {
        wizard,
        fallback,
        alert,
    })
}

/// Jump back to an earlier step. Forward jumps are ignored and return the unchanged wizard.
pub async fn navigate(
    state: &SharedState,
    id: Uuid,
    step_number: u8,
) -> Result<WizardSnapshot, ServiceError> {
    let step = Step::try_from(step_number)
        .map_err(|number| ServiceError::InvalidInput(format!("unknown step {number}")))?;
    let session = state.session(id)?;

    let (changed, snapshot) = {
        let mut machine = session.machine().write().await;
        let before = machine.version();
        if !machine.go_to_step(step) {
            debug!(wizard_id = %id, %step, "navigation ignored");
        }
        (
            machine.version() != before,
            WizardSnapshot::new(&session, &machine),
        )
    };

    if changed {
        session.cancel_animation_timer();
        sse_events::broadcast_step_changed(state, &snapshot);
    }
    Ok(snapshot)
}

/// Discard the draft and return to the first step.
pub async fn reset(state: &SharedState, id: Uuid) -> Result<WizardSnapshot, ServiceError> {
    let session = state.session(id)?;

    let snapshot = {
        let mut machine = session.machine().write().await;
        machine.reset();
        WizardSnapshot::new(&session, &machine)
    };
    session.cancel_animation_timer();

    info!(wizard_id = %id, "wizard reset");
    sse_events::broadcast_step_changed(state, &snapshot);
    Ok(snapshot)
}

async fn snapshot(session: &WizardSession) -> WizardSnapshot {
    let machine = session.machine().read().await;
    WizardSnapshot::new(session, &machine)
}

async fn apply_completion(
    state: &SharedState,
    session: &Arc<WizardSession>,
    expected_version: Option<usize>,
    payload: StepPayload,
) -> Result<WizardSnapshot, ServiceError> {
    let step = payload.step();
    let (outcome, snapshot) = {
        let mut machine = session.machine().write().await;
        let outcome = match expected_version {
            Some(version) => machine.complete_step_at(version, payload),
            None => machine.complete_step(payload),
        }?;
        (outcome, WizardSnapshot::new(session, &machine))
    };

    debug!(wizard_id = %session.id(), %step, ?outcome, "step completed");
    match outcome {
        CompletionOutcome::ChampionCrowned { version } => {
            arm_champion_timer(state, session, version);
            if let Some(champion) = snapshot
                .tournament
                .as_ref()
                .and_then(|draft| draft.champion.clone())
            {
                info!(wizard_id = %session.id(), champion = %champion.name, "champion crowned");
                sse_events::broadcast_champion_crowned(state, session.id(), champion);
            }
        }
        CompletionOutcome::Advanced(Step::Podium) | CompletionOutcome::AwaitingChampion => {
            if session.cancel_animation_timer() {
                debug!(wizard_id = %session.id(), "pending champion animation cancelled");
            }
        }
        CompletionOutcome::Advanced(_) => {}
    }

    sse_events::broadcast_step_changed(state, &snapshot);
    Ok(snapshot)
}

/// Move the wizard to the podium once the animation has played, unless the wizard
/// changed (or was closed) in the meantime.
fn arm_champion_timer(state: &SharedState, session: &Arc<WizardSession>, version: usize) {
    let weak = Arc::downgrade(session);
    let state = state.clone();
    let wizard_id = session.id();

    let handle = tokio::spawn(async move {
        sleep(CHAMPION_ANIMATION_DELAY).await;
        let Some(session) = weak.upgrade() else {
            return;
        };

        let snapshot = {
            let mut machine = session.machine().write().await;
            if !machine.finish_champion_animation(version) {
                debug!(%wizard_id, version, "stale champion animation timer");
                return;
            }
            WizardSnapshot::new(&session, &machine)
        };

        info!(%wizard_id, "champion animation finished; showing podium");
        sse_events::broadcast_step_changed(&state, &snapshot);
    });

    session.arm_animation_timer(handle.abort_handle());
}
