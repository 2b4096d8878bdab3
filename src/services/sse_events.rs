use serde::Serialize;
use tracing::{trace, warn};
use uuid::Uuid;

use crate::{
    dto::{
        sse::{
            ChampionCrownedEvent, ServerEvent, StepChangedEvent, SystemStatus, WizardDeletedEvent,
        },
        wizard::WizardSnapshot,
    },
    state::{SharedState, state_machine::CHAMPION_ANIMATION_DELAY, wizard::Team},
};

const EVENT_STEP_CHANGED: &str = "wizard.step_changed";
const EVENT_CHAMPION_CROWNED: &str = "wizard.champion";
const EVENT_WIZARD_DELETED: &str = "wizard.deleted";
const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Broadcast the position of a wizard after any move.
pub fn broadcast_step_changed(state: &SharedState, snapshot: &WizardSnapshot) {
    let payload = StepChangedEvent {
        wizard_id: snapshot.id,
        current_step: snapshot.current_step,
        champion_animation: snapshot.champion_animation,
        version: snapshot.version,
    };
    send_event(state, EVENT_STEP_CHANGED, Some(snapshot.id), &payload);
}

/// Broadcast that a bracket result produced a champion.
pub fn broadcast_champion_crowned(state: &SharedState, wizard_id: Uuid, champion: Team) {
    let payload = ChampionCrownedEvent {
        wizard_id,
        champion,
        animation_ms: CHAMPION_ANIMATION_DELAY.as_millis() as u64,
    };
    send_event(state, EVENT_CHAMPION_CROWNED, Some(wizard_id), &payload);
}

/// Broadcast that a wizard has been closed.
pub fn broadcast_wizard_deleted(state: &SharedState, wizard_id: Uuid) {
    send_event(
        state,
        EVENT_WIZARD_DELETED,
        Some(wizard_id),
        &WizardDeletedEvent { wizard_id },
    );
}

/// Broadcast that the backend entered or left degraded mode.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    send_event(state, EVENT_SYSTEM_STATUS, None, &SystemStatus { degraded });
}

fn send_event(
    state: &SharedState,
    event: &str,
    wizard_id: Option<Uuid>,
    payload: &impl Serialize,
) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(payload) => {
            let payload = match wizard_id {
                Some(id) => payload.for_wizard(id),
                None => payload,
            };
            let receivers = state.sse().broadcast(payload);
            trace!(event, receivers, "SSE event dispatched");
        }
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
