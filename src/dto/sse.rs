use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::state::wizard::Team;

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// SSE event name.
    pub event: Option<String>,
    /// JSON payload.
    pub data: String,
    /// Wizard the event is about; `None` for system-wide events.
    pub wizard_id: Option<Uuid>,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
            wizard_id: None,
        })
    }

    /// Attach the event to one wizard.
    pub fn for_wizard(mut self, wizard_id: Uuid) -> Self {
        self.wizard_id = Some(wizard_id);
        self
    }

    /// Whether a subscriber following `filter` (or every wizard, when `None`) gets this event.
    pub fn is_visible_to(&self, filter: Option<Uuid>) -> bool {
        match (filter, self.wizard_id) {
            (Some(wanted), Some(wizard_id)) => wanted == wizard_id,
            _ => true,
        }
    }
}

/// Query string of the wizard SSE stream.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WizardStreamQuery {
    /// Only forward events of this wizard (system events are always forwarded).
    pub wizard_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream.
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the last upstream call failed.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    /// Whether the last upstream call failed.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast whenever a wizard moves, including timer-driven moves.
pub struct StepChangedEvent {
    /// Wizard that moved.
    pub wizard_id: Uuid,
    /// Step now displayed (1-7).
    pub current_step: u8,
    /// Whether the champion celebration is on screen.
    pub champion_animation: bool,
    /// Wizard version after the move.
    pub version: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast when a bracket result crowns a champion.
pub struct ChampionCrownedEvent {
    /// Wizard whose bracket was decided.
    pub wizard_id: Uuid,
    /// Winning team.
    pub champion: Team,
    /// Delay before the wizard moves to the podium on its own.
    pub animation_ms: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast when a wizard session is closed.
pub struct WizardDeletedEvent {
    /// Wizard that was closed.
    pub wizard_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_events_only_reach_matching_subscribers() {
        let wizard = Uuid::new_v4();
        let event = ServerEvent::json(Some("wizard.deleted".to_string()), &"x")
            .unwrap()
            .for_wizard(wizard);
        assert!(event.is_visible_to(None));
        assert!(event.is_visible_to(Some(wizard)));
        assert!(!event.is_visible_to(Some(Uuid::new_v4())));

        let system = ServerEvent::json(Some("system.status".to_string()), &"x").unwrap();
        assert!(system.is_visible_to(Some(wizard)));
    }
}
