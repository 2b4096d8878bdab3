//! DTO definitions for the tournament wizard endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::gateway::models::ScheduleRequestDocument,
    dto::{
        format_timestamp,
        validation::{
            parse_iso_date, validate_identifier, validate_iso_date, validate_not_blank,
            validate_unique_team_ids,
        },
    },
    state::{
        WizardSession,
        schedule::format_calendar_date,
        state_machine::{CreationData, PlanningData, StepPayload, WizardStateMachine},
        wizard::{STEPS, Schedule, Team, TournamentDraft},
    },
};

/// Match length used when the planning step does not specify one.
pub const DEFAULT_MATCH_DURATION_MINUTES: u32 = 90;

/// Stepper entry with its gating and decoration flags.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepStatus {
    /// Step number (1-7).
    pub number: u8,
    /// Label shown in the stepper.
    pub title: String,
    /// Icon shown next to the label.
    pub icon: String,
    /// Whether the user may navigate to this step.
    pub accessible: bool,
    /// Decoration only.
    pub completed: bool,
    /// Whether this is the step on screen.
    pub current: bool,
}

/// Full view of a wizard session returned by every wizard endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    /// Wizard identifier.
    pub id: Uuid,
    /// User who opened the wizard, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Opening time (RFC 3339).
    pub created_at: String,
    /// Step on screen (1-7).
    pub current_step: u8,
    /// True while the champion celebration is displayed.
    pub champion_animation: bool,
    /// Bumped on every change.
    pub version: usize,
    /// Stepper entries in order.
    pub steps: Vec<StepStatus>,
    /// Tournament assembled so far.
    pub tournament: Option<TournamentDraft>,
}

impl WizardSnapshot {
    /// Project a session and its (locked) state machine.
    pub fn new(session: &WizardSession, machine: &WizardStateMachine) -> Self {
        let current = machine.current_step();
        let steps = STEPS
            .iter()
            .map(|info| StepStatus {
                number: info.step.number(),
                title: info.title.to_string(),
                icon: info.icon.to_string(),
                accessible: machine.is_step_accessible(info.step),
                completed: machine.is_step_completed(info.step),
                current: info.step == current,
            })
            .collect();

        Self {
            id: session.id(),
            owner: session.owner().map(str::to_string),
            created_at: format_timestamp(session.created_at()),
            current_step: current.number(),
            champion_animation: machine.champion_animation_visible(),
            version: machine.version(),
            steps,
            tournament: machine.draft().cloned(),
        }
    }
}

/// Teams eligible for selection in the team-selection step.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamsResponse {
    /// Teams returned by the teams service, without duplicates.
    pub teams: Vec<Team>,
}

/// Data submitted by the creation step.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreationRequest {
    /// Identifier already assigned by the tournament service. Blank means none.
    #[serde(default)]
    #[validate(custom(function = "validate_tournament_id"))]
    pub id: Option<String>,
    /// Tournament name.
    #[validate(length(max = 120), custom(function = "validate_not_blank"))]
    pub name: String,
    /// Roster limit per team.
    #[validate(range(min = 1, max = 50))]
    pub max_players_per_team: u32,
}

fn validate_tournament_id(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_identifier(value)
}

/// Data submitted by the planning step.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_planning_dates"))]
pub struct PlanningRequest {
    /// First day of the tournament (`YYYY-MM-DD`).
    #[validate(custom(function = "validate_iso_date"))]
    pub start_date: String,
    /// Last day of the tournament (`YYYY-MM-DD`), if bounded.
    #[serde(default)]
    #[validate(custom(function = "validate_iso_date"))]
    pub end_date: Option<String>,
    /// Where the matches are played.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub venue: Option<String>,
    /// Length of a single match; 90 when absent.
    #[serde(default)]
    #[validate(range(min = 15, max = 240))]
    pub match_duration_minutes: Option<u32>,
    /// New roster limit.
    #[serde(default)]
    #[validate(range(min = 1, max = 50))]
    pub max_players_per_team: Option<u32>,
}

fn validate_planning_dates(request: &PlanningRequest) -> Result<(), ValidationError> {
    let start = parse_iso_date(&request.start_date);
    let end = request.end_date.as_deref().and_then(parse_iso_date);
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            let mut err = ValidationError::new("date_range");
            err.message = Some("endDate must not be before startDate".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// `YYYY-MM-DD` rendering of a validated date; other input is kept trimmed.
fn canonical_date(value: &str) -> String {
    parse_iso_date(value)
        .map(format_calendar_date)
        .unwrap_or_else(|| value.trim().to_string())
}

impl PlanningRequest {
    /// Schedule built from the submitted fields alone, without any remote planning.
    pub fn local_schedule(&self) -> Schedule {
        Schedule {
            start_date: canonical_date(&self.start_date),
            end_date: self.end_date.as_deref().map(canonical_date),
            venue: self.venue.clone(),
            match_duration_minutes: self
                .match_duration_minutes
                .unwrap_or(DEFAULT_MATCH_DURATION_MINUTES),
            matches: Vec::new(),
        }
    }

    /// Planning update carrying `schedule`.
    pub fn into_planning_data(self, schedule: Schedule) -> PlanningData {
        PlanningData {
            schedule: Some(schedule),
            max_players_per_team: self.max_players_per_team,
        }
    }

    /// Body for the remote scheduling call.
    pub fn to_schedule_document(&self, team_ids: Vec<String>) -> ScheduleRequestDocument {
        let schedule = self.local_schedule();
        ScheduleRequestDocument {
            start_date: schedule.start_date,
            end_date: schedule.end_date,
            venue: schedule.venue,
            match_duration_minutes: schedule.match_duration_minutes,
            team_ids,
        }
    }
}

/// Data submitted by the team-selection step.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TeamSelectionRequest {
    /// Selected teams; exactly eight are needed to move on.
    #[validate(custom(function = "validate_unique_team_ids"))]
    pub teams: Vec<Team>,
}

/// Completion report of one wizard step, tagged by step name.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "step", content = "data", rename_all = "snake_case")]
pub enum StepCompletionRequest {
    /// Tournament creation form.
    Creation(CreationRequest),
    /// Planning form, applied locally.
    Planning(PlanningRequest),
    /// Selected teams.
    TeamSelection(TeamSelectionRequest),
    /// Draw result; replaces the tournament wholesale.
    Draw(TournamentDraft),
    /// Bracket result; replaces the tournament wholesale.
    Bracket(TournamentDraft),
    /// The champion animation finished on the client.
    ChampionAnimation,
}

impl Validate for StepCompletionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            StepCompletionRequest::Creation(request) => request.validate(),
            StepCompletionRequest::Planning(request) => request.validate(),
            StepCompletionRequest::TeamSelection(request) => request.validate(),
            StepCompletionRequest::Draw(_)
            | StepCompletionRequest::Bracket(_)
            | StepCompletionRequest::ChampionAnimation => Ok(()),
        }
    }
}

impl From<StepCompletionRequest> for StepPayload {
    fn from(value: StepCompletionRequest) -> Self {
        match value {
            StepCompletionRequest::Creation(request) => StepPayload::Creation(CreationData {
                id: request.id.filter(|id| !id.trim().is_empty()),
                name: request.name.trim().to_string(),
                max_players_per_team: request.max_players_per_team,
            }),
            StepCompletionRequest::Planning(request) => {
                let schedule = request.local_schedule();
                StepPayload::Planning(request.into_planning_data(schedule))
            }
            StepCompletionRequest::TeamSelection(request) => {
                StepPayload::TeamSelection(request.teams)
            }
            StepCompletionRequest::Draw(draft) => StepPayload::Draw(draft),
            StepCompletionRequest::Bracket(draft) => StepPayload::Bracket(draft),
            StepCompletionRequest::ChampionAnimation => StepPayload::ChampionAnimationComplete,
        }
    }
}

/// Outcome of planning through the tournament service.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    /// Wizard after the planning step.
    pub wizard: WizardSnapshot,
    /// True when the remote scheduling failed and local data was used instead.
    pub fallback: bool,
    /// Message to surface to the user when falling back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::wizard::Step;

    #[test]
    fn completion_request_is_tagged_by_step_name() {
        let request: StepCompletionRequest = serde_json::from_str(
            r#"{"step":"creation","data":{"name":"  Spring Cup ","maxPlayersPerTeam":10}}"#,
        )
        .unwrap();
        request.validate().unwrap();

        let payload = StepPayload::from(request);
        assert_eq!(payload.step(), Step::Creation);
        let StepPayload::Creation(data) = payload else {
            panic!("expected creation payload");
        };
        assert_eq!(data.name, "Spring Cup");
        assert_eq!(data.id, None);
    }

    #[test]
    fn champion_animation_needs_no_data() {
        let request: StepCompletionRequest =
            serde_json::from_str(r#"{"step":"champion_animation"}"#).unwrap();
        assert_eq!(
            StepPayload::from(request),
            StepPayload::ChampionAnimationComplete
        );
    }

    #[test]
    fn blank_creation_name_fails_validation() {
        let request: StepCompletionRequest = serde_json::from_str(
            r#"{"step":"creation","data":{"name":"   ","maxPlayersPerTeam":10}}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn planning_rejects_reversed_dates() {
        let request = PlanningRequest {
            start_date: "2024-06-10".into(),
            end_date: Some("2024-06-01".into()),
            venue: None,
            match_duration_minutes: None,
            max_players_per_team: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn planning_rejects_non_extended_dates() {
        let request = PlanningRequest {
            start_date: "2024-06-10".into(),
            end_date: Some("20240501".into()),
            venue: None,
            match_duration_minutes: None,
            max_players_per_team: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn planning_dates_compare_as_calendar_days() {
        let request = PlanningRequest {
            start_date: " 2024-06-10".into(),
            end_date: Some("2024-06-10 ".into()),
            venue: None,
            match_duration_minutes: None,
            max_players_per_team: None,
        };
        request.validate().unwrap();

        let schedule = request.local_schedule();
        assert_eq!(schedule.start_date, "2024-06-10");
        assert_eq!(schedule.end_date.as_deref(), Some("2024-06-10"));
    }

    #[test]
    fn creation_id_must_be_a_single_path_segment() {
        let request = |id: &str| {
            serde_json::from_str::<StepCompletionRequest>(&format!(
                r#"{{"step":"creation","data":{{"id":"{id}","name":"Cup","maxPlayersPerTeam":10}}}}"#
            ))
            .unwrap()
        };
        assert!(request("665f1c2ab4e0f3a1d2c4b5e6").validate().is_ok());
        assert!(request("../../admin/users?x=").validate().is_err());

        let blank = request("  ");
        blank.validate().unwrap();
        let StepPayload::Creation(data) = StepPayload::from(blank) else {
            panic!("expected creation payload");
        };
        assert_eq!(data.id, None);
    }

    #[test]
    fn planning_defaults_match_duration() {
        let request = PlanningRequest {
            start_date: "2024-06-01".into(),
            end_date: None,
            venue: Some("Court 3".into()),
            match_duration_minutes: None,
            max_players_per_team: Some(7),
        };
        request.validate().unwrap();

        let document = request.to_schedule_document(vec!["a".into()]);
        assert_eq!(document.match_duration_minutes, DEFAULT_MATCH_DURATION_MINUTES);
        assert_eq!(document.team_ids, ["a"]);

        let StepPayload::Planning(data) = StepPayload::from(StepCompletionRequest::Planning(request))
        else {
            panic!("expected planning payload");
        };
        assert_eq!(data.max_players_per_team, Some(7));
        assert_eq!(data.schedule.unwrap().venue.as_deref(), Some("Court 3"));
    }
}
