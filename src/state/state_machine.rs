use std::time::Duration;

use thiserror::Error;

use crate::state::wizard::{Schedule, Step, Team, TournamentDraft};

/// How long the champion celebration stays on screen before the podium is shown.
pub const CHAMPION_ANIMATION_DELAY: Duration = Duration::from_millis(8_000);

/// Data collected by the creation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationData {
    /// Identifier already assigned by the tournament service, if any.
    pub id: Option<String>,
    /// Tournament name.
    pub name: String,
    /// Roster limit per team.
    pub max_players_per_team: u32,
}

/// Partial update collected by the planning step; absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanningData {
    /// New planning details.
    pub schedule: Option<Schedule>,
    /// New roster limit.
    pub max_players_per_team: Option<u32>,
}

/// Payload reported by a step view when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPayload {
    /// Replace the draft with a brand new tournament.
    Creation(CreationData),
    /// Merge planning information into the draft.
    Planning(PlanningData),
    /// Set the selected teams.
    TeamSelection(Vec<Team>),
    /// Draw result, replacing the draft wholesale.
    Draw(TournamentDraft),
    /// Bracket result, replacing the draft wholesale.
    Bracket(TournamentDraft),
    /// The champion animation finished playing.
    ChampionAnimationComplete,
}

impl StepPayload {
    /// The step this payload completes.
    pub fn step(&self) -> Step {
        match self {
            StepPayload::Creation(_) => Step::Creation,
            StepPayload::Planning(_) => Step::Planning,
            StepPayload::TeamSelection(_) => Step::TeamSelection,
            StepPayload::Draw(_) => Step::Draw,
            StepPayload::Bracket(_) => Step::Bracket,
            StepPayload::ChampionAnimationComplete => Step::ChampionAnimation,
        }
    }
}

/// Result of a successful step completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The wizard moved on to the given step.
    Advanced(Step),
    /// The bracket has no champion yet; the wizard stays on the bracket step.
    AwaitingChampion,
    /// A champion was crowned. The animation is visible until the timer armed for
    /// `version` fires or the animation is completed explicitly.
    ChampionCrowned {
        /// Version the animation timer must present to finish the animation.
        version: usize,
    },
}

/// Errors raised when a step completion cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// Only the current step can be completed.
    #[error("step {step} cannot be completed while the wizard is on step {current}")]
    NotCurrentStep {
        /// Step the payload was meant for.
        step: Step,
        /// Step the wizard is on.
        current: Step,
    },
    /// Completing the step would land the wizard on a step whose requirements are unmet.
    #[error("completing step {step} would leave step {next} locked")]
    StepLocked {
        /// Step being completed.
        step: Step,
        /// Step the wizard would have moved to.
        next: Step,
    },
    /// The step merges into an existing draft but none has been created.
    #[error("step {step} requires a tournament draft")]
    MissingDraft {
        /// Step being completed.
        step: Step,
    },
    /// The wizard changed while the caller was preparing the payload.
    #[error("wizard changed concurrently (expected version {expected}, got {actual})")]
    VersionMismatch {
        /// Version observed by the caller.
        expected: usize,
        /// Current version.
        actual: usize,
    },
}

/// Point-in-time copy of the wizard state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Step on screen.
    pub current_step: Step,
    /// Tournament assembled so far.
    pub draft: Option<TournamentDraft>,
    /// Whether the champion celebration is playing.
    pub champion_animation: bool,
    /// Bumped on every change.
    pub version: usize,
}

/// State machine driving the seven-step tournament wizard.
#[derive(Debug, Clone)]
pub struct WizardStateMachine {
    current_step: Step,
    draft: Option<TournamentDraft>,
    champion_animation: bool,
    version: usize,
}

impl Default for WizardStateMachine {
    fn default() -> Self {
        Self {
            current_step: Step::Creation,
            draft: None,
            champion_animation: false,
            version: 0,
        }
    }
}

impl WizardStateMachine {
    /// Create a wizard on the creation step with no draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Step currently displayed.
    pub fn current_step(&self) -> Step {
        self.current_step
    }

    /// Tournament draft accumulated so far.
    pub fn draft(&self) -> Option<&TournamentDraft> {
        self.draft.as_ref()
    }

    /// Whether the champion celebration is on screen.
    pub fn champion_animation_visible(&self) -> bool {
        self.champion_animation
    }

    /// Monotonic counter bumped on every applied change.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_step: self.current_step,
            draft: self.draft.clone(),
            champion_animation: self.champion_animation,
            version: self.version,
        }
    }

    /// Navigation guard: can the user enter `step` given the current draft?
    pub fn is_step_accessible(&self, step: Step) -> bool {
        is_accessible(self.draft.as_ref(), step)
    }

    /// Stepper decoration only; has no gating effect.
    pub fn is_step_completed(&self, step: Step) -> bool {
        let Some(draft) = self.draft.as_ref() else {
            return false;
        };
        match step {
            Step::Creation => draft.has_name(),
            Step::Planning => draft.scheduled,
            Step::TeamSelection => draft.has_full_roster(),
            Step::Draw => draft.draw_completed,
            Step::Bracket | Step::ChampionAnimation => draft.champion.is_some(),
            Step::Podium => draft.podium.is_some(),
        }
    }

    /// Apply the payload of the step that just completed.
    pub fn complete_step(&mut self, payload: StepPayload) -> Result<CompletionOutcome, WizardError> {
        if matches!(payload, StepPayload::ChampionAnimationComplete) {
            return self.complete_champion_animation();
        }

        let step = payload.step();
        if step != self.current_step {
            return Err(WizardError::NotCurrentStep {
                step,
                current: self.current_step,
            });
        }

        let (draft, next) = reduce(self.draft.as_ref(), payload)?;
        if !is_accessible(Some(&draft), next) {
            return Err(WizardError::StepLocked { step, next });
        }

        let crowned = step == Step::Bracket && draft.champion.is_some();
        self.draft = Some(draft);
        self.version += 1;
        // Only a crowned champion keeps the celebration on screen.
        self.champion_animation = crowned;

        if crowned {
            return Ok(CompletionOutcome::ChampionCrowned {
                version: self.version,
            });
        }

        if next == self.current_step {
            return Ok(CompletionOutcome::AwaitingChampion);
        }

        self.current_step = next;
        Ok(CompletionOutcome::Advanced(next))
    }

    /// Same as [`complete_step`](Self::complete_step), but only if nothing changed since
    /// the caller observed `expected_version`.
    pub fn complete_step_at(
        &mut self,
        expected_version: usize,
        payload: StepPayload,
    ) -> Result<CompletionOutcome, WizardError> {
        if self.version != expected_version {
            return Err(WizardError::VersionMismatch {
                expected: expected_version,
                actual: self.version,
            });
        }
        self.complete_step(payload)
    }

    /// Jump to an earlier step (or back to the start). Forward jumps are silently ignored.
    pub fn go_to_step(&mut self, step: Step) -> bool {
        if step > self.current_step && step != Step::Creation {
            return false;
        }
        if step == self.current_step {
            return true;
        }

        self.current_step = step;
        self.champion_animation = false;
        self.version += 1;
        true
    }

    /// Discard the draft and start over.
    pub fn reset(&mut self) {
        self.draft = None;
        self.current_step = Step::Creation;
        self.champion_animation = false;
        self.version += 1;
    }

    /// Timer callback: move to the podium if the animation armed at `version` is still showing.
    pub fn finish_champion_animation(&mut self, version: usize) -> bool {
        if !self.champion_animation || self.version != version {
            return false;
        }
        self.enter_podium();
        true
    }

    fn complete_champion_animation(&mut self) -> Result<CompletionOutcome, WizardError> {
        let step = Step::ChampionAnimation;
        if !self.champion_animation && self.current_step != step {
            return Err(WizardError::NotCurrentStep {
                step,
                current: self.current_step,
            });
        }
        if !self.is_step_accessible(Step::Podium) {
            return Err(WizardError::StepLocked {
                step,
                next: Step::Podium,
            });
        }

        self.enter_podium();
        Ok(CompletionOutcome::Advanced(Step::Podium))
    }

    fn enter_podium(&mut self) {
        self.current_step = Step::Podium;
        self.champion_animation = false;
        self.version += 1;
    }
}

fn is_accessible(draft: Option<&TournamentDraft>, step: Step) -> bool {
    if step == Step::Creation {
        return true;
    }
    let Some(draft) = draft else {
        return false;
    };
    match step {
        Step::Creation | Step::Planning => true,
        Step::TeamSelection => draft.has_name(),
        Step::Draw => draft.has_full_roster(),
        Step::Bracket => draft.draw_completed,
        Step::ChampionAnimation | Step::Podium => draft.champion.is_some(),
    }
}

/// Transition table: the draft produced by a step and the step that follows it.
fn reduce(
    current: Option<&TournamentDraft>,
    payload: StepPayload,
) -> Result<(TournamentDraft, Step), WizardError> {
    let step = payload.step();
    let existing = || current.cloned().ok_or(WizardError::MissingDraft { step });

    let next = match payload {
        StepPayload::Creation(data) => (
            TournamentDraft {
                id: data.id,
                name: data.name,
                max_players_per_team: data.max_players_per_team,
                ..TournamentDraft::default()
            },
            Step::Planning,
        ),
        StepPayload::Planning(data) => {
            let mut draft = existing()?;
            if let Some(schedule) = data.schedule {
                draft.schedule = Some(schedule);
            }
            if let Some(max_players) = data.max_players_per_team {
                draft.max_players_per_team = max_players;
            }
            draft.scheduled = true;
            (draft, Step::TeamSelection)
        }
        StepPayload::TeamSelection(teams) => {
            let mut draft = existing()?;
            draft.teams = teams;
            (draft, Step::Draw)
        }
        StepPayload::Draw(draft) => (draft, Step::Bracket),
        StepPayload::Bracket(draft) => {
            let next = if draft.champion.is_some() {
                Step::Podium
            } else {
                Step::Bracket
            };
            (draft, next)
        }
        StepPayload::ChampionAnimationComplete => (existing()?, Step::Podium),
    };

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::wizard::REQUIRED_TEAM_COUNT;

    fn team(index: usize) -> Team {
        Team {
            id: format!("team-{index}"),
            name: format!("Team {index}"),
            logo: None,
            players_count: None,
        }
    }

    fn teams(count: usize) -> Vec<Team> {
        (0..count).map(team).collect()
    }

    fn creation(name: &str) -> StepPayload {
        StepPayload::Creation(CreationData {
            id: Some("t-1".into()),
            name: name.into(),
            max_players_per_team: 12,
        })
    }

    fn drawn(sm: &WizardStateMachine) -> TournamentDraft {
        TournamentDraft {
            draw_completed: true,
            ..sm.draft().cloned().unwrap()
        }
    }

    /// Drive a fresh wizard up to the bracket step.
    fn wizard_on_bracket() -> WizardStateMachine {
        let mut sm = WizardStateMachine::new();
        sm.complete_step(creation("Spring Cup")).unwrap();
        sm.complete_step(StepPayload::Planning(PlanningData::default()))
            .unwrap();
        sm.complete_step(StepPayload::TeamSelection(teams(REQUIRED_TEAM_COUNT)))
            .unwrap();
        let draw = drawn(&sm);
        sm.complete_step(StepPayload::Draw(draw)).unwrap();
        assert_eq!(sm.current_step(), Step::Bracket);
        sm
    }

    fn with_champion(sm: &WizardStateMachine) -> TournamentDraft {
        TournamentDraft {
            champion: Some(Team {
                id: "a".into(),
                name: "Team A".into(),
                logo: None,
                players_count: None,
            }),
            ..sm.draft().cloned().unwrap()
        }
    }

    #[test]
    fn initial_state_is_creation_without_draft() {
        let sm = WizardStateMachine::new();
        assert_eq!(sm.current_step(), Step::Creation);
        assert!(sm.draft().is_none());
        assert!(!sm.champion_animation_visible());
        assert!(sm.is_step_accessible(Step::Creation));
    }

    #[test]
    fn accessibility_predicates_follow_their_draft_field() {
        let mut sm = WizardStateMachine::new();
        assert!(!sm.is_step_accessible(Step::Planning));

        sm.draft = Some(TournamentDraft::default());
        assert!(sm.is_step_accessible(Step::Planning));
        assert!(!sm.is_step_accessible(Step::TeamSelection));

        sm.draft = Some(TournamentDraft {
            name: "Cup".into(),
            ..TournamentDraft::default()
        });
        assert!(sm.is_step_accessible(Step::TeamSelection));
        assert!(!sm.is_step_accessible(Step::Draw));

        sm.draft = Some(TournamentDraft {
            teams: teams(REQUIRED_TEAM_COUNT),
            ..TournamentDraft::default()
        });
        assert!(sm.is_step_accessible(Step::Draw));
        assert!(!sm.is_step_accessible(Step::Bracket));

        sm.draft = Some(TournamentDraft {
            draw_completed: true,
            ..TournamentDraft::default()
        });
        assert!(sm.is_step_accessible(Step::Bracket));
        assert!(!sm.is_step_accessible(Step::ChampionAnimation));
        assert!(!sm.is_step_accessible(Step::Podium));

        sm.draft = Some(TournamentDraft {
            champion: Some(team(0)),
            ..TournamentDraft::default()
        });
        assert!(sm.is_step_accessible(Step::ChampionAnimation));
        assert!(sm.is_step_accessible(Step::Podium));
    }

    #[test]
    fn empty_name_keeps_team_selection_locked() {
        let mut sm = WizardStateMachine::new();
        sm.draft = Some(TournamentDraft {
            name: String::new(),
            ..TournamentDraft::default()
        });
        assert!(!sm.is_step_accessible(Step::TeamSelection));
    }

    #[test]
    fn go_to_step_never_skips_ahead() {
        let mut sm = WizardStateMachine::new();
        sm.complete_step(creation("Cup")).unwrap();
        assert_eq!(sm.current_step(), Step::Planning);

        assert!(!sm.go_to_step(Step::Bracket));
        assert_eq!(sm.current_step(), Step::Planning);

        assert!(sm.go_to_step(Step::Creation));
        assert_eq!(sm.current_step(), Step::Creation);
    }

    #[test]
    fn going_back_and_resubmitting_moves_forward_again() {
        let mut sm = WizardStateMachine::new();
        sm.complete_step(creation("Cup")).unwrap();
        sm.complete_step(StepPayload::Planning(PlanningData::default()))
            .unwrap();
        assert!(sm.go_to_step(Step::Planning));

        let outcome = sm
            .complete_step(StepPayload::Planning(PlanningData {
                max_players_per_team: Some(9),
                ..PlanningData::default()
            }))
            .unwrap();
        assert_eq!(outcome, CompletionOutcome::Advanced(Step::TeamSelection));
        assert_eq!(sm.draft().unwrap().max_players_per_team, 9);
        assert_eq!(sm.draft().unwrap().name, "Cup");
    }

    #[test]
    fn team_selection_requires_exactly_eight_teams() {
        let mut sm = WizardStateMachine::new();
        sm.complete_step(creation("Cup")).unwrap();
        sm.complete_step(StepPayload::Planning(PlanningData::default()))
            .unwrap();

        let err = sm
            .complete_step(StepPayload::TeamSelection(teams(7)))
            .unwrap_err();
        assert_eq!(
            err,
            WizardError::StepLocked {
                step: Step::TeamSelection,
                next: Step::Draw
            }
        );
        assert!(!sm.is_step_accessible(Step::Draw));
        assert_eq!(sm.current_step(), Step::TeamSelection);

        let outcome = sm
            .complete_step(StepPayload::TeamSelection(teams(8)))
            .unwrap();
        assert_eq!(outcome, CompletionOutcome::Advanced(Step::Draw));
        assert!(sm.is_step_accessible(Step::Draw));
    }

    #[test]
    fn creation_replaces_previous_draft() {
        let mut sm = wizard_on_bracket();
        sm.go_to_step(Step::Creation);
        sm.complete_step(creation("Autumn Cup")).unwrap();

        let draft = sm.draft().unwrap();
        assert_eq!(draft.name, "Autumn Cup");
        assert!(draft.teams.is_empty());
        assert!(!draft.draw_completed);
    }

    #[test]
    fn planning_marks_draft_scheduled() {
        let mut sm = WizardStateMachine::new();
        sm.complete_step(creation("Cup")).unwrap();
        assert!(!sm.is_step_completed(Step::Planning));

        sm.complete_step(StepPayload::Planning(PlanningData::default()))
            .unwrap();
        assert!(sm.is_step_completed(Step::Creation));
        assert!(sm.is_step_completed(Step::Planning));
        assert!(!sm.is_step_completed(Step::TeamSelection));
    }

    #[test]
    fn only_current_step_can_be_completed() {
        let mut sm = WizardStateMachine::new();
        let err = sm
            .complete_step(StepPayload::TeamSelection(teams(8)))
            .unwrap_err();
        assert_eq!(
            err,
            WizardError::NotCurrentStep {
                step: Step::TeamSelection,
                current: Step::Creation
            }
        );
    }

    #[test]
    fn draw_without_completion_flag_is_rejected() {
        let mut sm = WizardStateMachine::new();
        sm.complete_step(creation("Cup")).unwrap();
        sm.complete_step(StepPayload::Planning(PlanningData::default()))
            .unwrap();
        sm.complete_step(StepPayload::TeamSelection(teams(8)))
            .unwrap();

        let undrawn = sm.draft().cloned().unwrap();
        let err = sm.complete_step(StepPayload::Draw(undrawn)).unwrap_err();
        assert!(matches!(err, WizardError::StepLocked { .. }));
        assert_eq!(sm.current_step(), Step::Draw);
    }

    #[test]
    fn bracket_without_champion_stays_on_bracket() {
        let mut sm = wizard_on_bracket();
        let result = sm.draft().cloned().unwrap();

        let outcome = sm.complete_step(StepPayload::Bracket(result)).unwrap();
        assert_eq!(outcome, CompletionOutcome::AwaitingChampion);
        assert_eq!(sm.current_step(), Step::Bracket);
        assert!(!sm.champion_animation_visible());
    }

    #[test]
    fn champion_shows_animation_until_timer_finishes() {
        let mut sm = wizard_on_bracket();
        let result = with_champion(&sm);

        let outcome = sm.complete_step(StepPayload::Bracket(result)).unwrap();
        let CompletionOutcome::ChampionCrowned { version } = outcome else {
            panic!("expected champion, got {outcome:?}");
        };
        assert!(sm.champion_animation_visible());
        assert_eq!(sm.draft().unwrap().champion.as_ref().unwrap().name, "Team A");
        assert_eq!(sm.current_step(), Step::Bracket);

        assert!(sm.finish_champion_animation(version));
        assert_eq!(sm.current_step(), Step::Podium);
        assert!(!sm.champion_animation_visible());
    }

    #[test]
    fn bracket_resent_without_champion_hides_the_animation() {
        let mut sm = wizard_on_bracket();
        let crowned = with_champion(&sm);
        let CompletionOutcome::ChampionCrowned { version } =
            sm.complete_step(StepPayload::Bracket(crowned)).unwrap()
        else {
            panic!("expected champion");
        };

        let undecided = TournamentDraft {
            champion: None,
            ..sm.draft().cloned().unwrap()
        };
        let outcome = sm.complete_step(StepPayload::Bracket(undecided)).unwrap();
        assert_eq!(outcome, CompletionOutcome::AwaitingChampion);
        assert_eq!(sm.current_step(), Step::Bracket);
        assert!(!sm.champion_animation_visible());
        assert!(!sm.finish_champion_animation(version));

        // The bracket can still be decided afterwards.
        let crowned = with_champion(&sm);
        let outcome = sm.complete_step(StepPayload::Bracket(crowned)).unwrap();
        assert!(matches!(outcome, CompletionOutcome::ChampionCrowned { .. }));
        assert!(sm.champion_animation_visible());
    }

    #[test]
    fn stale_timer_after_reset_is_ignored() {
        let mut sm = wizard_on_bracket();
        let result = with_champion(&sm);
        let CompletionOutcome::ChampionCrowned { version } =
            sm.complete_step(StepPayload::Bracket(result)).unwrap()
        else {
            panic!("expected champion");
        };

        sm.reset();
        assert!(!sm.finish_champion_animation(version));
        assert_eq!(sm.current_step(), Step::Creation);
    }

    #[test]
    fn explicit_animation_completion_moves_to_podium() {
        let mut sm = wizard_on_bracket();
        let result = with_champion(&sm);
        sm.complete_step(StepPayload::Bracket(result)).unwrap();

        let outcome = sm
            .complete_step(StepPayload::ChampionAnimationComplete)
            .unwrap();
        assert_eq!(outcome, CompletionOutcome::Advanced(Step::Podium));
        assert!(!sm.champion_animation_visible());
    }

    #[test]
    fn animation_completion_without_champion_is_rejected() {
        let mut sm = wizard_on_bracket();
        let err = sm
            .complete_step(StepPayload::ChampionAnimationComplete)
            .unwrap_err();
        assert!(matches!(err, WizardError::NotCurrentStep { .. }));
    }

    #[test]
    fn reset_always_returns_to_a_blank_wizard() {
        let mut sm = wizard_on_bracket();
        let result = with_champion(&sm);
        sm.complete_step(StepPayload::Bracket(result)).unwrap();

        sm.reset();
        assert!(sm.draft().is_none());
        assert_eq!(sm.current_step(), Step::Creation);
        assert!(!sm.champion_animation_visible());

        let mut fresh = WizardStateMachine::new();
        fresh.reset();
        assert_eq!(fresh.snapshot().current_step, Step::Creation);
        assert!(fresh.snapshot().draft.is_none());
    }

    #[test]
    fn versioned_completion_detects_concurrent_changes() {
        let mut sm = WizardStateMachine::new();
        sm.complete_step(creation("Cup")).unwrap();
        let observed = sm.version();

        sm.go_to_step(Step::Creation);
        sm.complete_step(creation("Other Cup")).unwrap();

        let err = sm
            .complete_step_at(observed, StepPayload::Planning(PlanningData::default()))
            .unwrap_err();
        assert!(matches!(err, WizardError::VersionMismatch { .. }));
    }
}
