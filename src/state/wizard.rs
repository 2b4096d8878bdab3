use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::gateway::models::TeamDocument;

/// Number of teams a tournament bracket is built for.
pub const REQUIRED_TEAM_COUNT: usize = 8;

/// Team participating (or eligible to participate) in a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Identifier assigned by the teams service.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional logo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Number of registered players, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players_count: Option<u32>,
}

/// A match slotted in the tournament calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMatch {
    /// Round the match belongs to (1-based).
    pub round: u32,
    /// Identifier of the home team.
    pub home_team_id: String,
    /// Identifier of the away team.
    pub away_team_id: String,
    /// Kick-off as returned by the scheduling service.
    pub starts_at: String,
}

/// Planning data attached to a tournament once the planning step is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// First day of the tournament (`YYYY-MM-DD`).
    pub start_date: String,
    /// Last day of the tournament (`YYYY-MM-DD`), if bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Where the matches are played, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Length of a single match.
    pub match_duration_minutes: u32,
    /// Calendar of matches produced by the scheduler.
    #[serde(default)]
    pub matches: Vec<ScheduledMatch>,
}

/// One bracket pairing, filled in as rounds are played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BracketMatch {
    /// Round of the pairing (1 = quarter-finals).
    pub round: u32,
    /// Home side, once known.
    #[serde(default)]
    pub home: Option<Team>,
    /// Away side, once known.
    #[serde(default)]
    pub away: Option<Team>,
    /// Winner, once the match is played.
    #[serde(default)]
    pub winner: Option<Team>,
}

/// Tournament being assembled by the wizard, accumulated step after step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TournamentDraft {
    /// Identifier assigned by the tournament service, required for remote scheduling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Tournament name.
    pub name: String,
    /// Teams selected for the bracket.
    pub teams: Vec<Team>,
    /// Roster limit per team.
    pub max_players_per_team: u32,
    /// Whether the planning step was completed.
    pub scheduled: bool,
    /// Planning details, once known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    /// Whether the bracket pairings were drawn.
    pub draw_completed: bool,
    /// Bracket pairings.
    pub matches: Vec<BracketMatch>,
    /// Tournament winner.
    pub champion: Option<Team>,
    /// Final ranking, best team first.
    pub podium: Option<Vec<Team>>,
}

impl TournamentDraft {
    /// Whether the draft carries a name. Blank names are rejected when the tournament is
    /// created, not here.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Whether exactly the required number of teams has been selected.
    pub fn has_full_roster(&self) -> bool {
        self.teams.len() == REQUIRED_TEAM_COUNT
    }
}

/// The seven wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Step {
    /// Name the tournament.
    Creation = 1,
    /// Pick dates, venue and match length.
    Planning = 2,
    /// Pick the eight participating teams.
    TeamSelection = 3,
    /// Draw the bracket pairings.
    Draw = 4,
    /// Play the bracket until a champion emerges.
    Bracket = 5,
    /// Celebrate the champion.
    ChampionAnimation = 6,
    /// Show the final ranking.
    Podium = 7,
}

impl Step {
    /// All steps in wizard order.
    pub const ALL: [Step; 7] = [
        Step::Creation,
        Step::Planning,
        Step::TeamSelection,
        Step::Draw,
        Step::Bracket,
        Step::ChampionAnimation,
        Step::Podium,
    ];

    /// 1-based step number shown in the stepper.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Static display metadata for this step.
    pub fn info(self) -> &'static StepInfo {
        &STEPS[usize::from(self.number() - 1)]
    }
}

impl TryFrom<u8> for Step {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::ALL
            .into_iter()
            .find(|step| step.number() == value)
            .ok_or(value)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.info().title)
    }
}

/// Read-only stepper entry.
#[derive(Debug, PartialEq, Eq)]
pub struct StepInfo {
    /// Step this entry describes.
    pub step: Step,
    /// Label shown in the stepper.
    pub title: &'static str,
    /// Icon shown next to the label.
    pub icon: &'static str,
}

/// Stepper configuration, indexed by `step number - 1`.
pub static STEPS: [StepInfo; 7] = [
    StepInfo {
        step: Step::Creation,
        title: "Creation",
        icon: "🏆",
    },
    StepInfo {
        step: Step::Planning,
        title: "Planning",
        icon: "📅",
    },
    StepInfo {
        step: Step::TeamSelection,
        title: "Team Selection",
        icon: "👥",
    },
    StepInfo {
        step: Step::Draw,
        title: "Draw",
        icon: "🎲",
    },
    StepInfo {
        step: Step::Bracket,
        title: "Bracket",
        icon: "🗂",
    },
    StepInfo {
        step: Step::ChampionAnimation,
        title: "Champion",
        icon: "🎉",
    },
    StepInfo {
        step: Step::Podium,
        title: "Podium",
        icon: "🥇",
    },
];

impl From<TeamDocument> for Team {
    fn from(value: TeamDocument) -> Self {
        let players_count = value
            .players
            .map(|players| u32::try_from(players.len()).unwrap_or(u32::MAX));
        Self {
            id: value.id,
            name: value.name,
            logo: value.logo,
            players_count,
        }
    }
}
