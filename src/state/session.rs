use std::{
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use indexmap::IndexMap;
use time::OffsetDateTime;
use tokio::{sync::RwLock, task::AbortHandle, time::Instant};
use uuid::Uuid;

use crate::state::{state_machine::WizardStateMachine, user::CurrentUser, wizard::Team};

/// One live tournament wizard and the resources tied to its lifetime.
///
/// Dropping the session aborts any pending champion-animation timer.
pub struct WizardSession {
    id: Uuid,
    owner: Option<String>,
    created_at: OffsetDateTime,
    machine: RwLock<WizardStateMachine>,
    available_teams: RwLock<IndexMap<String, Team>>,
    animation_timer: Mutex<Option<AbortHandle>>,
    last_activity: Mutex<Instant>,
}

impl WizardSession {
    /// Start a wizard on the creation step for `user`.
    pub fn new(user: &CurrentUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: user.user_id.clone(),
            created_at: OffsetDateTime::now_utc(),
            machine: RwLock::new(WizardStateMachine::new()),
            available_teams: RwLock::new(IndexMap::new()),
            animation_timer: Mutex::new(None),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    /// Identifier of the wizard, as used in its routes.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identifier of the user who opened the wizard.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Wall-clock time the wizard was opened.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// The wizard state machine; writers are serialized by the lock.
    pub fn machine(&self) -> &RwLock<WizardStateMachine> {
        &self.machine
    }

    /// Teams eligible for selection, in the order the teams service returned them.
    pub async fn available_teams(&self) -> Vec<Team> {
        self.available_teams.read().await.values().cloned().collect()
    }

    /// Replace the eligible teams, dropping duplicate identifiers.
    pub async fn set_available_teams(&self, teams: Vec<Team>) {
        let deduped = teams
            .into_iter()
            .map(|team| (team.id.clone(), team))
            .collect::<IndexMap<_, _>>();
        *self.available_teams.write().await = deduped;
    }

    /// Track the champion-animation timer, aborting the one it replaces.
    pub fn arm_animation_timer(&self, handle: AbortHandle) {
        if let Some(previous) = self.timer_slot().replace(handle) {
            previous.abort();
        }
    }

    /// Abort the pending champion-animation timer. Returns whether one was pending.
    pub fn cancel_animation_timer(&self) -> bool {
        match self.timer_slot().take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    /// Record that the wizard was just used.
    pub fn touch(&self) {
        *self
            .last_activity
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Instant::now();
    }

    /// Time since the wizard was last used.
    pub fn idle_for(&self) -> Duration {
        self.last_activity
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .elapsed()
    }

    fn timer_slot(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.animation_timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for WizardSession {
    fn drop(&mut self) {
        self.cancel_animation_timer();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn team(id: &str, name: &str) -> Team {
        Team {
            id: id.into(),
            name: name.into(),
            logo: None,
            players_count: None,
        }
    }

    #[tokio::test]
    async fn available_teams_are_deduplicated_in_order() {
        let session = WizardSession::new(&CurrentUser::anonymous());
        session
            .set_available_teams(vec![
                team("b", "Bears"),
                team("a", "Ants"),
                team("b", "Bears (renamed)"),
            ])
            .await;

        let teams = session.available_teams().await;
        let names: Vec<_> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Bears (renamed)", "Ants"]);
    }

    #[tokio::test]
    async fn arming_a_new_timer_aborts_the_previous_one() {
        let session = WizardSession::new(&CurrentUser::anonymous());
        let first = tokio::spawn(tokio::time::sleep(Duration::from_secs(60)));
        session.arm_animation_timer(first.abort_handle());

        let second = tokio::spawn(tokio::time::sleep(Duration::from_secs(60)));
        session.arm_animation_timer(second.abort_handle());

        assert!(first.await.unwrap_err().is_cancelled());
        assert!(session.cancel_animation_timer());
        assert!(second.await.unwrap_err().is_cancelled());
        assert!(!session.cancel_animation_timer());
    }

    #[tokio::test]
    async fn dropping_the_session_aborts_its_timer() {
        let session = WizardSession::new(&CurrentUser::anonymous());
        let timer = tokio::spawn(tokio::time::sleep(Duration::from_secs(60)));
        session.arm_animation_timer(timer.abort_handle());

        drop(session);
        assert!(timer.await.unwrap_err().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn touching_resets_the_idle_time() {
        let session = WizardSession::new(&CurrentUser::anonymous());
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(session.idle_for(), Duration::from_secs(30));

        session.touch();
        assert_eq!(session.idle_for(), Duration::ZERO);
    }
}
