//! Application state: the single owner of the tracker's `ProgressState`.
//!
//! This module owns:
//!   - the in-memory `ProgressState` behind an async RwLock
//!   - the write-through persistence `Store`
//!
//! Every mutation goes through a method here: lock, apply the engine rule,
//! save, return a snapshot for rendering. Handlers never touch the state
//! directly, and nothing else writes to the store.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::config::TrackerConfig;
use crate::domain::{Profile, ProgressState};
use crate::engine::{self, WeeklySummary};
use crate::generator;
use crate::store::Store;

pub struct AppState {
    progress: Arc<RwLock<ProgressState>>,
    store: Store,
}

/// Outcome of an onboarding submit. A second submit never overwrites an
/// existing profile; only a full reset clears it.
pub enum OnboardOutcome {
    Created(ProgressState),
    AlreadyOnboarded,
}

impl AppState {
    /// Load (or default) the persisted state and take ownership of it.
    #[instrument(level = "info", skip_all)]
    pub fn new(config: &TrackerConfig) -> Self {
        let store = Store::new(&config.storage_path);
        let state = store.load(&mut rand::thread_rng(), today());
        info!(
            target: "momentum_backend",
            onboarded = state.profile.is_some(),
            momentum = state.momentum,
            streak = state.streak,
            completed = state.completed_tasks_count,
            "Startup progress state"
        );
        Self { progress: Arc::new(RwLock::new(state)), store }
    }

    /// Read-only snapshot for rendering.
    pub async fn snapshot(&self) -> ProgressState {
        self.progress.read().await.clone()
    }

    /// Onboarding submit: set the profile, run the one-time backfill, and
    /// generate the first active set.
    #[instrument(level = "info", skip(self, profile), fields(weak_skill = profile.weak_skill.as_str()))]
    pub async fn onboard(&self, profile: Profile) -> OnboardOutcome {
        let mut state = self.progress.write().await;
        if state.profile.is_some() {
            warn!(target: "tracker", "onboarding rejected: profile already exists");
            return OnboardOutcome::AlreadyOnboarded;
        }

        let mut rng = rand::thread_rng();
        engine::backfill(&mut state, &mut rng, today());
        state.tasks = generator::generate(&profile, &mut rng);
        state.profile = Some(profile);
        self.persist(&state);
        info!(target: "tracker", "onboarding complete, first daily set generated");
        OnboardOutcome::Created(state.clone())
    }

    /// Apply a completion toggle. Unknown ids leave the state untouched and
    /// skip the save.
    #[instrument(level = "info", skip(self), fields(%task_id))]
    pub async fn toggle_task(&self, task_id: &str) -> ProgressState {
        let mut state = self.progress.write().await;
        if engine::toggle(&mut state, task_id, today()) {
            self.persist(&state);
        }
        state.clone()
    }

    /// Replace the active set. Tallies, momentum and streak are untouched.
    /// Without a profile there is nothing to bias toward, so this is a no-op.
    #[instrument(level = "info", skip(self))]
    pub async fn regenerate_tasks(&self) -> ProgressState {
        let mut state = self.progress.write().await;
        match state.profile.clone() {
            Some(profile) => {
                state.tasks = generator::generate(&profile, &mut rand::thread_rng());
                self.persist(&state);
            }
            None => warn!(target: "tracker", "generate ignored: onboarding not completed"),
        }
        state.clone()
    }

    /// Full reset: drop the blob and restart from the empty default state.
    #[instrument(level = "info", skip(self))]
    pub async fn reset(&self) -> ProgressState {
        let mut state = self.progress.write().await;
        if let Err(e) = self.store.clear() {
            error!(target: "tracker", error = %e, "failed to remove saved state");
        }
        *state = ProgressState::default();
        info!(target: "tracker", "state reset, onboarding required");
        state.clone()
    }

    pub async fn weekly_summary(&self) -> WeeklySummary {
        engine::weekly_summary(&*self.progress.read().await, today())
    }

    fn persist(&self, state: &ProgressState) {
        if let Err(e) = self.store.save(state) {
            error!(target: "tracker", error = %e, "failed to save state; keeping in-memory copy");
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Skill;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path) -> TrackerConfig {
        TrackerConfig { storage_path: dir.join("state.json"), port: 0 }
    }

    fn profile() -> Profile {
        Profile {
            target_score: "7.0".into(),
            exam_date: today() + chrono::Duration::days(60),
            study_time: 60,
            weak_skill: Skill::Writing,
        }
    }

    #[tokio::test]
    async fn onboarding_backfills_and_generates_a_weak_skill_biased_set() {
        let dir = tempdir().unwrap();
        let app = AppState::new(&config(dir.path()));

        let OnboardOutcome::Created(state) = app.onboard(profile()).await else {
            panic!("fresh state must accept onboarding");
        };
        assert_eq!(state.tasks.len(), 3);
        assert_eq!(state.tasks[0].skill, Skill::Writing);
        assert!(state.is_demo_data_added);
        assert_eq!(state.momentum, 100);
        assert_eq!(state.streak, 10);
    }

    #[tokio::test]
    async fn second_onboarding_is_rejected() {
        let dir = tempdir().unwrap();
        let app = AppState::new(&config(dir.path()));
        app.onboard(profile()).await;
        assert!(matches!(app.onboard(profile()).await, OnboardOutcome::AlreadyOnboarded));
    }

    #[tokio::test]
    async fn state_survives_a_restart() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path());

        let app = AppState::new(&cfg);
        app.onboard(profile()).await;
        let id = app.snapshot().await.tasks[0].id.clone();
        let toggled = app.toggle_task(&id).await;
        drop(app);

        let reopened = AppState::new(&cfg);
        assert_eq!(reopened.snapshot().await, toggled);
    }

    #[tokio::test]
    async fn regenerate_replaces_tasks_but_keeps_the_tallies() {
        let dir = tempdir().unwrap();
        let app = AppState::new(&config(dir.path()));
        app.onboard(profile()).await;

        let before = app.snapshot().await;
        let id = before.tasks[1].id.clone();
        app.toggle_task(&id).await;
        let after_toggle = app.snapshot().await;

        let regenerated = app.regenerate_tasks().await;
        assert_eq!(regenerated.tasks.len(), 3);
        assert!(regenerated.tasks.iter().all(|t| !t.completed));
        assert_eq!(regenerated.completed_tasks_count, after_toggle.completed_tasks_count);
        assert_eq!(regenerated.momentum, after_toggle.momentum);
        assert_eq!(regenerated.streak, after_toggle.streak);
    }

    #[tokio::test]
    async fn regenerate_without_a_profile_is_a_noop() {
        let dir = tempdir().unwrap();
        let app = AppState::new(&config(dir.path()));
        let state = app.regenerate_tasks().await;
        assert!(state.tasks.is_empty());
    }

    #[tokio::test]
    async fn reset_clears_disk_and_memory() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path());
        let app = AppState::new(&cfg);
        app.onboard(profile()).await;

        let state = app.reset().await;
        assert_eq!(state, ProgressState::default());
        assert!(!cfg.storage_path.exists());

        let reopened = AppState::new(&cfg);
        assert_eq!(reopened.snapshot().await, ProgressState::default());
    }
}
