//! Progress update engine: the deterministic state-transition rules behind
//! every checkbox toggle, plus streak evaluation, the one-time synthetic
//! backfill, badge unlocks, and the derived summaries.
//!
//! Everything here is a pure function over `&mut ProgressState`; the current
//! day and the random source are injected so behavior is reproducible under
//! test. Locking and persistence live in `state`.

use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::domain::{HistoryEntry, ProgressState, Skill};

/// Momentum delta for a single task completion (sign flips on un-toggle).
const TASK_STEP: i32 = 5;
/// Extra momentum awarded when the whole active set is completed.
const SET_BONUS: i32 = 10;
/// Momentum penalty for un-completing when exactly two tasks remain done.
const SET_PENALTY: i32 = 10;
const MOMENTUM_MAX: i32 = 100;

const BACKFILL_ROUNDS: usize = 10;
const BACKFILL_PICKS_PER_ROUND: usize = 3;
const BACKFILL_STREAK: u32 = 10;
const BACKFILL_MOMENTUM: u32 = 100;

pub const BADGE_STREAK_3: &str = "streak_3";
pub const BADGE_STREAK_7: &str = "streak_7";
pub const BADGE_MOMENTUM_50: &str = "momentum_50";
pub const BADGE_MOMENTUM_100: &str = "momentum_100";
pub const BADGE_PERFECT_DAY: &str = "perfect_day";

fn clamped(momentum: u32, delta: i32) -> u32 {
  (momentum as i32 + delta).clamp(0, MOMENTUM_MAX) as u32
}

/// Apply a completion toggle for `task_id`. Unknown ids are a no-op; the
/// return value says whether anything changed.
///
/// Rule order matters: the per-task delta first, then the set-level bonus or
/// penalty, then streak evaluation when the set just became fully complete.
#[instrument(level = "debug", skip(state), fields(%task_id))]
pub fn toggle(state: &mut ProgressState, task_id: &str, today: NaiveDate) -> bool {
  let (was_completed, skill) = match state.task_mut(task_id) {
    Some(task) => {
      let was = task.completed;
      task.completed = !was;
      (was, task.skill)
    }
    None => {
      debug!(target: "tracker", %task_id, "toggle ignored: no such task in the active set");
      return false;
    }
  };

  if !was_completed {
    state.momentum = clamped(state.momentum, TASK_STEP);
    state.completed_tasks_count += 1;
    state.skill_stats.bump(skill);
  } else {
    state.momentum = clamped(state.momentum, -TASK_STEP);
    state.completed_tasks_count = state.completed_tasks_count.saturating_sub(1);
    state.skill_stats.drop_one(skill);
  }

  let all_completed = state.all_completed();
  if all_completed && !was_completed {
    state.momentum = clamped(state.momentum, SET_BONUS);
    evaluate_streak(state, today);
  } else if !all_completed && was_completed && state.completed_in_set() == 2 {
    // The penalty fires only when exactly two tasks remain completed, i.e.
    // when un-toggling out of a fully completed set. Un-completing from any
    // other count carries no extra penalty.
    state.momentum = clamped(state.momentum, -SET_PENALTY);
  }

  check_badges(state);
  true
}

/// Bump the streak if the set's full completion is the first one today, and
/// log the day into the history. Guards against double-counting when the user
/// toggles everything off and on again within the same day.
pub fn evaluate_streak(state: &mut ProgressState, today: NaiveDate) {
  if state.last_completed_date == Some(today) {
    return;
  }
  state.streak += 1;
  state.last_completed_date = Some(today);
  state.history.push(HistoryEntry {
    date: today,
    completed_count: state.completed_in_set() as u32,
    momentum: state.momentum,
    streak: state.streak,
  });
  info!(target: "tracker", streak = state.streak, "daily set completed, streak extended");
}

/// One-time synthetic history seeding at onboarding: 30 random skill-tally
/// increments, a ready-made streak and full momentum, so the dashboard and
/// chart are not empty on day one. Cosmetic seed data, not real history.
#[instrument(level = "debug", skip(state, rng))]
pub fn backfill(state: &mut ProgressState, rng: &mut impl Rng, today: NaiveDate) {
  if state.is_demo_data_added {
    return;
  }

  for _ in 0..BACKFILL_ROUNDS {
    for _ in 0..BACKFILL_PICKS_PER_ROUND {
      let skill = Skill::ALL[rng.gen_range(0..Skill::ALL.len())];
      state.skill_stats.bump(skill);
      state.completed_tasks_count += 1;
    }
  }

  state.streak = BACKFILL_STREAK;
  state.momentum = BACKFILL_MOMENTUM;
  state.last_completed_date = Some(today - chrono::Duration::days(1));
  state.is_demo_data_added = true;
  info!(target: "tracker", "synthetic history backfilled");
}

/// Whole days until the exam, floored at zero once the date has passed.
pub fn days_to_exam(exam_date: NaiveDate, today: NaiveDate) -> i64 {
  (exam_date - today).num_days().max(0)
}

/// Rolling 7-day view over the history log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeeklySummary {
  pub weekly_tasks: u32,
  pub active_days: u32,
}

pub fn weekly_summary(state: &ProgressState, today: NaiveDate) -> WeeklySummary {
  let window_start = today - chrono::Duration::days(7);
  let mut summary = WeeklySummary::default();
  for entry in &state.history {
    if entry.date > window_start && entry.date <= today {
      summary.weekly_tasks += entry.completed_count;
      summary.active_days += 1;
    }
  }
  summary
}

/// Threshold badges, unlocked once and kept forever. Only checked on real
/// toggle activity; backfilled demo values do not award badges.
fn check_badges(state: &mut ProgressState) {
  let unlock = |badges: &mut Vec<String>, id: &str| {
    if !badges.iter().any(|b| b == id) {
      badges.push(id.to_string());
      info!(target: "tracker", badge = id, "badge unlocked");
    }
  };
  let all_completed = state.all_completed();
  if state.streak >= 3 {
    unlock(&mut state.badges, BADGE_STREAK_3);
  }
  if state.streak >= 7 {
    unlock(&mut state.badges, BADGE_STREAK_7);
  }
  if state.momentum >= 50 {
    unlock(&mut state.badges, BADGE_MOMENTUM_50);
  }
  if state.momentum >= 100 {
    unlock(&mut state.badges, BADGE_MOMENTUM_100);
  }
  if all_completed {
    unlock(&mut state.badges, BADGE_PERFECT_DAY);
  }
}
